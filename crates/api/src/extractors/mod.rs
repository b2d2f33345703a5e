//! Custom Axum extractors.

pub mod client_info;
pub mod json;
pub mod user_auth;

pub use crate::middleware::UserAuth;
pub use client_info::{client_ip, ClientInfo};
pub use json::ValidJson;
pub use user_auth::{bearer_token, BearerToken};
