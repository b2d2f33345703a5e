//! APECK CMS API library.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! build the router through [`app::create_app`].

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
