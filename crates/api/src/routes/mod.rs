//! HTTP route handlers.

pub mod auth;
pub mod contact;
pub mod email;
pub mod email_recipients;
pub mod events;
pub mod health;
pub mod media;
pub mod membership;
pub mod news;
pub mod pages;
pub mod payments;
pub mod public;
pub mod section_schemas;
pub mod site_routes;
pub mod users;
