//! Domain layer for the APECK CMS backend.
//!
//! This crate contains:
//! - Domain models and request/response payloads
//! - Content rules (slugs, publish dates, section schemas, JSON content paths)

pub mod models;
pub mod services;
