//! PostgreSQL storage for pages, news, events, media, membership
//! applications, routes, recipients and console users.
//!
//! Repositories hand back `entities` rows; the API crate converts them into
//! domain models. Every query is timed through [`metrics::QueryTimer`].

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
