//! Shared utilities for the APECK CMS backend.
//!
//! - Hashing and random code generation
//! - Password hashing with Argon2id
//! - HS256 access/refresh tokens
//! - Field validators reused by request DTOs

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
