//! Authentication primitives for the admin API.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;

/// Role carried by tokens issued to the site administrator.
pub const ROLE_ADMIN: &str = "admin";
