//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed token generation and validation.
//! - [`tokens`] -- issuing, checking and consuming stored, scoped tokens.

pub mod jwt;
pub mod password;
pub mod tokens;
