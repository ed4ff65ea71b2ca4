//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing and verification of batch passwords.
//! - [`jwt`] -- Admin access tokens and customer review session tokens.

pub mod jwt;
pub mod password;
