//! Authentication primitives for staff accounts.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token generation, validation and logout revocation.

pub mod jwt;
pub mod password;
