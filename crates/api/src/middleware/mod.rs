//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the user behind an `Authorization: Bearer` token.
//! - [`rbac::RequireAdmin`] -- requires the `ADMIN` role.

pub mod auth;
pub mod rbac;
