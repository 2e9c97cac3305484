//! Domain logic for the parcel locker backend.
//!
//! Everything in this crate is free of I/O: the parcel state machine,
//! compartment occupancy rules, OTP generation and verification, overdue fee
//! computation, user roles, and the in-process rate limiter / pickup token
//! store. The `db` and `api` crates build on these types.

pub mod codes;
pub mod compartment;
pub mod error;
pub mod hashing;
pub mod otp;
pub mod overdue;
pub mod parcel;
pub mod phone;
pub mod pickup_token;
pub mod rate_limit;
pub mod roles;
pub mod status;
pub mod types;
