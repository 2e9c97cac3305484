//! Use-case orchestration.
//!
//! Services validate input, open a transaction where more than one row
//! changes, drive the `locker_core` rules and call repositories on the open
//! connection. Every time-dependent service takes `now` explicitly; handlers
//! pass `Utc::now()`.
//!
//! Transactions follow one pattern throughout:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! SomeRepo::step(&mut tx, ..).await?;   // any `?` drops tx -> ROLLBACK
//! tx.commit().await?;
//! ```

pub mod admin;
pub mod auth;
pub mod compartments;
pub mod expiry;
pub mod otp;
pub mod parcels;
pub mod pickup;
