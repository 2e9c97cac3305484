//! Row structs and insert DTOs.
//!
//! Status columns decode straight into the `locker_core::status` enums and
//! serialize as their labels.

pub mod compartment;
pub mod location;
pub mod locker;
pub mod otp;
pub mod parcel;
pub mod parcel_event;
pub mod user;
