//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! the executor or connection as the first argument.

pub mod compartment_repo;
pub mod location_repo;
pub mod locker_repo;
pub mod otp_repo;
pub mod parcel_event_repo;
pub mod parcel_repo;
pub mod user_repo;

pub use compartment_repo::CompartmentRepo;
pub use location_repo::LocationRepo;
pub use locker_repo::LockerRepo;
pub use otp_repo::OtpRepo;
pub use parcel_event_repo::ParcelEventRepo;
pub use parcel_repo::ParcelRepo;
pub use user_repo::UserRepo;
