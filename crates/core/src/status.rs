//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. The string label is the
//! value exposed over the API and recorded in `parcel_events.event_type`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Error returned when a status label or ID is not part of the enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Result<Self, UnknownStatus> {
                match id {
                    $( $val => Ok(Self::$variant), )+
                    other => Err(UnknownStatus {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }

            /// The upper-case label used on the wire and in event logs.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = UnknownStatus;

            fn try_from(value: StatusId) -> Result<Self, Self::Error> {
                Self::from_id(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok(Self::$variant), )+
                    other => Err(UnknownStatus {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_status_enum! {
    /// Operational status of a locker bank.
    LockerStatus {
        Active = 1 => "ACTIVE",
        Maintenance = 2 => "MAINTENANCE",
        Disabled = 3 => "DISABLED",
    }
}

define_status_enum! {
    /// Occupancy status of a single compartment.
    CompartmentStatus {
        Available = 1 => "AVAILABLE",
        Reserved = 2 => "RESERVED",
        Occupied = 3 => "OCCUPIED",
        OutOfService = 4 => "OUT_OF_SERVICE",
    }
}

define_status_enum! {
    /// Parcel lifecycle status.
    ParcelStatus {
        Created = 1 => "CREATED",
        Reserved = 2 => "RESERVED",
        Stored = 3 => "STORED",
        PickupReady = 4 => "PICKUP_READY",
        PickedUp = 5 => "PICKED_UP",
        Expired = 6 => "EXPIRED",
        Cancelled = 7 => "CANCELLED",
    }
}

define_status_enum! {
    /// One-time password status.
    OtpStatus {
        Active = 1 => "ACTIVE",
        Verified = 2 => "VERIFIED",
        Expired = 3 => "EXPIRED",
    }
}
