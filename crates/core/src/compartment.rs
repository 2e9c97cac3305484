//! Compartment sizing and occupancy rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::CompartmentStatus;
use crate::types::DbId;

/// Physical compartment size, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompartmentSize {
    S,
    M,
    L,
}

impl CompartmentSize {
    pub const ALL: &'static [CompartmentSize] = &[Self::S, Self::M, Self::L];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        }
    }

    /// Sizes that can hold a parcel of this size, smallest first.
    ///
    /// A parcel never goes into a smaller compartment than requested.
    pub fn best_fit_candidates(self) -> Vec<CompartmentSize> {
        Self::ALL.iter().copied().filter(|s| *s >= self).collect()
    }
}

impl fmt::Display for CompartmentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompartmentSize {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            other => Err(CoreError::Validation(format!(
                "invalid size '{other}', expected S, M or L"
            ))),
        }
    }
}

impl TryFrom<String> for CompartmentSize {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Occupancy state of one compartment.
///
/// `status` and `parcel_id` always move together: `parcel_id` is set exactly
/// while the compartment is `RESERVED` or `OCCUPIED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub status: CompartmentStatus,
    pub parcel_id: Option<DbId>,
}

impl Occupancy {
    pub fn available() -> Self {
        Self {
            status: CompartmentStatus::Available,
            parcel_id: None,
        }
    }

    /// AVAILABLE -> RESERVED for `parcel_id`.
    pub fn reserve(&self, parcel_id: DbId) -> Result<Self, CoreError> {
        match self.status {
            CompartmentStatus::Available => Ok(Self {
                status: CompartmentStatus::Reserved,
                parcel_id: Some(parcel_id),
            }),
            status => Err(CoreError::InvalidCompartmentStatus { status }),
        }
    }

    /// AVAILABLE or RESERVED -> OCCUPIED for `parcel_id`.
    pub fn occupy(&self, parcel_id: DbId) -> Result<Self, CoreError> {
        match self.status {
            CompartmentStatus::Available | CompartmentStatus::Reserved => Ok(Self {
                status: CompartmentStatus::Occupied,
                parcel_id: Some(parcel_id),
            }),
            status => Err(CoreError::InvalidCompartmentStatus { status }),
        }
    }

    /// RESERVED or OCCUPIED -> AVAILABLE, clearing the parcel reference.
    pub fn release(&self) -> Result<Self, CoreError> {
        match self.status {
            CompartmentStatus::Reserved | CompartmentStatus::Occupied => Ok(Self::available()),
            status => Err(CoreError::InvalidCompartmentStatus { status }),
        }
    }
}
