//! User roles for the staff/back-office accounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Account role. Only `ADMIN` may use the `/admin` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Courier,
    Recipient,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Courier => "COURIER",
            Self::Recipient => "RECIPIENT",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "COURIER" => Ok(Self::Courier),
            "RECIPIENT" => Ok(Self::Recipient),
            other => Err(CoreError::Validation(format!(
                "invalid role '{other}', expected ADMIN, COURIER or RECIPIENT"
            ))),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn role_labels_round_trip() {
        for role in [UserRole::Admin, UserRole::Courier, UserRole::Recipient] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert_eq!(
            serde_json::to_string(&UserRole::Courier).unwrap(),
            "\"COURIER\""
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_matches!("admin".parse::<UserRole>(), Err(CoreError::Validation(_)));
        assert_matches!("".parse::<UserRole>(), Err(CoreError::Validation(_)));
    }
}
