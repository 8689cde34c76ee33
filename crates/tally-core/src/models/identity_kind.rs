use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Identity lifecycle kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// Created via device anchor only, no email
    Guest,
    /// Guest that completed email verification (keeps id and device anchor)
    Claimed,
    /// Created directly via email verification, no device dependency
    Full,
}

impl IdentityKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Claimed => "claimed",
            Self::Full => "full",
        }
    }
}

impl FromStr for IdentityKind {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "guest" => Ok(Self::Guest),
            "claimed" => Ok(Self::Claimed),
            "full" => Ok(Self::Full),
            _ => Err(CoreError::InvalidIdentityKind {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
