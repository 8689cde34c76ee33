use std::panic::Location;

use error_location::ErrorLocation;
use tally_core::FieldError;
use tally_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Validation failed: {} field(s) invalid {location}", .errors.len())]
    Validation {
        errors: Vec<FieldError>,
        location: ErrorLocation,
    },

    #[error("Verification token not found {location}")]
    TokenNotFound { location: ErrorLocation },

    #[error("Verification token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Verification token already used {location}")]
    TokenAlreadyUsed { location: ErrorLocation },

    #[error("Storage error: {source} {location}")]
    Storage {
        source: DbError,
        location: ErrorLocation,
    },
}

impl From<DbError> for IdentityError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Storage {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
