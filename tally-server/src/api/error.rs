//! REST API error types
//!
//! These errors are designed to produce consistent JSON responses
//! with appropriate HTTP status codes.

use tally_auth::AuthError;
use tally_core::FieldError;
use tally_db::DbError;
use tally_identity::IdentityError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body with code, message, and per-field details
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "TOKEN_EXPIRED", "VALIDATION_ERROR")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-level failures for validation errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Validation error (400)
    #[error("Validation failed: {} field(s) invalid {location}", .errors.len())]
    Validation {
        errors: Vec<FieldError>,
        location: ErrorLocation,
    },

    /// Verification token unknown (404)
    #[error("Verification token not found {location}")]
    TokenNotFound { location: ErrorLocation },

    /// Verification token past its window (410)
    #[error("Verification token expired {location}")]
    TokenExpired { location: ErrorLocation },

    /// Verification token consumed before (409)
    #[error("Verification token already used {location}")]
    TokenAlreadyUsed { location: ErrorLocation },

    /// Missing or invalid session credential (401)
    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log the error with location for debugging
        log::error!("{}", self);

        let (status, body) = match self {
            ApiError::NotFound { message, .. } => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".into(),
                    message,
                    fields: Vec::new(),
                },
            ),
            ApiError::Validation { errors, .. } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".into(),
                    message: "One or more fields failed validation".into(),
                    fields: errors,
                },
            ),
            ApiError::TokenNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "TOKEN_NOT_FOUND".into(),
                    message: "This sign-in link is not recognized; request a new one".into(),
                    fields: Vec::new(),
                },
            ),
            ApiError::TokenExpired { .. } => (
                StatusCode::GONE,
                ApiErrorBody {
                    code: "TOKEN_EXPIRED".into(),
                    message: "This sign-in link has expired; request a new one".into(),
                    fields: Vec::new(),
                },
            ),
            ApiError::TokenAlreadyUsed { .. } => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "TOKEN_ALREADY_USED".into(),
                    message: "This sign-in link was already used".into(),
                    fields: Vec::new(),
                },
            ),
            ApiError::Unauthorized { message, .. } => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".into(),
                    message,
                    fields: Vec::new(),
                },
            ),
            ApiError::Internal { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".into(),
                    message,
                    fields: Vec::new(),
                },
            ),
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Convert identity-flow errors to API errors
impl From<IdentityError> for ApiError {
    #[track_caller]
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Validation { errors, .. } => ApiError::Validation {
                errors,
                location: ErrorLocation::from(Location::caller()),
            },
            IdentityError::TokenNotFound { .. } => ApiError::TokenNotFound {
                location: ErrorLocation::from(Location::caller()),
            },
            IdentityError::TokenExpired { .. } => ApiError::TokenExpired {
                location: ErrorLocation::from(Location::caller()),
            },
            IdentityError::TokenAlreadyUsed { .. } => ApiError::TokenAlreadyUsed {
                location: ErrorLocation::from(Location::caller()),
            },
            IdentityError::Storage { source, .. } => {
                // Don't expose internal database details to clients
                log::error!("Storage error: {}", source);
                ApiError::Internal {
                    message: "Storage operation failed".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

/// Convert session credential errors to API errors
impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::IncompleteIdentity { message, .. } => ApiError::Internal {
                message: format!("Session issuance failed: {}", message),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthError::TokenExpired { .. } => ApiError::Unauthorized {
                message: "Session expired".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthError::MissingHeader { .. } => ApiError::Unauthorized {
                message: "Missing authorization header".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthError::InvalidScheme { .. } => ApiError::Unauthorized {
                message: "Authorization scheme must be Bearer".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            AuthError::JwtEncode { source, .. } => {
                log::error!("JWT encode error: {}", source);
                ApiError::Internal {
                    message: "Session issuance failed".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
            AuthError::JwtDecode { .. } | AuthError::InvalidClaim { .. } => {
                ApiError::Unauthorized {
                    message: "Invalid session credential".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

/// Convert database errors to API errors
impl From<DbError> for ApiError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        // Log the database error for debugging
        log::error!("Database error: {}", e);

        ApiError::Internal {
            message: "Storage operation failed".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
