//! Field-level input validation.
//!
//! Each API request DTO assembles its own list of `FieldError`s from the
//! checkers here; malformed input is always an error return, never a fault.

use serde::Serialize;

pub const MAX_DEVICE_ANCHOR_LENGTH: usize = 128;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 80;
pub const MAX_EMAIL_LENGTH: usize = 254;

/// A single validation failure, addressed to the offending input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a device anchor: non-empty, bounded length
pub fn check_device_anchor(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::new(
            "device_anchor",
            "device_anchor cannot be empty",
        ));
    }
    if value.len() > MAX_DEVICE_ANCHOR_LENGTH {
        return Some(FieldError::new(
            "device_anchor",
            format!(
                "device_anchor exceeds maximum length of {}",
                MAX_DEVICE_ANCHOR_LENGTH
            ),
        ));
    }
    None
}

/// Validate a display name: non-empty after trimming, bounded length
pub fn check_display_name(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::new(
            "display_name",
            "display_name cannot be empty",
        ));
    }
    if value.trim().len() > MAX_DISPLAY_NAME_LENGTH {
        return Some(FieldError::new(
            "display_name",
            format!(
                "display_name exceeds maximum length of {}",
                MAX_DISPLAY_NAME_LENGTH
            ),
        ));
    }
    None
}

/// Validate email syntax: exactly one '@', non-empty local part, domain
/// containing a dot, no whitespace, bounded length
pub fn check_email(value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new("email", "email cannot be empty"));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Some(FieldError::new(
            "email",
            format!("email exceeds maximum length of {}", MAX_EMAIL_LENGTH),
        ));
    }
    if !is_valid_email(trimmed) {
        return Some(FieldError::new(
            "email",
            format!("'{}' is not a valid email address", trimmed),
        ));
    }
    None
}

/// Structural email check; deliverability is the mailer's concern
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let parts: Vec<&str> = value.split('@').collect();
    let &[local, domain] = parts.as_slice() else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // the domain needs at least one interior dot
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Canonical form used for storage and uniqueness comparison
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
