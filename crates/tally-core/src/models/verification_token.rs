//! Verification token entity - single-use, time-boxed magic-link credential.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A magic-link token. Redeemable iff unused and unexpired; marked used
/// exactly once. Expired tokens stay on record for audit, permanently dead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// High-entropy random value, globally unique
    pub token: String,
    /// The address this token authorizes (normalized)
    pub email: String,
    /// Set when issued to claim an existing guest identity
    pub bound_identity_id: Option<Uuid>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Fixed redemption window
    pub const TTL_SECS: i64 = 15 * 60;

    /// Create a fresh token around an already-minted value.
    /// `expires_at` is always `created_at + TTL_SECS`.
    pub fn new(token_value: String, email: &str, bound_identity_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            token: token_value,
            email: email.to_string(),
            bound_identity_id,
            used: false,
            created_at: now,
            expires_at: now + Duration::seconds(Self::TTL_SECS),
        }
    }

    /// Check if the redemption window has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check if this token can still be redeemed
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired(now)
    }
}
