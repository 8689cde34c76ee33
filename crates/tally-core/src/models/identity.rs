//! Identity entity - the single stable reference for all owned data.

use crate::IdentityKind;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logical account. Expenses, splits and settlements reference an identity
/// by `id` only; `id` never changes once assigned, even across promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub kind: IdentityKind,
    /// Opaque per-installation identifier; unique among guest/claimed identities
    pub device_anchor: Option<String>,
    /// Verified email, stored normalized (trimmed, lowercased); unique when present
    pub email: Option<String>,
    pub display_name: String,
    /// Whether the "claim your account" nudge was dismissed on this device
    pub upgrade_prompt_dismissed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a guest identity anchored to a device installation
    pub fn new_guest(device_anchor: &str, display_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind: IdentityKind::Guest,
            device_anchor: Some(device_anchor.to_string()),
            email: None,
            display_name: display_name.to_string(),
            upgrade_prompt_dismissed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a full identity from a verified email with no device history.
    /// The initial display name is derived from the address's local part.
    pub fn new_full(email: &str) -> Self {
        let now = Utc::now();
        let display_name = email
            .split('@')
            .next()
            .unwrap_or(email)
            .to_string();
        Self {
            id: Uuid::new_v4(),
            kind: IdentityKind::Full,
            device_anchor: None,
            email: Some(email.to_string()),
            display_name,
            upgrade_prompt_dismissed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Promote a guest to claimed: gains a verified email, keeps id and
    /// device anchor untouched.
    pub fn promote_to_claimed(&mut self, email: &str) {
        self.kind = IdentityKind::Claimed;
        self.email = Some(email.to_string());
        self.updated_at = Utc::now();
    }

    /// Check if this identity is still an unclaimed guest
    pub fn is_guest(&self) -> bool {
        self.kind == IdentityKind::Guest
    }

    /// Check if this identity carries a verified email
    pub fn has_verified_email(&self) -> bool {
        self.email.is_some()
    }
}
