use tally_core::Identity;

use serde::Serialize;

/// Identity DTO for JSON serialization
#[derive(Debug, Serialize)]
pub struct IdentityDto {
    pub id: String,
    pub kind: String,
    pub display_name: String,
    pub email: Option<String>,
    pub device_anchor: Option<String>,
    pub upgrade_prompt_dismissed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Identity> for IdentityDto {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            kind: identity.kind.as_str().to_string(),
            display_name: identity.display_name,
            email: identity.email,
            device_anchor: identity.device_anchor,
            upgrade_prompt_dismissed: identity.upgrade_prompt_dismissed,
            created_at: identity.created_at.timestamp(),
            updated_at: identity.updated_at.timestamp(),
        }
    }
}
