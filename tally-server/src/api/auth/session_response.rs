use crate::IdentityDto;

use serde::Serialize;

/// Resolved identity plus a freshly issued session credential
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub identity: IdentityDto,
    pub session_token: String,
}
