use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GuestAuthRequest {
    /// Opaque per-installation identifier (required)
    pub device_anchor: String,

    /// Display name for a first-time device; ignored on re-authentication
    pub display_name: String,
}
