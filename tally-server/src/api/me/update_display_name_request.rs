use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateDisplayNameRequest {
    /// New display name (required)
    pub display_name: String,
}
