use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DismissRequest {
    /// Device whose "claim your account" nudge is dismissed (required)
    pub device_anchor: String,
}
