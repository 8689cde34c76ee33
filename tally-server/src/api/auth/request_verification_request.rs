use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RequestVerificationRequest {
    /// Address the magic link is sent to (required)
    pub email: String,

    /// When set and resolving to a guest identity, the issued token claims
    /// that identity; otherwise this is a plain email sign-in
    #[serde(default)]
    pub device_anchor: Option<String>,
}
