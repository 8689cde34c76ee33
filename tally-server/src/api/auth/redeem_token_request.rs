use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RedeemTokenRequest {
    /// Raw token value from the magic link (required)
    pub token: String,
}
