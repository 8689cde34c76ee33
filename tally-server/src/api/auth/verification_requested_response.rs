use serde::Serialize;

/// 202-style acknowledgement; the token travels out-of-band
#[derive(Debug, Serialize)]
pub struct VerificationRequestedResponse {
    pub accepted: bool,
}
