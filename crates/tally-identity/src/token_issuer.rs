//! Verification-token issuance.

use crate::mailer::Mailer;
use crate::{IdentityError, Result as IdentityResult};

use tally_core::VerificationToken;
use tally_core::validation::{check_email, normalize_email};
use tally_db::TokenRepository;

use std::panic::Location;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use error_location::ErrorLocation;
use rand::Rng;
use uuid::Uuid;

/// Mints and dispatches magic-link tokens.
///
/// Each issuance is independent: outstanding tokens for the same address
/// stay valid until their own use or expiry. Delivery is handed off to the
/// mailer on a spawned task; issuance succeeds once the token row is
/// durable, whether or not the mail ever leaves the relay.
pub struct TokenIssuer {
    tokens: TokenRepository,
    mailer: Arc<dyn Mailer>,
    link_base_url: String,
}

impl TokenIssuer {
    pub fn new(tokens: TokenRepository, mailer: Arc<dyn Mailer>, link_base_url: &str) -> Self {
        Self {
            tokens,
            mailer,
            link_base_url: link_base_url.to_string(),
        }
    }

    /// Issue a token for an address. `bound_identity_id` is set when this
    /// issuance claims an existing guest identity; absent for a plain
    /// email sign-in.
    pub async fn issue(
        &self,
        email: &str,
        bound_identity_id: Option<Uuid>,
    ) -> IdentityResult<VerificationToken> {
        if let Some(error) = check_email(email) {
            return Err(IdentityError::Validation {
                errors: vec![error],
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let normalized = normalize_email(email);
        let mut token = VerificationToken::new(mint_token_value(), &normalized, bound_identity_id);
        if let Err(e) = self.tokens.create(&token).await {
            if !e.is_unique_violation() {
                return Err(e.into());
            }
            // Vanishingly unlikely value collision: mint a fresh one.
            token = VerificationToken::new(mint_token_value(), &normalized, bound_identity_id);
            self.tokens.create(&token).await?;
        }

        let link = format!("{}?token={}", self.link_base_url, token.token);
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(e) = mailer.send_verification(&normalized, &link).await {
                log::warn!("Verification mail to {} failed: {}", normalized, e);
            }
        });

        Ok(token)
    }
}

/// 32 bytes from the OS-seeded CSPRNG, URL-safe encoded; guessing is
/// computationally infeasible.
fn mint_token_value() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}
