use crate::{AuthError, Claims, Result as AuthErrorResult};

use tally_core::Identity;

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

/// Mints opaque session credentials (HS256 JWTs).
///
/// Stateless with respect to identity: nothing is stored per session, and
/// every call produces an independent credential (fresh `jti`), even for
/// back-to-back issuances against the same identity.
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl SessionIssuer {
    /// Create issuer with HS256 (symmetric secret)
    pub fn with_hs256(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issue a fresh credential for a resolved identity
    #[track_caller]
    pub fn issue(&self, identity: &Identity) -> AuthErrorResult<String> {
        if identity.id.is_nil() {
            return Err(AuthError::IncompleteIdentity {
                message: "identity id is nil".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id.to_string(),
            kind: identity.kind.as_str().to_string(),
            exp: now + self.ttl_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::JwtEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
