//! Axum extractor for session-authenticated requests

use crate::ApiError;
use crate::state::AppState;

use tally_auth::AuthError;
use tally_core::Identity;
use tally_db::IdentityRepository;

use std::future::Future;
use std::panic::Location;

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use error_location::ErrorLocation;

/// Resolves the presented Bearer credential to its identity.
///
/// Credential validation is pure (claims + clock); the single store read
/// maps the subject back to a live identity row.
pub struct CurrentIdentity(pub Identity);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Some(header_value) = parts.headers.get(AUTHORIZATION) else {
                return Err(AuthError::MissingHeader {
                    location: ErrorLocation::from(Location::caller()),
                }
                .into());
            };

            let Ok(header) = header_value.to_str() else {
                return Err(AuthError::InvalidScheme {
                    location: ErrorLocation::from(Location::caller()),
                }
                .into());
            };

            let Some(token) = header.strip_prefix("Bearer ") else {
                return Err(AuthError::InvalidScheme {
                    location: ErrorLocation::from(Location::caller()),
                }
                .into());
            };

            let claims = state.validator.validate(token)?;
            let identity_id = claims.identity_id()?;

            let identity = IdentityRepository::new(state.pool.clone())
                .find_by_id(identity_id)
                .await?
                .ok_or_else(|| ApiError::Unauthorized {
                    message: "Session identity no longer exists".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            Ok(CurrentIdentity(identity))
        }
    }
}
