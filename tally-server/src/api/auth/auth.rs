//! Authentication REST API handlers
//!
//! Guest device auth, magic-link request, and magic-link redemption. Each
//! successful resolution issues a fresh session credential, including for
//! previously-seen devices.

use crate::state::AppState;
use crate::{
    ApiResult, GuestAuthRequest, RedeemTokenRequest, RequestVerificationRequest, SessionResponse,
    VerificationRequestedResponse,
};

use tally_db::{IdentityRepository, TokenRepository};
use tally_identity::{DeviceResolver, TokenIssuer, TokenRedeemer};

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/auth/guest
///
/// Resolve a device anchor to its identity (creating a guest on first
/// sight) and issue a session
pub async fn guest_auth(
    State(state): State<AppState>,
    Json(request): Json<GuestAuthRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let resolver = DeviceResolver::new(IdentityRepository::new(state.pool.clone()));
    let identity = resolver
        .resolve(&request.device_anchor, &request.display_name)
        .await?;

    let session_token = state.sessions.issue(&identity)?;

    Ok(Json(SessionResponse {
        identity: identity.into(),
        session_token,
    }))
}

/// POST /api/v1/auth/email/request
///
/// Mint a verification token and dispatch the magic link out-of-band.
/// A device anchor resolving to a guest identity turns this into a claim
/// issuance; an unknown or non-guest anchor is a plain sign-in.
pub async fn request_verification(
    State(state): State<AppState>,
    Json(request): Json<RequestVerificationRequest>,
) -> ApiResult<(StatusCode, Json<VerificationRequestedResponse>)> {
    let bound_identity_id = match request.device_anchor.as_deref() {
        Some(anchor) if !anchor.trim().is_empty() => {
            IdentityRepository::new(state.pool.clone())
                .find_by_device_anchor(anchor)
                .await?
                .filter(|identity| identity.is_guest())
                .map(|identity| identity.id)
        }
        _ => None,
    };

    let issuer = TokenIssuer::new(
        TokenRepository::new(state.pool.clone()),
        Arc::clone(&state.mailer),
        &state.link_base_url,
    );
    issuer.issue(&request.email, bound_identity_id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(VerificationRequestedResponse { accepted: true }),
    ))
}

/// POST /api/v1/auth/email/redeem
///
/// Redeem a magic-link token: create or promote the identity it
/// authorizes and issue a session
pub async fn redeem_token(
    State(state): State<AppState>,
    Json(request): Json<RedeemTokenRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let redeemer = TokenRedeemer::new(state.pool.clone());
    let identity = redeemer.redeem(&request.token).await?;

    let session_token = state.sessions.issue(&identity)?;

    Ok(Json(SessionResponse {
        identity: identity.into(),
        session_token,
    }))
}
