//! Profile REST API handlers
//!
//! Renaming is an explicit operation here; guest re-authentication never
//! touches the stored display name.

use crate::state::AppState;
use crate::{ApiError, ApiResult, CurrentIdentity, IdentityResponse, UpdateDisplayNameRequest};

use tally_core::validation::check_display_name;
use tally_db::IdentityRepository;

use std::panic::Location;

use axum::{Json, extract::State};
use error_location::ErrorLocation;

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/me
///
/// Resolve the presented session credential to its identity
pub async fn get_me(CurrentIdentity(identity): CurrentIdentity) -> ApiResult<Json<IdentityResponse>> {
    Ok(Json(IdentityResponse {
        identity: identity.into(),
    }))
}

/// PATCH /api/v1/me/display-name
///
/// Update the owner's display name
pub async fn update_display_name(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(request): Json<UpdateDisplayNameRequest>,
) -> ApiResult<Json<IdentityResponse>> {
    if let Some(error) = check_display_name(&request.display_name) {
        return Err(ApiError::Validation {
            errors: vec![error],
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let repo = IdentityRepository::new(state.pool.clone());
    repo.update_display_name(identity.id, request.display_name.trim())
        .await?;

    let updated = repo
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("Identity {} not found", identity.id),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(Json(IdentityResponse {
        identity: updated.into(),
    }))
}
