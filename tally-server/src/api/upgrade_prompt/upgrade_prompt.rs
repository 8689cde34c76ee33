//! Upgrade-prompt REST API handler

use crate::state::AppState;
use crate::{AcknowledgeResponse, ApiError, ApiResult, DismissRequest};

use tally_core::validation::check_device_anchor;
use tally_db::IdentityRepository;

use std::panic::Location;

use axum::{Json, extract::State};
use error_location::ErrorLocation;

/// POST /api/v1/upgrade-prompt/dismiss
///
/// Record that the "claim your account" nudge was dismissed on a device.
/// Idempotent; dismissing twice equals dismissing once.
pub async fn dismiss_upgrade_prompt(
    State(state): State<AppState>,
    Json(request): Json<DismissRequest>,
) -> ApiResult<Json<AcknowledgeResponse>> {
    if let Some(error) = check_device_anchor(&request.device_anchor) {
        return Err(ApiError::Validation {
            errors: vec![error],
            location: ErrorLocation::from(Location::caller()),
        });
    }

    IdentityRepository::new(state.pool.clone())
        .dismiss_upgrade_prompt(&request.device_anchor)
        .await?;

    Ok(Json(AcknowledgeResponse { acknowledged: true }))
}
