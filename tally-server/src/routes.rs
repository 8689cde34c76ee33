use crate::api::auth::auth::{guest_auth, redeem_token, request_verification};
use crate::api::me::me::{get_me, update_display_name};
use crate::api::upgrade_prompt::upgrade_prompt::dismiss_upgrade_prompt;
use crate::health;
use crate::state::AppState;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Identity core endpoints
        .route("/api/v1/auth/guest", post(guest_auth))
        .route("/api/v1/auth/email/request", post(request_verification))
        .route("/api/v1/auth/email/redeem", post(redeem_token))
        .route("/api/v1/upgrade-prompt/dismiss", post(dismiss_upgrade_prompt))
        // Session-authenticated profile endpoints
        .route("/api/v1/me", get(get_me))
        .route("/api/v1/me/display-name", patch(update_display_name))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Add shared state
        .with_state(state)
        // CORS middleware (the client apps run on their own origins)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
