pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod state;

pub use api::{
    auth::{
        auth::{guest_auth, redeem_token, request_verification},
        guest_auth_request::GuestAuthRequest,
        identity_dto::IdentityDto,
        redeem_token_request::RedeemTokenRequest,
        request_verification_request::RequestVerificationRequest,
        session_response::SessionResponse,
        verification_requested_response::VerificationRequestedResponse,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::session::CurrentIdentity,
    me::{
        identity_response::IdentityResponse,
        me::{get_me, update_display_name},
        update_display_name_request::UpdateDisplayNameRequest,
    },
    upgrade_prompt::{
        acknowledge_response::AcknowledgeResponse, dismiss_request::DismissRequest,
        upgrade_prompt::dismiss_upgrade_prompt,
    },
};

pub use crate::routes::build_router;
pub use crate::state::AppState;
