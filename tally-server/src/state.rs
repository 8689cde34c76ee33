use tally_auth::{JwtValidator, SessionIssuer};
use tally_identity::Mailer;

use std::sync::Arc;

use sqlx::SqlitePool;

/// Shared application state.
///
/// The identity and token stores are reached through the pool; components
/// construct their repositories per request, so tests can substitute an
/// in-memory database without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: Arc<SessionIssuer>,
    pub validator: Arc<JwtValidator>,
    pub mailer: Arc<dyn Mailer>,
    /// Base URL embedded in verification links
    pub link_base_url: String,
}
