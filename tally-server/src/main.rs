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

use tally_auth::{JwtValidator, SessionIssuer};
use tally_identity::{LogMailer, Mailer, SmtpMailer};

use std::error::Error;
use std::sync::Arc;

use log::{info, warn};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = tally_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = tally_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting tally-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../crates/tally-db/migrations")
        .run(&pool)
        .await?;
    info!("Migrations complete");

    // Session credentials (validate() ensures the secret is present)
    let Some(ref jwt_secret) = config.auth.jwt_secret else {
        unreachable!("validate() ensures auth.jwt_secret is set")
    };
    let sessions = Arc::new(SessionIssuer::with_hs256(
        jwt_secret.as_bytes(),
        config.auth.session_ttl_secs,
    ));
    let validator = Arc::new(JwtValidator::with_hs256(jwt_secret.as_bytes()));
    info!("Session issuer ready (HS256)");

    // Verification-mail delivery
    let mailer: Arc<dyn Mailer> = match config.mail.smtp_host {
        Some(ref host) => {
            info!("Mailer: SMTP via {}:{}", host, config.mail.smtp_port);
            Arc::new(SmtpMailer::new(
                host,
                config.mail.smtp_port,
                &config.mail.smtp_username,
                &config.mail.smtp_password,
                &config.mail.from_address,
            )?)
        }
        None => {
            warn!("No SMTP relay configured - verification links go to the log");
            Arc::new(LogMailer)
        }
    };

    // Build application state
    let app_state = AppState {
        pool,
        sessions,
        validator,
        mailer,
        link_base_url: config.mail.link_base_url.clone(),
    };

    // Build router
    let app = build_router(app_state);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Start server with graceful shutdown on SIGINT
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down"),
                Err(e) => warn!("Failed to listen for SIGINT: {}", e),
            }
        })
        .await?;

    info!("Graceful shutdown complete");

    Ok(())
}
