#![allow(dead_code)]

//! Test infrastructure for tally-server API tests

use tally_auth::{JwtValidator, SessionIssuer};
use tally_identity::LogMailer;
use tally_server::AppState;

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret-32-bytes!";

/// Create a test pool with in-memory SQLite
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");

    sqlx::migrate!("../crates/tally-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create AppState for testing
pub async fn create_test_app_state() -> AppState {
    let pool = create_test_pool().await;

    AppState {
        pool,
        sessions: Arc::new(SessionIssuer::with_hs256(TEST_JWT_SECRET, 3600)),
        validator: Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)),
        mailer: Arc::new(LogMailer),
        link_base_url: "https://tally.test/claim".to_string(),
    }
}

/// The most recently issued token value for an address; the tests read it
/// from the store since delivery is out-of-band
pub async fn latest_token_for(pool: &SqlitePool, email: &str) -> String {
    sqlx::query_scalar(
        "SELECT token FROM verification_tokens WHERE email = ? ORDER BY rowid DESC LIMIT 1",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("no verification token issued")
}

/// Insert a token whose redemption window already closed
pub async fn insert_expired_token(pool: &SqlitePool, token: &str, email: &str) {
    let created_at = Utc::now().timestamp() - 3600;
    let expires_at = created_at + 900;

    sqlx::query(
        r#"
            INSERT INTO verification_tokens (token, email, bound_identity_id, used, created_at, expires_at)
            VALUES (?, ?, NULL, 0, ?, ?)
        "#,
    )
    .bind(token)
    .bind(email)
    .bind(created_at)
    .bind(expires_at)
    .execute(pool)
    .await
    .expect("Failed to insert expired token");
}
