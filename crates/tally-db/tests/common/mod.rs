#![allow(dead_code)]

use tally_core::{Identity, VerificationToken};

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A guest identity fixture anchored to the given device
pub fn create_test_guest(anchor: &str, display_name: &str) -> Identity {
    Identity::new_guest(anchor, display_name)
}

/// A verification token fixture whose redemption window already closed
pub fn create_expired_token(email: &str) -> VerificationToken {
    let mut token = VerificationToken::new(Uuid::new_v4().simple().to_string(), email, None);
    token.created_at = Utc::now() - Duration::hours(2);
    token.expires_at = token.created_at + Duration::seconds(VerificationToken::TTL_SECS);
    token
}
