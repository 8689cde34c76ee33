#![allow(dead_code)]

//! Test infrastructure for the identity flows.

use tally_identity::{MailError, Mailer};

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
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

    sqlx::migrate!("../tally-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Captures dispatched verification mails instead of delivering them
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// (recipient, link) pairs in dispatch order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, to: &str, link: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), link.to_string()));
        Ok(())
    }
}

/// Insert an expense row owned by `paid_by` (the CRUD layer's table)
pub async fn insert_expense(pool: &SqlitePool, paid_by: Uuid) -> Uuid {
    let expense_id = Uuid::new_v4();
    sqlx::query(
        r#"
            INSERT INTO expenses (id, description, amount_cents, currency, paid_by, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(expense_id.to_string())
    .bind("Dinner")
    .bind(4200_i64)
    .bind("USD")
    .bind(paid_by.to_string())
    .bind(paid_by.to_string())
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await
    .expect("Failed to insert expense");

    expense_id
}

/// Insert a split membership row for an identity
pub async fn insert_split(pool: &SqlitePool, expense_id: Uuid, identity_id: Uuid) {
    sqlx::query(
        "INSERT INTO expense_splits (expense_id, identity_id, share_cents) VALUES (?, ?, ?)",
    )
    .bind(expense_id.to_string())
    .bind(identity_id.to_string())
    .bind(2100_i64)
    .execute(pool)
    .await
    .expect("Failed to insert split");
}

/// Count expenses paid by an identity
pub async fn count_expenses_paid_by(pool: &SqlitePool, identity_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE paid_by = ?")
        .bind(identity_id.to_string())
        .fetch_one(pool)
        .await
        .expect("Failed to count expenses")
}

/// Count all identity rows
pub async fn count_identities(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM identities")
        .fetch_one(pool)
        .await
        .expect("Failed to count identities")
}
