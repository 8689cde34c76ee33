//! Verification-token repository.
//!
//! The unused-to-used transition is a compare-and-set guarded on
//! `used = 0`; two concurrent redemptions can never both observe an
//! unused token.

use crate::{DbError, Result as DbErrorResult};

use tally_core::VerificationToken;

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "token, email, bound_identity_id, used, created_at, expires_at";

pub struct TokenRepository {
    pool: SqlitePool,
}

impl TokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, token: &VerificationToken) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO verification_tokens (
                    token, email, bound_identity_id, used, created_at, expires_at
                ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&token.token)
        .bind(&token.email)
        .bind(token.bound_identity_id.map(|id| id.to_string()))
        .bind(i64::from(token.used))
        .bind(token.created_at.timestamp())
        .bind(token.expires_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_value(&self, raw_token: &str) -> DbErrorResult<Option<VerificationToken>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM verification_tokens WHERE token = ?"
        ))
        .bind(raw_token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_token(&r)).transpose()
    }

    /// Transaction-scoped lookup; pairs with `mark_used` under one commit.
    pub async fn find_by_value_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        raw_token: &str,
    ) -> DbErrorResult<Option<VerificationToken>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM verification_tokens WHERE token = ?"
        ))
        .bind(raw_token)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(|r| row_to_token(&r)).transpose()
    }

    /// Atomically flip unused to used. Returns false when another
    /// redemption already won the flip.
    ///
    /// This method REQUIRES a Transaction: the flip must commit jointly
    /// with the identity mutation it authorizes.
    pub async fn mark_used(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        raw_token: &str,
    ) -> DbErrorResult<bool> {
        let result =
            sqlx::query("UPDATE verification_tokens SET used = 1 WHERE token = ? AND used = 0")
                .bind(raw_token)
                .execute(&mut **tx)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete tokens past expiry plus the audit retention window.
    /// Redemption never deletes; this is the maintenance path.
    pub async fn purge_expired(&self, retention_secs: i64) -> DbErrorResult<u64> {
        let cutoff = Utc::now().timestamp() - retention_secs;

        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[track_caller]
fn row_to_token(row: &SqliteRow) -> DbErrorResult<VerificationToken> {
    let token: String = row.try_get("token")?;
    let email: String = row.try_get("email")?;
    let bound_identity_id: Option<String> = row.try_get("bound_identity_id")?;
    let used: i64 = row.try_get("used")?;
    let created_at: i64 = row.try_get("created_at")?;
    let expires_at: i64 = row.try_get("expires_at")?;

    Ok(VerificationToken {
        token,
        email,
        bound_identity_id: bound_identity_id
            .map(|id| {
                Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
                    message: format!(
                        "Invalid UUID in verification_tokens.bound_identity_id: {}",
                        e
                    ),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
            .transpose()?,
        used: used != 0,
        created_at: DateTime::from_timestamp(created_at, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in verification_tokens.created_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        expires_at: DateTime::from_timestamp(expires_at, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in verification_tokens.expires_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
