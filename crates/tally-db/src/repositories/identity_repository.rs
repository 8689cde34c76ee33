//! Identity repository.
//!
//! Single-row, single-operation mutations only; the one multi-step flow
//! (token redemption) composes the `_tx` methods below under one
//! transaction so token mark-used and identity mutation commit together.
//!
//! Creation races on the device-anchor and email unique keys are resolved
//! by `insert_if_absent` + re-read, never by check-then-insert.

use crate::{DbError, Result as DbErrorResult};

use tally_core::{Identity, IdentityKind};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "id, kind, device_anchor, email, display_name, \
     upgrade_prompt_dismissed, created_at, updated_at";

pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a fresh identity, failing on any uniqueness conflict.
    pub async fn create(&self, identity: &Identity) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO identities (
                    id, kind, device_anchor, email, display_name,
                    upgrade_prompt_dismissed, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(identity.id.to_string())
        .bind(identity.kind.as_str())
        .bind(&identity.device_anchor)
        .bind(&identity.email)
        .bind(&identity.display_name)
        .bind(i64::from(identity.upgrade_prompt_dismissed))
        .bind(identity.created_at.timestamp())
        .bind(identity.updated_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert unless a uniqueness key already holds; returns whether a row
    /// was written. The losing side of a concurrent create sees `false`
    /// and re-reads.
    pub async fn insert_if_absent(&self, identity: &Identity) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                INSERT INTO identities (
                    id, kind, device_anchor, email, display_name,
                    upgrade_prompt_dismissed, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT DO NOTHING
            "#,
        )
        .bind(identity.id.to_string())
        .bind(identity.kind.as_str())
        .bind(&identity.device_anchor)
        .bind(&identity.email)
        .bind(&identity.display_name)
        .bind(i64::from(identity.upgrade_prompt_dismissed))
        .bind(identity.created_at.timestamp())
        .bind(identity.updated_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM identities WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_identity(&r)).transpose()
    }

    /// Resolve the guest/claimed identity holding a device anchor. Full
    /// identities retaining an anchor opportunistically do not hold the key.
    pub async fn find_by_device_anchor(&self, anchor: &str) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM identities \
             WHERE device_anchor = ? AND kind IN ('guest', 'claimed')"
        ))
        .bind(anchor)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_identity(&r)).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM identities WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_identity(&r)).transpose()
    }

    /// The explicit profile-rename operation. Re-authentication never
    /// touches the display name.
    pub async fn update_display_name(&self, id: Uuid, display_name: &str) -> DbErrorResult<()> {
        sqlx::query("UPDATE identities SET display_name = ?, updated_at = ? WHERE id = ?")
            .bind(display_name)
            .bind(Utc::now().timestamp())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record that the "claim your account" nudge was dismissed on a device.
    /// Idempotent; an unknown anchor is still an acknowledgement.
    pub async fn dismiss_upgrade_prompt(&self, anchor: &str) -> DbErrorResult<()> {
        sqlx::query(
            "UPDATE identities SET upgrade_prompt_dismissed = 1, updated_at = ? \
             WHERE device_anchor = ? AND kind IN ('guest', 'claimed')",
        )
        .bind(Utc::now().timestamp())
        .bind(anchor)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Transaction-scoped lookup by id.
    pub async fn find_by_id_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: Uuid,
    ) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM identities WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut **tx)
        .await?;

        row.map(|r| row_to_identity(&r)).transpose()
    }

    /// Transaction-scoped lookup by normalized email.
    pub async fn find_by_email_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        email: &str,
    ) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM identities WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(|r| row_to_identity(&r)).transpose()
    }

    /// Promote a guest to claimed in place: sets kind and email, keeps id
    /// and device anchor. Guarded on `kind = 'guest'` so a concurrent
    /// promotion cannot apply twice; returns whether the row transitioned.
    ///
    /// This method REQUIRES a Transaction: it must commit jointly with the
    /// token mark-used step.
    pub async fn promote_to_claimed(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: Uuid,
        email: &str,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query(
            "UPDATE identities SET kind = 'claimed', email = ?, updated_at = ? \
             WHERE id = ? AND kind = 'guest'",
        )
        .bind(email)
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Transaction-scoped insert-unless-present; see `insert_if_absent`.
    pub async fn insert_if_absent_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        identity: &Identity,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                INSERT INTO identities (
                    id, kind, device_anchor, email, display_name,
                    upgrade_prompt_dismissed, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT DO NOTHING
            "#,
        )
        .bind(identity.id.to_string())
        .bind(identity.kind.as_str())
        .bind(&identity.device_anchor)
        .bind(&identity.email)
        .bind(&identity.display_name)
        .bind(i64::from(identity.upgrade_prompt_dismissed))
        .bind(identity.created_at.timestamp())
        .bind(identity.updated_at.timestamp())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[track_caller]
fn row_to_identity(row: &SqliteRow) -> DbErrorResult<Identity> {
    let id: String = row.try_get("id")?;
    let kind: String = row.try_get("kind")?;
    let device_anchor: Option<String> = row.try_get("device_anchor")?;
    let email: Option<String> = row.try_get("email")?;
    let display_name: String = row.try_get("display_name")?;
    let upgrade_prompt_dismissed: i64 = row.try_get("upgrade_prompt_dismissed")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    Ok(Identity {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in identities.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        kind: IdentityKind::from_str(&kind).map_err(|e| DbError::Initialization {
            message: format!("Invalid IdentityKind in identities.kind: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        device_anchor,
        email,
        display_name,
        upgrade_prompt_dismissed: upgrade_prompt_dismissed != 0,
        created_at: DateTime::from_timestamp(created_at, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in identities.created_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        updated_at: DateTime::from_timestamp(updated_at, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in identities.updated_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
