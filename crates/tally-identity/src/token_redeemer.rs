//! Token redemption - the claim/sign-in state machine.
//!
//! `PENDING -> REDEEMED` is the only legal transition and it commits
//! jointly with the identity mutation it authorizes: a crash between the
//! two steps can never leave a used token without its promoted identity,
//! or the reverse.

use crate::{IdentityError, Result as IdentityResult};

use tally_core::{Identity, VerificationToken};
use tally_db::{DbError, IdentityRepository, TokenRepository};

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use sqlx::SqlitePool;

pub struct TokenRedeemer {
    pool: SqlitePool,
}

impl TokenRedeemer {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Redeem a raw token: validate, flip unused->used, and resolve the
    /// identity the session will be issued for. Terminal failures
    /// (not-found, expired, already-used) require a new token; retrying
    /// the same token always fails with `TokenAlreadyUsed`.
    pub async fn redeem(&self, raw_token: &str) -> IdentityResult<Identity> {
        let raw_token = raw_token.trim();

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let Some(token) = TokenRepository::find_by_value_tx(&mut tx, raw_token).await? else {
            return Err(IdentityError::TokenNotFound {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if token.used {
            return Err(IdentityError::TokenAlreadyUsed {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if token.is_expired(Utc::now()) {
            // Permanently dead but kept on record; the row is not touched.
            return Err(IdentityError::TokenExpired {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Compare-and-set: a concurrent redemption may have won since the
        // read above. The loser's transaction rolls back on drop.
        if !TokenRepository::mark_used(&mut tx, raw_token).await? {
            return Err(IdentityError::TokenAlreadyUsed {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let identity = resolve_identity(&mut tx, &token).await?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(identity)
    }
}

/// Identity resolution for a successfully consumed token, inside the same
/// transaction as the used-flag flip.
async fn resolve_identity(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    token: &VerificationToken,
) -> IdentityResult<Identity> {
    if let Some(bound_id) = token.bound_identity_id {
        if let Some(bound) = IdentityRepository::find_by_id_tx(tx, bound_id).await? {
            if bound.is_guest() {
                // The email unique key may already be held elsewhere;
                // sign-in to that identity wins over promotion.
                if let Some(existing) = IdentityRepository::find_by_email_tx(tx, &token.email).await?
                {
                    return Ok(existing);
                }

                if IdentityRepository::promote_to_claimed(tx, bound.id, &token.email).await? {
                    match IdentityRepository::find_by_id_tx(tx, bound.id).await? {
                        Some(promoted) => return Ok(promoted),
                        None => {
                            return Err(IdentityError::from(DbError::Initialization {
                                message: "identity vanished during promotion".to_string(),
                                location: ErrorLocation::from(Location::caller()),
                            }));
                        }
                    }
                }
                // Lost a concurrent promotion; fall through to the email flow.
            } else if bound.email.as_deref() == Some(token.email.as_str()) {
                // Already claimed with this address: a repeat sign-in.
                return Ok(bound);
            }
            // Bound identity moved on with a different address: email flow.
        }
        // Dangling binding: email flow.
    }

    if let Some(existing) = IdentityRepository::find_by_email_tx(tx, &token.email).await? {
        return Ok(existing);
    }

    let fresh = Identity::new_full(&token.email);
    IdentityRepository::insert_if_absent_tx(tx, &fresh).await?;

    match IdentityRepository::find_by_email_tx(tx, &token.email).await? {
        Some(identity) => Ok(identity),
        None => Err(IdentityError::from(DbError::Initialization {
            message: "identity for email vanished after insert".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })),
    }
}
