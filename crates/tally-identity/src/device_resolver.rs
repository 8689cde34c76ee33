//! Device resolution - the read-or-create path for guest identities.

use crate::{IdentityError, Result as IdentityResult};

use tally_core::Identity;
use tally_core::validation::{check_device_anchor, check_display_name};
use tally_db::{DbError, IdentityRepository};

use std::panic::Location;

use error_location::ErrorLocation;

/// Resolves a device anchor to its one guest/claimed identity, creating a
/// fresh guest when the anchor is unseen.
///
/// A device must never resolve to two identities: creation is an
/// insert-guarded-by-unique-key, and the losing side of a concurrent
/// create recovers by re-reading the winner's row. The conflict never
/// surfaces to the caller.
pub struct DeviceResolver {
    identities: IdentityRepository,
}

impl DeviceResolver {
    pub fn new(identities: IdentityRepository) -> Self {
        Self { identities }
    }

    /// Return the identity for a device anchor, creating a guest on first
    /// sight. Repeated resolution returns the same identity unchanged:
    /// the display name from the first call wins, later names are ignored.
    pub async fn resolve(
        &self,
        device_anchor: &str,
        display_name: &str,
    ) -> IdentityResult<Identity> {
        let mut errors = Vec::new();
        if let Some(error) = check_device_anchor(device_anchor) {
            errors.push(error);
        }
        if let Some(error) = check_display_name(display_name) {
            errors.push(error);
        }
        if !errors.is_empty() {
            return Err(IdentityError::Validation {
                errors,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(existing) = self.identities.find_by_device_anchor(device_anchor).await? {
            return Ok(existing);
        }

        let fresh = Identity::new_guest(device_anchor, display_name.trim());
        self.identities.insert_if_absent(&fresh).await?;

        // Winner or loser of the race, the anchor now resolves to one row.
        match self.identities.find_by_device_anchor(device_anchor).await? {
            Some(identity) => Ok(identity),
            None => Err(IdentityError::from(DbError::Initialization {
                message: "identity for device anchor vanished after insert".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })),
        }
    }
}
