//! The update engine: ownership-checked mutation of minted identifiers.

use std::sync::Arc;

use arklet_ark::{parse_ark, ArkError};
use thiserror::Error;

use crate::registry::{ArkMutation, Registry, RegistryError};

/// Update failures.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The identifier string did not parse.
    #[error(transparent)]
    Malformed(#[from] ArkError),

    /// The credential's authority does not own this identifier.
    #[error("credential authority does not match the identifier's authority")]
    Forbidden,

    /// No record exists for this identifier.
    #[error("identifier not found")]
    NotFound,

    /// The registry failed.
    #[error("update failed: {0}")]
    Storage(#[source] RegistryError),
}

/// The update engine.
pub struct Updater {
    registry: Arc<dyn Registry>,
}

impl Updater {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }

    /// Overwrites the mutable fields of an existing identifier record.
    ///
    /// The credential's authority must match the identifier's parsed
    /// authority; the immutable fields (identifier, authority, shoulder,
    /// assigned name) are never touched.
    pub async fn update(
        &self,
        raw: &str,
        changes: ArkMutation,
        credential_naan: i64,
    ) -> Result<(), UpdateError> {
        let parsed = parse_ark(raw)?;

        if parsed.naan != credential_naan {
            return Err(UpdateError::Forbidden);
        }

        let updated = self
            .registry
            .update_ark(&parsed.resolver_key(), &changes)
            .await
            .map_err(UpdateError::Storage)?;

        if updated {
            Ok(())
        } else {
            Err(UpdateError::NotFound)
        }
    }
}
