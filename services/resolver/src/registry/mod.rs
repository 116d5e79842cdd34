//! The persistence collaborator for the minting, resolution, and update
//! engines.
//!
//! The engines never talk to a database directly; they depend on the
//! [`Registry`] trait, which provides exactly the capabilities they need:
//! an atomic create-if-absent keyed by the identifier string, point reads,
//! a mutable-fields-only update, and authority/credential lookups.
//!
//! Implementations:
//! - [`PgRegistry`](crate::db::PgRegistry) — Postgres via sqlx, the
//!   production backend
//! - [`MemoryRegistry`] — in-memory, for tests and development

mod memory;

pub use memory::MemoryRegistry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A Name Assigning Authority: the organization owning a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naan {
    /// The authority number (non-negative).
    pub naan: i64,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Base resolver URL, used as the fallback redirect root for
    /// identifiers this service does not hold a record for.
    pub url: String,
}

/// A persistent identifier record.
///
/// The identifier string itself is the primary key and, together with
/// `naan`, `shoulder`, and `assigned_name`, is immutable after minting.
/// Only `url`, `metadata`, and `commitment` may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArkRecord {
    /// Full identifier string: `{naan}{shoulder}{assigned_name}`.
    pub ark: String,

    /// Owning authority number.
    pub naan: i64,

    /// Shoulder string, starting with a separator (`/`).
    pub shoulder: String,

    /// The opaque name including its check character, without the
    /// authority/shoulder prefix.
    pub assigned_name: String,

    /// Bound target URL; empty means reserved but not yet redirectable.
    pub url: String,

    /// Free-form metadata.
    pub metadata: String,

    /// Free-form commitment statement.
    pub commitment: String,
}

impl ArkRecord {
    /// Verifies the structural invariant
    /// `ark == "{naan}{shoulder}{assigned_name}"`.
    ///
    /// A record violating this must never be persisted; both registry
    /// implementations call this before inserting.
    pub fn verify_consistent(&self) -> Result<(), RegistryError> {
        let expected = format!("{}{}{}", self.naan, self.shoulder, self.assigned_name);
        if self.ark == expected {
            Ok(())
        } else {
            Err(RegistryError::Inconsistent {
                ark: self.ark.clone(),
                expected,
            })
        }
    }
}

/// The mutable fields of an identifier record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArkMutation {
    pub url: String,
    pub metadata: String,
    pub commitment: String,
}

/// Errors surfaced by registry implementations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A record with this identifier already exists. The minting engine
    /// treats this as a collision and retries; it is never surfaced to
    /// callers.
    #[error("identifier already exists: {0}")]
    Conflict(String),

    /// The record's identifier string does not match its parts. Never
    /// persisted; indicates a bug in the caller.
    #[error("inconsistent record: ark '{ark}' != expected '{expected}'")]
    Inconsistent { ark: String, expected: String },

    /// Any other storage failure. Fatal for the current operation; not
    /// retried by this layer.
    #[error("storage backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

impl RegistryError {
    /// Returns true for the distinguishable uniqueness-violation error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RegistryError::Conflict(_))
    }
}

/// Storage capabilities required by the engines.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Atomically inserts a new identifier record, failing with
    /// [`RegistryError::Conflict`] if the identifier already exists.
    ///
    /// This is the only correctness-critical primitive: concurrent minters
    /// across processes rely on it being uniqueness-enforcing.
    async fn create_ark(&self, record: &ArkRecord) -> Result<(), RegistryError>;

    /// Fetches a record by its full identifier string.
    async fn get_ark(&self, ark: &str) -> Result<Option<ArkRecord>, RegistryError>;

    /// Overwrites the mutable fields of an existing record.
    ///
    /// Returns `false` if no record with this identifier exists.
    async fn update_ark(&self, ark: &str, changes: &ArkMutation) -> Result<bool, RegistryError>;

    /// Looks up an authority by number.
    async fn get_naan(&self, naan: i64) -> Result<Option<Naan>, RegistryError>;

    /// Resolves an access key to its bound authority number.
    ///
    /// Inactive keys are treated as absent.
    async fn naan_for_key(&self, key: Uuid) -> Result<Option<i64>, RegistryError>;

    /// Verifies the backend is reachable.
    async fn health_check(&self) -> Result<(), RegistryError>;
}
