//! In-memory registry implementation.
//!
//! Primarily intended for tests, where it stands in for Postgres; also
//! usable for development. Data is lost when the process exits.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ArkMutation, ArkRecord, Naan, Registry, RegistryError};

#[derive(Default)]
struct Inner {
    arks: BTreeMap<String, ArkRecord>,
    naans: HashMap<i64, Naan>,
    keys: HashMap<Uuid, KeyEntry>,
}

struct KeyEntry {
    naan: i64,
    active: bool,
}

/// In-memory [`Registry`] backed by a [`BTreeMap`] under an [`RwLock`].
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an authority. Fixture helper.
    pub fn add_naan(&self, naan: Naan) {
        self.inner.write().naans.insert(naan.naan, naan);
    }

    /// Registers an access key bound to an authority. Fixture helper.
    pub fn add_key(&self, key: Uuid, naan: i64, active: bool) {
        self.inner.write().keys.insert(key, KeyEntry { naan, active });
    }

    /// Deactivates an access key, if present.
    pub fn deactivate_key(&self, key: Uuid) {
        if let Some(entry) = self.inner.write().keys.get_mut(&key) {
            entry.active = false;
        }
    }

    /// Number of stored identifier records.
    pub fn ark_count(&self) -> usize {
        self.inner.read().arks.len()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn create_ark(&self, record: &ArkRecord) -> Result<(), RegistryError> {
        record.verify_consistent()?;
        let mut inner = self.inner.write();
        if inner.arks.contains_key(&record.ark) {
            return Err(RegistryError::Conflict(record.ark.clone()));
        }
        inner.arks.insert(record.ark.clone(), record.clone());
        Ok(())
    }

    async fn get_ark(&self, ark: &str) -> Result<Option<ArkRecord>, RegistryError> {
        Ok(self.inner.read().arks.get(ark).cloned())
    }

    async fn update_ark(&self, ark: &str, changes: &ArkMutation) -> Result<bool, RegistryError> {
        let mut inner = self.inner.write();
        match inner.arks.get_mut(ark) {
            Some(record) => {
                record.url = changes.url.clone();
                record.metadata = changes.metadata.clone();
                record.commitment = changes.commitment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_naan(&self, naan: i64) -> Result<Option<Naan>, RegistryError> {
        Ok(self.inner.read().naans.get(&naan).cloned())
    }

    async fn naan_for_key(&self, key: Uuid) -> Result<Option<i64>, RegistryError> {
        Ok(self
            .inner
            .read()
            .keys
            .get(&key)
            .filter(|entry| entry.active)
            .map(|entry| entry.naan))
    }

    async fn health_check(&self) -> Result<(), RegistryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ark: &str) -> ArkRecord {
        ArkRecord {
            ark: ark.to_string(),
            naan: 1,
            shoulder: "/t2".to_string(),
            assigned_name: ark
                .strip_prefix("1/t2")
                .unwrap_or_default()
                .to_string(),
            url: String::new(),
            metadata: String::new(),
            commitment: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let registry = MemoryRegistry::new();
        registry.create_ark(&record("1/t2abc")).await.unwrap();
        let found = registry.get_ark("1/t2abc").await.unwrap();
        assert_eq!(found.unwrap().ark, "1/t2abc");
    }

    #[tokio::test]
    async fn test_create_if_absent_conflicts() {
        let registry = MemoryRegistry::new();
        registry.create_ark(&record("1/t2abc")).await.unwrap();
        let err = registry.create_ark(&record("1/t2abc")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(registry.ark_count(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_inconsistent_record() {
        let registry = MemoryRegistry::new();
        let mut bad = record("1/t2abc");
        bad.assigned_name = "other".to_string();
        let err = registry.create_ark(&bad).await.unwrap_err();
        assert!(matches!(err, RegistryError::Inconsistent { .. }));
        assert_eq!(registry.ark_count(), 0);
    }

    #[tokio::test]
    async fn test_update_overwrites_mutable_fields_only() {
        let registry = MemoryRegistry::new();
        registry.create_ark(&record("1/t2abc")).await.unwrap();
        let changes = ArkMutation {
            url: "https://example.com/item".to_string(),
            metadata: "m".to_string(),
            commitment: "c".to_string(),
        };
        assert!(registry.update_ark("1/t2abc", &changes).await.unwrap());

        let updated = registry.get_ark("1/t2abc").await.unwrap().unwrap();
        assert_eq!(updated.url, "https://example.com/item");
        assert_eq!(updated.assigned_name, "abc");
        assert_eq!(updated.shoulder, "/t2");
    }

    #[tokio::test]
    async fn test_update_absent_returns_false() {
        let registry = MemoryRegistry::new();
        let updated = registry
            .update_ark("1/t2missing", &ArkMutation::default())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_inactive_key_is_absent() {
        let registry = MemoryRegistry::new();
        let key = Uuid::new_v4();
        registry.add_key(key, 7, true);
        assert_eq!(registry.naan_for_key(key).await.unwrap(), Some(7));

        registry.deactivate_key(key);
        assert_eq!(registry.naan_for_key(key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_key_is_absent() {
        let registry = MemoryRegistry::new();
        assert_eq!(registry.naan_for_key(Uuid::new_v4()).await.unwrap(), None);
    }
}
