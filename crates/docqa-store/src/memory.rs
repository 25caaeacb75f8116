//! In-memory index storage for development and testing.
//!
//! Indexes are kept as serialized bytes so loading goes through the same
//! parsing and version checks as the file store.

use async_trait::async_trait;
use docqa_core::error::Result;
use docqa_core::models::IndexState;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ports::{validate_index_name, IndexStore, PersistedIndex};

#[derive(Debug, Clone, Default)]
pub struct MemoryIndexStore {
    indexes: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under a name, bypassing serialization
    pub fn insert_raw(&self, name: impl Into<String>, bytes: Vec<u8>) {
        self.indexes.write().unwrap_or_else(PoisonError::into_inner).insert(name.into(), bytes);
    }

    /// Number of stored indexes
    pub fn len(&self) -> usize {
        self.indexes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn save(&self, name: &str, index: &PersistedIndex) -> Result<()> {
        validate_index_name(name)?;
        let bytes = index.to_bytes()?;
        self.insert_raw(name, bytes);
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<PersistedIndex> {
        validate_index_name(name)?;
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);

        match indexes.get(name) {
            Some(bytes) => PersistedIndex::from_bytes(name, bytes),
            None => Err(docqa_core::DocqaError::IndexNotFound { name: name.to_string() }),
        }
    }

    async fn load_state(&self, name: &str) -> Result<IndexState> {
        validate_index_name(name)?;
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);

        match indexes.get(name) {
            Some(bytes) => PersistedIndex::state_from_bytes(name, bytes),
            None => Err(docqa_core::DocqaError::IndexNotFound { name: name.to_string() }),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        validate_index_name(name)?;
        Ok(self.indexes.read().unwrap_or_else(PoisonError::into_inner).contains_key(name))
    }

    async fn remove(&self, name: &str) -> Result<()> {
        validate_index_name(name)?;
        self.indexes.write().unwrap_or_else(PoisonError::into_inner).remove(name);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> =
            self.indexes.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docqa_core::models::IndexState;
    use docqa_core::DocqaError;

    fn empty_index(name: &str) -> PersistedIndex {
        PersistedIndex::new(
            IndexState {
                name: name.to_string(),
                hash: "0000000000000000".to_string(),
                built_at: Utc::now(),
                embedder: "fake".to_string(),
                chunk_count: 0,
                embedding_dim: 0,
            },
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryIndexStore::new();
        let index = empty_index("a");

        store.save("a", &index).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.exists("a").await.unwrap());
        assert_eq!(store.load("a").await.unwrap(), index);
        assert_eq!(store.load_state("a").await.unwrap(), index.state);
    }

    #[tokio::test]
    async fn test_not_found_and_corrupt() {
        let store = MemoryIndexStore::new();
        assert!(matches!(store.load("a").await, Err(DocqaError::IndexNotFound { .. })));

        store.insert_raw("a", b"[]".to_vec());
        assert!(matches!(store.load("a").await, Err(DocqaError::CorruptIndex { .. })));
        assert!(matches!(store.load_state("a").await, Err(DocqaError::CorruptIndex { .. })));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryIndexStore::new();
        let other = store.clone();

        store.save("shared", &empty_index("shared")).await.unwrap();
        assert_eq!(other.list().await.unwrap(), vec!["shared"]);

        other.remove("shared").await.unwrap();
        assert!(store.is_empty());
    }
}
