use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{KeyValueStore, StorageError};

// ============================================================================
// JSON Collection - a whole `Vec<T>` stored under one key
// ============================================================================
//
// Every read loads the entire collection and every write replaces it.
// Callers that read-modify-write must serialize themselves (the
// repositories hold a mutex around the cycle).
//
// ============================================================================

pub struct JsonCollection<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the full collection. A missing record is an empty collection.
    pub async fn load(&self) -> Result<Vec<T>, StorageError> {
        match self.store.get(&self.key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the full collection.
    ///
    /// Serialization happens before the store is touched, so a value that
    /// cannot be encoded never results in a write.
    pub async fn save(&self, items: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items)?;
        self.store.set(&self.key, &json).await?;

        tracing::debug!(key = %self.key, count = items.len(), "Saved collection");
        Ok(())
    }

    /// Drop the record entirely.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
    }

    #[tokio::test]
    async fn test_missing_collection_loads_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let items: JsonCollection<Item> = JsonCollection::new(store, "items");
        assert!(items.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let items: JsonCollection<Item> = JsonCollection::new(store.clone(), "items");

        items
            .save(&[Item { name: "a".into() }, Item { name: "b".into() }])
            .await
            .unwrap();
        items.save(&[Item { name: "c".into() }]).await.unwrap();

        let loaded = items.load().await.unwrap();
        assert_eq!(loaded, vec![Item { name: "c".into() }]);

        items.clear().await.unwrap();
        assert!(store.get("items").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_serialization_error() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("items", "{not json").await.unwrap();

        let items: JsonCollection<Item> = JsonCollection::new(store, "items");
        assert!(matches!(items.load().await, Err(StorageError::Serialization(_))));
    }
}
