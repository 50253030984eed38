// ============================================================================
// Storage Layer - Named, whole-record JSON persistence
// ============================================================================
//
// The core only ever needs three operations against its environment:
// get, set and remove of a named record. Every collection (orders,
// products, activity) is stored as ONE record holding the whole JSON array.
//
// Backends:
// - memory/  - process-local map, used by tests and the demo
// - file/    - one JSON file per key in a directory
// - redis/   - GET / SET / DEL against a Redis server
//
// ============================================================================

use async_trait::async_trait;

pub mod collection;
pub mod errors;
pub mod file;
pub mod memory;
pub mod redis_store;

pub use collection::JsonCollection;
pub use errors::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Key/value persistence over named JSON records.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a record. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a record in full.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a record. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Build the namespaced key for a collection, e.g. `reship:orders`.
pub fn namespaced_key(namespace: &str, collection: &str) -> String {
    if namespace.is_empty() {
        collection.to_string()
    } else {
        format!("{}:{}", namespace, collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(namespaced_key("reship", "orders"), "reship:orders");
        assert_eq!(namespaced_key("", "orders"), "orders");
    }
}
