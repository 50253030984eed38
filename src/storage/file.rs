use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

// ============================================================================
// File Store - one JSON file per key
// ============================================================================
//
// Writes go to `<file>.tmp` first and are then renamed over the target,
// so a reader sees either the old record or the new one, never half of it.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

/// File-name-safe form of a key. ASCII letters, digits and `-` pass through;
/// every other byte becomes `_XX` (uppercase hex), so distinct keys never
/// share a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("_{:02X}", byte));
        }
    }
    encoded
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let written = match tokio::fs::write(&tmp, value).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("reship:orders", "[]").await.unwrap();

        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("reship:orders").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("reship_3Aorders.json").exists());
        assert!(!dir.path().join("reship_3Aorders.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_and_removed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).await.unwrap();

        assert!(store.get("nothing").await.unwrap().is_none());
        store.remove("nothing").await.unwrap();

        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_similar_keys_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.set("a:b", "colon").await.unwrap();
        store.set("a_b", "underscore").await.unwrap();
        store.set("a b", "space").await.unwrap();

        assert_eq!(store.get("a:b").await.unwrap().as_deref(), Some("colon"));
        assert_eq!(store.get("a_b").await.unwrap().as_deref(), Some("underscore"));
        assert_eq!(store.get("a b").await.unwrap().as_deref(), Some("space"));
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("reship:orders"), "reship_3Aorders");
        assert_eq!(encode_key("a_b"), "a_5Fb");
        assert_eq!(encode_key("São"), "S_C3_A3o");
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        // A directory sitting at the target path makes the rename fail.
        let target = dir.path().join("blocked.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inner"), "x").unwrap();

        assert!(store.set("blocked", "value").await.is_err());
        assert!(!dir.path().join("blocked.json.tmp").exists());
    }
}
