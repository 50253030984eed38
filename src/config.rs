use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::order::PricingPolicy;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, RedisStore, StorageError};

pub const CONFIG_FILE_NAME: &str = "reship.toml";
pub const CONFIG_ENV_VAR: &str = "RESHIP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub pricing: PricingPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Prefix for every record key.
    pub namespace: String,
    /// Directory for the file backend.
    pub path: String,
    pub redis_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            namespace: "reship".to_string(),
            path: "target/reship-data".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl StorageConfig {
    /// Open the configured backend.
    pub async fn open(&self) -> Result<Arc<dyn KeyValueStore>, StorageError> {
        let store: Arc<dyn KeyValueStore> = match self.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => {
                if self.path.trim().is_empty() {
                    return Err(StorageError::Config("file backend needs a `path`".to_string()));
                }
                Arc::new(FileStore::open(&self.path).await?)
            }
            StorageBackend::Redis => Arc::new(RedisStore::connect(&self.redis_url).await?),
        };

        tracing::info!(backend = ?self.backend, namespace = %self.namespace, "Storage ready");
        Ok(store)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[storage]
backend = "memory"
namespace = "reship"

[pricing]
service_fee_rate = 0.12
base_shipping = 25.0
shipping_per_kg = 8.0
customs_threshold = 50.0
customs_rate = 0.20
affiliate_rate = 0.08
actual_shipping_cost = 15.0
default_weight_kg = 1.0
"#;

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Load configuration.
///
/// Search order:
/// 1. `$RESHIP_CONFIG`
/// 2. `reship.toml` next to the executable
/// 3. `reship.toml` in the working directory
/// 4. Embedded default
pub fn load_config() -> anyhow::Result<AppConfig> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        return read_config_file(Path::new(&explicit));
    }

    for candidate in candidate_paths() {
        if candidate.exists() {
            return read_config_file(&candidate);
        }
        tracing::debug!("{} not found at: {}", CONFIG_FILE_NAME, candidate.display());
    }

    tracing::info!("Using default embedded configuration");
    Ok(parse_config(DEFAULT_CONFIG)?)
}

fn read_config_file(path: &Path) -> anyhow::Result<AppConfig> {
    tracing::info!("Loading config from: {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_config(&contents)?)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join(CONFIG_FILE_NAME));
        }
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pricing, PricingPolicy::default());
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse_config(
            r#"
            [storage]
            backend = "file"
            path = "/var/lib/reship"

            [pricing]
            actual_shipping_cost = 18.5
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, "/var/lib/reship");
        assert_eq!(config.storage.namespace, "reship");
        assert_eq!(config.pricing.actual_shipping_cost, 18.5);
        assert_eq!(config.pricing.service_fee_rate, 0.12);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(parse_config("[storage]\nbackend = \"sqlite\"").is_err());
    }

    #[tokio::test]
    async fn test_open_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            backend: StorageBackend::File,
            path: dir.path().to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };

        let store = storage.open().await.unwrap();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_file_backend_without_path_is_config_error() {
        let storage = StorageConfig {
            backend: StorageBackend::File,
            path: "  ".into(),
            ..StorageConfig::default()
        };
        assert!(matches!(storage.open().await, Err(StorageError::Config(_))));
    }
}
