// ============================================================================
// Storage Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to (de)serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis failure: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage misconfigured: {0}")]
    Config(String),
}
