//! Storage abstraction trait
//!
//! Defines the contract all object-store backends implement. The upload
//! pipeline only ever talks to `dyn Storage`; nothing above this trait knows
//! whether bytes land on a local disk or an S3-compatible service.

use async_trait::async_trait;
use thiserror::Error;

use arbora_core::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Binary object store abstraction.
///
/// Keys follow the format documented at the crate root. `put` is the only
/// write the pipeline performs; a successful `put` means the object is
/// durable and its public URL is stable.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an object under `key` and return its public URL.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Fetch an object's bytes by key.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by key.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL an object would be served from, without touching the store.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
