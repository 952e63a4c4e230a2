//! Storage backend factory.

use std::sync::Arc;

use arbora_core::{AppConfig, StorageBackend};

use crate::traits::{Storage, StorageError, StorageResult};

/// Build the configured storage backend.
///
/// `STORAGE_BACKEND` selects the implementation; each backend validates the
/// settings it needs and fails fast on missing configuration.
pub async fn create_storage(config: &AppConfig) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend.ok_or_else(|| {
        StorageError::ConfigError("STORAGE_BACKEND is not configured".to_string())
    })?;

    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET is required".to_string()))?;
            let region = config
                .s3_region
                .clone()
                .unwrap_or_else(|| "us-east-1".to_string());
            let storage =
                crate::s3::S3Storage::new(bucket, region, config.s3_endpoint.clone()).await?;
            tracing::info!(backend = %backend, "Storage backend initialized");
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH is required".to_string())
            })?;
            let base_url = config
                .local_storage_base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:3000/media".to_string());
            let storage = crate::local::LocalStorage::new(base_path, base_url).await?;
            tracing::info!(backend = %backend, "Storage backend initialized");
            Ok(Arc::new(storage))
        }

        #[allow(unreachable_patterns)]
        other => Err(StorageError::ConfigError(format!(
            "Storage backend {} is not compiled in",
            other
        ))),
    }
}
