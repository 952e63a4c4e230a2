//! Configuration module
//!
//! Environment-driven configuration for the pipeline and resolver, with
//! defaults that match the shipped upload policy. `.env` files are honored
//! via dotenvy; explicit environment variables win.

use std::env;
use std::str::FromStr;

use crate::constants;
use crate::storage_types::StorageBackend;

const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.unsplash.com";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase Storage, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload policy
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
    // Compression targets
    pub compressed_ceiling_bytes: usize,
    pub max_image_edge: u32,
    // Resolved-image cache
    pub image_cache_ttl_days: i64,
    // External image provider
    pub provider_base_url: String,
    pub provider_access_key: Option<String>,
    pub provider_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or_default(),
            storage_backend: opt_var("STORAGE_BACKEND")
                .map(|s| StorageBackend::from_str(&s))
                .transpose()?,
            s3_bucket: opt_var("S3_BUCKET"),
            s3_region: opt_var("S3_REGION"),
            s3_endpoint: opt_var("S3_ENDPOINT"),
            local_storage_path: opt_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: opt_var("LOCAL_STORAGE_BASE_URL"),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", constants::MAX_UPLOAD_BYTES)?,
            allowed_content_types: list_var(
                "ALLOWED_CONTENT_TYPES",
                &constants::ALLOWED_CONTENT_TYPES,
            ),
            compressed_ceiling_bytes: parse_var(
                "COMPRESSED_CEILING_BYTES",
                constants::COMPRESSED_CEILING_BYTES,
            )?,
            max_image_edge: parse_var("MAX_IMAGE_EDGE", constants::MAX_IMAGE_EDGE)?,
            image_cache_ttl_days: parse_var(
                "IMAGE_CACHE_TTL_DAYS",
                constants::IMAGE_CACHE_TTL_DAYS,
            )?,
            provider_base_url: opt_var("IMAGE_PROVIDER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string()),
            provider_access_key: opt_var("IMAGE_PROVIDER_ACCESS_KEY"),
            provider_timeout_secs: parse_var(
                "IMAGE_PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the loaded configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.compressed_ceiling_bytes == 0 {
            anyhow::bail!("COMPRESSED_CEILING_BYTES must be greater than zero");
        }
        if self.compressed_ceiling_bytes > self.max_upload_bytes {
            anyhow::bail!(
                "COMPRESSED_CEILING_BYTES ({}) exceeds MAX_UPLOAD_BYTES ({})",
                self.compressed_ceiling_bytes,
                self.max_upload_bytes
            );
        }
        if self.allowed_content_types.is_empty() {
            anyhow::bail!("ALLOWED_CONTENT_TYPES must not be empty");
        }
        if self.max_image_edge == 0 {
            anyhow::bail!("MAX_IMAGE_EDGE must be greater than zero");
        }
        if self.image_cache_ttl_days <= 0 {
            anyhow::bail!("IMAGE_CACHE_TTL_DAYS must be positive");
        }
        match self.storage_backend {
            Some(StorageBackend::S3) => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("STORAGE_BACKEND=s3 requires S3_BUCKET");
                }
            }
            Some(StorageBackend::Local) => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH");
                }
            }
            None => {}
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            storage_backend: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: None,
            max_upload_bytes: constants::MAX_UPLOAD_BYTES,
            allowed_content_types: constants::ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            compressed_ceiling_bytes: constants::COMPRESSED_CEILING_BYTES,
            max_image_edge: constants::MAX_IMAGE_EDGE,
            image_cache_ttl_days: constants::IMAGE_CACHE_TTL_DAYS,
            provider_base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            provider_access_key: None,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

fn opt_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match opt_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e)),
        None => Ok(default),
    }
}

fn list_var(name: &str, default: &[&str]) -> Vec<String> {
    match opt_var(name) {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ceiling_must_not_exceed_max_upload() {
        let config = AppConfig {
            compressed_ceiling_bytes: 10 * 1024 * 1024,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_s3_backend_requires_bucket() {
        let config = AppConfig {
            storage_backend: Some(StorageBackend::S3),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            storage_backend: Some(StorageBackend::S3),
            s3_bucket: Some("arbora-media".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let config = AppConfig {
            storage_backend: Some(StorageBackend::Local),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
