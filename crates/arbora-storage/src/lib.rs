//! Arbora Storage Library
//!
//! Binary object store abstraction for verification photos. The `Storage`
//! trait covers the contract the upload pipeline needs — put, download,
//! delete, exists, public URL — with local-filesystem and S3-compatible
//! implementations behind features.
//!
//! # Storage key format
//!
//! Verification photos are keyed per owner with a collision-resistant
//! timestamp prefix on the sanitized original name:
//!
//! `{owner_id}/{timestamp_millis}-{sanitized_original_name}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use arbora_core::StorageBackend;
pub use factory::create_storage;
pub use keys::verification_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
