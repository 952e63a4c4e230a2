//! Shared constants for upload policy, compression targets, and caching.

/// Maximum accepted size for a candidate photo, in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Content types accepted by the upload validator, checked in declared order.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Byte ceiling for a compressed asset handed to the object store (1 MiB).
pub const COMPRESSED_CEILING_BYTES: usize = 1024 * 1024;

/// Longest edge allowed after compression; larger sources are downscaled
/// proportionally.
pub const MAX_IMAGE_EDGE: u32 = 1920;

/// Validity window for a resolved-image cache entry, in days.
pub const IMAGE_CACHE_TTL_DAYS: i64 = 7;

/// Published request quota of the external image provider.
pub const PROVIDER_HOURLY_QUOTA: u32 = 50;
pub const PROVIDER_MONTHLY_QUOTA: u32 = 5000;
