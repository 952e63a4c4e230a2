//! Database repositories for the data access layer
//!
//! Each repository owns one domain entity: `verification` for
//! proof-of-planting records, `image_cache` for resolved tree images. Both
//! assume read-your-writes consistency for a single client; writes are keyed
//! by owner or tree name and do not contend, so no explicit locking is used.

pub mod image_cache;
pub mod verification;

pub use image_cache::{ImageCacheRepository, ImageCacheStore};
pub use verification::{VerificationRepository, VerificationStore};
