//! Domain models shared across the pipeline and resolver.

pub mod candidate;
pub mod image_cache;
pub mod location;
pub mod verification;

pub use candidate::{CompressedAsset, PreviewHandle, UploadCandidate};
pub use image_cache::ImageCacheEntry;
pub use location::GeoPoint;
pub use verification::{NewVerification, Verification, VerificationStatus};
