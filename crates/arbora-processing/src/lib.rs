//! Arbora Processing Library
//!
//! The verification media pipeline: candidate validation, GPS metadata
//! extraction, photo compression, and the upload orchestrator that sequences
//! them into one transaction against the object store and the database.

pub mod compression;
pub mod exif;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use compression::{CompressionError, PhotoCompressor};
pub use exif::extract_location;
pub use upload::{
    UploadError, UploadProgress, UploadStage, VerificationDetails, VerificationUploader,
};
pub use validator::{UploadValidator, ValidationError};
