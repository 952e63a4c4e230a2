//! Verification upload pipeline: validate → extract → compress → store →
//! record.
//!
//! The orchestrator sequences the pipeline stages over one candidate photo
//! and owns the two-store transaction: the binary object must be durable
//! before the relational record is created, and a record-creation failure is
//! surfaced as an explicit partial-failure state rather than a generic error.

mod orchestrator;
mod types;

pub use orchestrator::VerificationUploader;
pub use types::{UploadError, UploadProgress, UploadStage, VerificationDetails};
