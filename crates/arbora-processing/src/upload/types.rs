//! Types for the verification upload pipeline.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use arbora_core::models::{GeoPoint, NewVerification};
use arbora_core::AppError;
use arbora_storage::StorageError;

use crate::compression::CompressionError;
use crate::validator::ValidationError;

/// Stages of one upload attempt, in execution order.
///
/// `Failed` and `Cancelled` are absorbing; `Cancelled` is only reachable
/// before `Uploading` (a started binary upload runs to completion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Idle,
    Validating,
    Extracting,
    Compressing,
    Uploading,
    RecordCreating,
    Succeeded,
    Failed,
    Cancelled,
}

impl UploadStage {
    /// Progress value reported when the stage begins. Values only grow along
    /// the forward path, which is what makes reported progress monotonic.
    pub(crate) fn percent(self) -> u8 {
        match self {
            UploadStage::Idle => 0,
            UploadStage::Validating => 5,
            UploadStage::Extracting => 20,
            UploadStage::Compressing => 40,
            UploadStage::Uploading => 60,
            UploadStage::RecordCreating => 85,
            UploadStage::Succeeded => 100,
            // Terminal stages keep the progress already reached; the
            // orchestrator passes that value through explicitly.
            UploadStage::Failed | UploadStage::Cancelled => 0,
        }
    }
}

/// Progress snapshot published at each stage boundary.
///
/// `percent` is monotonically non-decreasing within one attempt; it carries
/// no guarantee beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub stage: UploadStage,
    pub percent: u8,
}

impl UploadProgress {
    pub(crate) fn idle() -> Self {
        Self {
            stage: UploadStage::Idle,
            percent: 0,
        }
    }
}

/// User-entered details accompanying a candidate photo.
#[derive(Debug, Clone)]
pub struct VerificationDetails {
    pub match_id: Option<Uuid>,
    pub tree_name: String,
    pub planted_on: NaiveDate,
    pub notes: Option<String>,
    /// Manually entered coordinates, used only when the photo carries no GPS
    /// metadata.
    pub manual_location: Option<GeoPoint>,
}

/// Terminal errors of an upload attempt.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("An upload is already in progress")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error("Upload cancelled")]
    Cancelled,

    #[error("Photo upload failed: {0}")]
    Store(#[source] StorageError),

    /// The photo is durable in the object store but the record insert failed.
    /// `pending` carries the full insert payload, uploaded URL included, so
    /// the attempt can be retried record-only without re-uploading.
    #[error("Photo stored but record creation failed: {source}")]
    RecordCreation {
        pending: Box<NewVerification>,
        #[source]
        source: AppError,
    },
}

impl UploadError {
    /// Whether this failure left a durable side effect behind (stored photo
    /// without its record).
    pub fn is_partial_failure(&self) -> bool {
        matches!(self, UploadError::RecordCreation { .. })
    }

    /// Message suitable for direct display to the user.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::NotAuthenticated => "Please sign in before uploading a photo.".to_string(),
            UploadError::Busy => "Another upload is still running. Wait for it to finish.".to_string(),
            UploadError::Validation(e) => match e {
                ValidationError::UnsupportedContentType { .. } => {
                    "This file type is not supported. Use a JPEG, PNG, or WebP photo.".to_string()
                }
                ValidationError::EmptyFile => "The selected file is empty.".to_string(),
                ValidationError::FileTooLarge { max, .. } => format!(
                    "The photo is too large. The maximum size is {} MB.",
                    max / (1024 * 1024)
                ),
            },
            UploadError::Compression(_) => {
                "The photo could not be read. Try a different photo.".to_string()
            }
            UploadError::Cancelled => "Upload cancelled.".to_string(),
            UploadError::Store(_) => {
                "The photo could not be uploaded. Check your connection and try again.".to_string()
            }
            UploadError::RecordCreation { .. } => {
                "The photo was uploaded but saving the verification failed. Retry to finish without re-uploading.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_stage_percent_is_increasing() {
        let forward = [
            UploadStage::Idle,
            UploadStage::Validating,
            UploadStage::Extracting,
            UploadStage::Compressing,
            UploadStage::Uploading,
            UploadStage::RecordCreating,
            UploadStage::Succeeded,
        ];
        for pair in forward.windows(2) {
            assert!(pair[0].percent() < pair[1].percent());
        }
    }

    #[test]
    fn test_partial_failure_flag() {
        let pending = NewVerification {
            owner_id: Uuid::new_v4(),
            match_id: None,
            tree_name: "Acacia".to_string(),
            photo_key: "k".to_string(),
            photo_url: "u".to_string(),
            location: None,
            planted_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            notes: None,
        };
        let err = UploadError::RecordCreation {
            pending: Box::new(pending),
            source: AppError::Internal("insert failed".to_string()),
        };
        assert!(err.is_partial_failure());
        assert!(!UploadError::Busy.is_partial_failure());
        assert!(!UploadError::Cancelled.is_partial_failure());
    }

    #[test]
    fn test_user_messages_are_not_empty() {
        assert!(!UploadError::NotAuthenticated.user_message().is_empty());
        assert!(!UploadError::Cancelled.user_message().is_empty());
    }
}
