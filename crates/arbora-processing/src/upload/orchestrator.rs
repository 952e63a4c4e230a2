//! Upload orchestrator: one candidate photo in, one durable verification out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use arbora_core::auth::AuthSession;
use arbora_core::models::{NewVerification, UploadCandidate, Verification};
use arbora_core::AppConfig;
use arbora_db::VerificationStore;
use arbora_storage::{keys, Storage};

use super::types::{UploadError, UploadProgress, UploadStage, VerificationDetails};
use crate::compression::PhotoCompressor;
use crate::exif;
use crate::validator::UploadValidator;

/// Sequences one upload attempt through validation, metadata extraction,
/// compression, the binary upload, and record creation.
///
/// At most one attempt runs per uploader instance; a second call while one is
/// in flight is rejected with [`UploadError::Busy`]. Cancellation is
/// cooperative and only honored up to the moment the binary upload starts —
/// after that the attempt runs to completion or failure so the store is never
/// left with an upload the caller believes was abandoned.
pub struct VerificationUploader {
    session: Arc<dyn AuthSession>,
    storage: Arc<dyn Storage>,
    records: Arc<dyn VerificationStore>,
    validator: UploadValidator,
    compressor: PhotoCompressor,
    progress: watch::Sender<UploadProgress>,
    in_flight: AtomicBool,
}

impl VerificationUploader {
    pub fn new(
        session: Arc<dyn AuthSession>,
        storage: Arc<dyn Storage>,
        records: Arc<dyn VerificationStore>,
        config: &AppConfig,
    ) -> Self {
        let (progress, _) = watch::channel(UploadProgress::idle());
        Self {
            session,
            storage,
            records,
            validator: UploadValidator::from_config(config),
            compressor: PhotoCompressor::from_config(config),
            progress,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Subscribe to stage/percent updates. Within one attempt the percent is
    /// monotonically non-decreasing.
    pub fn progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    /// Run one upload attempt to a terminal state.
    ///
    /// The candidate is consumed: its preview handle is released on every
    /// exit path. Replacing a selected candidate is expressed by cancelling
    /// the token of the attempt that carried it and starting a new attempt.
    pub async fn upload(
        &self,
        mut candidate: UploadCandidate,
        details: VerificationDetails,
        cancel: CancellationToken,
    ) -> Result<Verification, UploadError> {
        let owner_id = self
            .session
            .current_owner()
            .ok_or(UploadError::NotAuthenticated)?;

        let _guard = self.acquire_flight()?;
        self.progress.send_replace(UploadProgress::idle());

        let result = self.run(owner_id, &candidate, &details, &cancel).await;

        match &result {
            Ok(verification) => {
                candidate.release_preview();
                self.report_forward(UploadStage::Succeeded);
                tracing::info!(
                    id = %verification.id,
                    owner_id = %owner_id,
                    tree_name = %details.tree_name,
                    "Verification upload succeeded"
                );
            }
            Err(UploadError::Cancelled) => {
                candidate.release_preview();
                self.report_terminal(UploadStage::Cancelled);
                tracing::info!(owner_id = %owner_id, "Verification upload cancelled");
            }
            Err(e) => {
                self.report_terminal(UploadStage::Failed);
                tracing::warn!(
                    owner_id = %owner_id,
                    error = %e,
                    partial = e.is_partial_failure(),
                    "Verification upload failed"
                );
            }
        }

        result
    }

    /// Re-attempt record creation after a partial failure, reusing the photo
    /// that is already durable in the object store.
    pub async fn retry_record_creation(
        &self,
        pending: NewVerification,
    ) -> Result<Verification, UploadError> {
        let _guard = self.acquire_flight()?;
        self.report_forward(UploadStage::RecordCreating);

        match self.records.create(pending.clone()).await {
            Ok(verification) => {
                self.report_forward(UploadStage::Succeeded);
                tracing::info!(id = %verification.id, "Record creation retry succeeded");
                Ok(verification)
            }
            Err(source) => {
                self.report_terminal(UploadStage::Failed);
                Err(UploadError::RecordCreation {
                    pending: Box::new(pending),
                    source,
                })
            }
        }
    }

    async fn run(
        &self,
        owner_id: uuid::Uuid,
        candidate: &UploadCandidate,
        details: &VerificationDetails,
        cancel: &CancellationToken,
    ) -> Result<Verification, UploadError> {
        self.report_forward(UploadStage::Validating);
        self.validator.validate(candidate)?;

        ensure_live(cancel)?;
        self.report_forward(UploadStage::Extracting);
        let extracted = exif::extract_location(&candidate.data);
        if extracted.is_none() {
            tracing::debug!("No GPS data found in photo");
        }
        let location = extracted.or(details.manual_location);

        ensure_live(cancel)?;
        self.report_forward(UploadStage::Compressing);
        let compressor = self.compressor;
        let data = candidate.data.clone();
        let content_type = candidate.content_type.clone();
        // Image decode/encode is CPU-bound; run off the async pool.
        let asset = tokio::task::spawn_blocking(move || compressor.compress(&data, &content_type))
            .await
            .map_err(|e| {
                UploadError::Compression(crate::compression::CompressionError::Encode(
                    e.to_string(),
                ))
            })??;

        // Last cancellation point: once the binary upload starts, the attempt
        // runs to completion.
        ensure_live(cancel)?;
        self.report_forward(UploadStage::Uploading);
        let key = keys::verification_key(owner_id, Utc::now(), &candidate.file_name);
        let photo_url = self
            .storage
            .put(&key, &asset.content_type, asset.data.to_vec())
            .await
            .map_err(UploadError::Store)?;

        self.report_forward(UploadStage::RecordCreating);
        let new = NewVerification {
            owner_id,
            match_id: details.match_id,
            tree_name: details.tree_name.clone(),
            photo_key: key,
            photo_url,
            location,
            planted_on: details.planted_on,
            notes: details.notes.clone(),
        };

        match self.records.create(new.clone()).await {
            Ok(verification) => Ok(verification),
            Err(source) => {
                tracing::error!(
                    photo_key = %new.photo_key,
                    error = %source,
                    "Photo stored but record creation failed"
                );
                Err(UploadError::RecordCreation {
                    pending: Box::new(new),
                    source,
                })
            }
        }
    }

    fn acquire_flight(&self) -> Result<FlightGuard<'_>, UploadError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(UploadError::Busy);
        }
        Ok(FlightGuard(&self.in_flight))
    }

    fn report_forward(&self, stage: UploadStage) {
        self.progress.send_replace(UploadProgress {
            stage,
            percent: stage.percent(),
        });
    }

    /// Terminal stages keep the progress value already reached.
    fn report_terminal(&self, stage: UploadStage) {
        let percent = self.progress.borrow().percent;
        self.progress.send_replace(UploadProgress { stage, percent });
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), UploadError> {
    if cancel.is_cancelled() {
        Err(UploadError::Cancelled)
    } else {
        Ok(())
    }
}

/// Clears the in-flight flag on every exit path, panics included.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
