//! Upload candidate and its derived compressed asset.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;

/// Temporary on-disk preview of a candidate photo.
///
/// The UI renders this file while the upload attempt runs. The handle owns
/// the file: dropping it deletes the file, so a candidate that is replaced,
/// cancelled, or uploaded never leaves a preview behind.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Write the candidate bytes to a fresh temporary file.
    pub fn create(data: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(data)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Release the preview, deleting the backing file.
    pub fn release(self) {
        // NamedTempFile removes the file on drop.
        drop(self.file);
    }
}

/// A user-supplied photo awaiting validation and upload.
///
/// Owned by the orchestrator for the duration of one attempt; discarded
/// (preview handle included) on success, cancellation, or replacement.
#[derive(Debug)]
pub struct UploadCandidate {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: String,
    preview: Option<PreviewHandle>,
}

impl UploadCandidate {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            file_name: file_name.into(),
            preview: None,
        }
    }

    /// Attach an on-disk preview of the candidate bytes.
    pub fn with_preview(mut self) -> std::io::Result<Self> {
        self.preview = Some(PreviewHandle::create(&self.data)?);
        Ok(self)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn preview_path(&self) -> Option<PathBuf> {
        self.preview.as_ref().map(|p| p.path().to_path_buf())
    }

    /// Release the preview handle, if one was attached.
    pub fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            tracing::debug!(path = %preview.path().display(), "Releasing preview handle");
            preview.release();
        }
    }
}

/// A re-encoded photo guaranteed to fit the compressed byte ceiling.
///
/// Owned by the orchestrator until handed to the storage backend; the backend
/// consumes the bytes, after which the remote object is the source of truth.
#[derive(Debug, Clone)]
pub struct CompressedAsset {
    pub data: Bytes,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
}

impl CompressedAsset {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_handle_lifecycle() {
        let candidate = UploadCandidate::new(vec![1u8, 2, 3], "image/jpeg", "acacia.jpg")
            .with_preview()
            .unwrap();
        let path = candidate.preview_path().unwrap();
        assert!(path.exists());

        let mut candidate = candidate;
        candidate.release_preview();
        assert!(!path.exists());
        // Releasing twice is a no-op.
        candidate.release_preview();
    }

    #[test]
    fn test_preview_released_on_drop() {
        let candidate = UploadCandidate::new(vec![0u8; 16], "image/png", "baobab.png")
            .with_preview()
            .unwrap();
        let path = candidate.preview_path().unwrap();
        assert!(path.exists());
        drop(candidate);
        assert!(!path.exists());
    }

    #[test]
    fn test_candidate_without_preview() {
        let candidate = UploadCandidate::new(vec![9u8; 4], "image/webp", "mango.webp");
        assert_eq!(candidate.size(), 4);
        assert!(candidate.preview_path().is_none());
    }
}
