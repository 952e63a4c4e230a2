use arbora_core::models::UploadCandidate;
use arbora_core::AppConfig;

/// Validation errors for candidate photos
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported media type: {content_type} (allowed: {allowed:?})")]
    UnsupportedContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },
}

/// Candidate photo validator
///
/// Pure policy check with no side effects: rules run in declared order and
/// the first failing rule is the reported reason.
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.max_upload_bytes,
            config.allowed_content_types.clone(),
        )
    }

    /// Validate the declared media type against the allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::UnsupportedContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate the byte size against the upload ceiling
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate a candidate: media type first, then size.
    pub fn validate(&self, candidate: &UploadCandidate) -> Result<(), ValidationError> {
        self.validate_content_type(&candidate.content_type)?;
        self.validate_file_size(candidate.size())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(
            5 * 1024 * 1024,
            vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        )
    }

    #[test]
    fn test_validate_content_type_ok() {
        let validator = test_validator();
        assert!(validator.validate_content_type("image/jpeg").is_ok());
        assert!(validator.validate_content_type("IMAGE/PNG").is_ok()); // case insensitive
        assert!(validator.validate_content_type("image/webp").is_ok());
    }

    #[test]
    fn test_validate_content_type_rejected() {
        let validator = test_validator();
        assert!(validator.validate_content_type("image/gif").is_err());
        assert!(validator.validate_content_type("video/mp4").is_err());
        assert!(validator.validate_content_type("application/pdf").is_err());
    }

    #[test]
    fn test_validate_file_size_ok() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(validator.validate_file_size(5 * 1024 * 1024).is_ok()); // at the ceiling
    }

    #[test]
    fn test_validate_file_size_too_large() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(5 * 1024 * 1024 + 1),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_file_size_empty() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_checks_type_before_size() {
        let validator = test_validator();
        // Both rules fail; the type failure must be the reported reason.
        let candidate =
            UploadCandidate::new(vec![0u8; 6 * 1024 * 1024], "video/mp4", "clip.mp4");
        assert!(matches!(
            validator.validate(&candidate),
            Err(ValidationError::UnsupportedContentType { .. })
        ));
    }

    #[test]
    fn test_validate_ok() {
        let validator = test_validator();
        let candidate = UploadCandidate::new(vec![0u8; 1024], "image/jpeg", "acacia.jpg");
        assert!(validator.validate(&candidate).is_ok());
    }
}
