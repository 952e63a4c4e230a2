//! Shared key generation for storage backends.
//!
//! Key format: `{owner_id}/{timestamp_millis}-{sanitized_original_name}`.
//! The millisecond timestamp makes keys collision-resistant per owner even
//! when the same file is uploaded twice.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const MAX_FILENAME_LEN: usize = 255;

/// Sanitize a user-supplied filename for use inside a storage key.
///
/// Strips any path components, replaces characters outside
/// `[A-Za-z0-9._-]`, and falls back to `"photo"` for degenerate names.
pub fn sanitize_filename(filename: &str) -> String {
    let base = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "photo".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches('_').is_empty() {
        "photo".to_string()
    } else {
        s
    }
}

/// Generate the storage key for a verification photo.
///
/// All backends must use this format for consistency.
pub fn verification_key(owner_id: Uuid, uploaded_at: DateTime<Utc>, original_name: &str) -> String {
    format!(
        "{}/{}-{}",
        owner_id,
        uploaded_at.timestamp_millis(),
        sanitize_filename(original_name)
    )
}
