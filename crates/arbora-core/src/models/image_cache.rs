//! Resolved-image cache entry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One cached resolution of a tree name to a display image URL.
///
/// Keys are case-sensitive tree names. An entry is valid for exactly the
/// configured TTL window from `fetched_at`; outside that window it is treated
/// as absent and pruned on the next read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ImageCacheEntry {
    pub tree_name: String,
    pub image_url: String,
    pub fetched_at: DateTime<Utc>,
}

impl ImageCacheEntry {
    pub fn new(tree_name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            tree_name: tree_name.into(),
            image_url: image_url.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Whether the entry is still inside its validity window at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}
