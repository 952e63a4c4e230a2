//! Read-through resolved-image cache.
//!
//! Lookup order: persistent store first (fresh entry → no network), then a
//! single provider request through a one-permit gate. Failures degrade to a
//! deterministic placeholder that is never cached, so the provider is retried
//! on the next call instead of a placeholder sticking for a full TTL window.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use arbora_core::models::ImageCacheEntry;
use arbora_core::AppConfig;
use arbora_db::ImageCacheStore;

use crate::provider::{ImageProvider, ProviderError};

/// Deterministic fallback image URL for a tree name.
pub fn placeholder_url(tree_name: &str) -> String {
    format!(
        "https://placehold.co/600x400?text={}",
        utf8_percent_encode(tree_name, NON_ALPHANUMERIC)
    )
}

/// Resolves tree names to display image URLs.
///
/// Owns its store handle and provider client; constructed once per process
/// with no teardown requirement (pure read-through). Provider calls from one
/// resolver are serialized through a single-permit semaphore to respect the
/// provider's hourly ceiling.
pub struct TreeImageResolver {
    store: Arc<dyn ImageCacheStore>,
    provider: Arc<dyn ImageProvider>,
    ttl: Duration,
    provider_gate: Semaphore,
}

impl TreeImageResolver {
    pub fn new(
        store: Arc<dyn ImageCacheStore>,
        provider: Arc<dyn ImageProvider>,
        ttl_days: i64,
    ) -> Self {
        Self {
            store,
            provider,
            ttl: Duration::days(ttl_days),
            provider_gate: Semaphore::new(1),
        }
    }

    pub fn from_config(
        store: Arc<dyn ImageCacheStore>,
        provider: Arc<dyn ImageProvider>,
        config: &AppConfig,
    ) -> Self {
        Self::new(store, provider, config.image_cache_ttl_days)
    }

    /// Resolve one tree name to an image URL. Never fails: any internal
    /// error falls back to the placeholder for that name.
    pub async fn resolve(&self, tree_name: &str) -> String {
        match self.resolve_inner(tree_name).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(tree_name, error = %e, "Falling back to placeholder image");
                placeholder_url(tree_name)
            }
        }
    }

    /// Resolve a batch of names sequentially.
    ///
    /// Each resolution lands in the returned map and is also handed to
    /// `on_resolved` as it completes, so a consuming UI can render entries as
    /// they arrive. Repeated names are resolved once. The token is checked
    /// before each lookup; on cancellation the remaining names are abandoned
    /// and the entries resolved so far are returned.
    pub async fn resolve_all(
        &self,
        names: &[String],
        cancel: &CancellationToken,
        mut on_resolved: impl FnMut(&str, &str) + Send,
    ) -> HashMap<String, String> {
        let mut resolved: HashMap<String, String> = HashMap::new();

        for name in names {
            if cancel.is_cancelled() {
                tracing::debug!(
                    resolved = resolved.len(),
                    total = names.len(),
                    "Batch resolution cancelled"
                );
                break;
            }
            if resolved.contains_key(name) {
                continue;
            }

            let url = self.resolve(name).await;
            on_resolved(name, &url);
            resolved.insert(name.clone(), url);
        }

        resolved
    }

    async fn resolve_inner(&self, tree_name: &str) -> Result<String, ProviderError> {
        let now = Utc::now();

        match self.store.get(tree_name).await {
            Ok(Some(entry)) if entry.is_fresh(now, self.ttl) => {
                tracing::debug!(tree_name, "Image cache hit");
                return Ok(entry.image_url);
            }
            Ok(Some(_)) => {
                // Lazy eviction: expired entries are pruned on read.
                tracing::debug!(tree_name, "Image cache entry expired");
                if let Err(e) = self.store.remove(tree_name).await {
                    tracing::warn!(tree_name, error = %e, "Failed to prune expired cache entry");
                }
            }
            Ok(None) => {}
            Err(e) => {
                // A broken cache store must not break image display; treat as
                // a miss and go to the provider.
                tracing::warn!(tree_name, error = %e, "Image cache read failed");
            }
        }

        let permit = match self.provider_gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => return Err(ProviderError::Malformed("resolver gate closed".to_string())),
        };
        let resolved = self.provider.search(tree_name).await;
        drop(permit);
        let resolved = resolved?;

        let entry = ImageCacheEntry::new(tree_name, resolved.url.clone());
        if let Err(e) = self.store.upsert(&entry).await {
            tracing::warn!(tree_name, error = %e, "Failed to store image cache entry");
        }

        Ok(resolved.url)
    }
}
