//! External image provider client.
//!
//! The provider is queried at most once per cache miss and its quota is tight
//! (50 requests/hour on the demo tier), so callers go through the resolver's
//! single-permit gate rather than hitting this client concurrently.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use arbora_core::AppConfig;

/// Provider call errors. All of them are non-fatal to the resolver, which
/// falls back to a placeholder URL.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider rate limit exceeded")]
    RateLimited,

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// A resolved display image.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub url: String,
}

/// Seam for the external image search service.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Resolve a single query to one image URL.
    async fn search(&self, query: &str) -> Result<ResolvedImage, ProviderError>;
}

/// Unsplash search API client.
pub struct UnsplashClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(base_url: String, access_key: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for image provider")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let access_key = config
            .provider_access_key
            .clone()
            .context("IMAGE_PROVIDER_ACCESS_KEY is not configured")?;
        Self::new(
            config.provider_base_url.clone(),
            access_key,
            Duration::from_secs(config.provider_timeout_secs),
        )
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    small: Option<String>,
    regular: Option<String>,
}

#[async_trait]
impl ImageProvider for UnsplashClient {
    async fn search(&self, query: &str) -> Result<ResolvedImage, ProviderError> {
        let response = self
            .http
            .get(format!("{}/search/photos", self.base_url))
            .query(&[("query", query), ("per_page", "1")])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .send()
            .await?;

        let status = response.status();
        // Unsplash reports an exhausted quota as 403, generic throttling as 429.
        if status.as_u16() == 403 || status.as_u16() == 429 {
            tracing::warn!(query, status = status.as_u16(), "Image provider rate limited");
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed(format!("no results for '{}'", query)))?;

        let url = first
            .urls
            .small
            .or(first.urls.regular)
            .ok_or_else(|| ProviderError::Malformed("result without usable URL".to_string()))?;

        tracing::debug!(query, url = %url, "Image provider resolved");
        Ok(ResolvedImage { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let json = r#"{"results":[{"urls":{"small":"https://images.unsplash.com/a?w=400","regular":"https://images.unsplash.com/a"}}]}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(
            parsed.results[0].urls.small.as_deref(),
            Some("https://images.unsplash.com/a?w=400")
        );
    }

    #[test]
    fn test_response_parsing_tolerates_missing_urls() {
        let json = r#"{"results":[{"urls":{}}]}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.results[0].urls.small.is_none());
        assert!(parsed.results[0].urls.regular.is_none());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = UnsplashClient::new(
            "https://api.unsplash.com/".to_string(),
            "test-key".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.unsplash.com");
    }
}
