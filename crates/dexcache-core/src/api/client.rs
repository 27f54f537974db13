//! API client for the creature-data REST API.
//!
//! Every call made through an `ApiClient` (and its clones) bumps a shared
//! request counter, which the session exposes for diagnostics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{NameListingResponse, Pokemon, SpeciesInfo, TypeResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public API
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("dexcache/", env!("CARGO_PKG_VERSION"));

/// API client for the creature-data service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling,
/// and clones share one request counter.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    request_count: Arc<AtomicU64>,
}

impl ApiClient {
    /// Create a client against the public API
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(
            DEFAULT_API_BASE_URL,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a client against an arbitrary base URL (mirrors, test servers)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Number of network requests issued so far.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let count = self.request_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(url = %url, request_count = count, "GET");

        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", url, e)))
    }

    // ===== Data Fetching Methods =====

    /// Fetch one record by numeric id or name
    pub async fn fetch_pokemon(&self, id_or_name: &str) -> Result<Pokemon, ApiError> {
        let url = self.endpoint(&["pokemon", id_or_name])?;
        self.get(url).await
    }

    /// Fetch species metadata by numeric id
    pub async fn fetch_species(&self, id: u32) -> Result<SpeciesInfo, ApiError> {
        let url = self.endpoint(&["pokemon-species", &id.to_string()])?;
        self.get(url).await
    }

    /// Fetch the members of an elemental type
    pub async fn fetch_type(&self, name: &str) -> Result<TypeResponse, ApiError> {
        let url = self.endpoint(&["type", name])?;
        self.get(url).await
    }

    /// Fetch the ordered listing of record names, capped at `limit`
    pub async fn fetch_name_listing(&self, limit: u32) -> Result<NameListingResponse, ApiError> {
        let mut url = self.endpoint(&["pokemon"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get(url).await
    }
}
