use futures::StreamExt;
use thiserror::Error;

use crate::config::{Config, IndexConfig, InstallBranchConfig, RequestMethod};
use crate::releases::classify::{classify, ChannelBundle};
use crate::releases::parser::{parse_release_map, ParseResult};

const MAX_INDEX_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching the release map.
///
/// None of these escape [`ReleaseFeed::fetch_and_classify`]; they are logged
/// and reported through [`FeedOutcome::Failed`].
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Body was not a JSON object with a `releases` map
    #[error("Malformed release map: {0}")]
    Malformed(String),
    /// The index listed no usable releases
    #[error("Release map is empty")]
    Empty,
    /// Fetching is switched off (`index.enabled = false`)
    #[error("Release index disabled")]
    Disabled,
}

/// Result of the single release fetch.
#[derive(Debug)]
pub enum FeedOutcome {
    Fetched(ChannelBundle),
    Failed(FeedError),
}

impl FeedOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FeedOutcome::Failed(_))
    }

    /// The bundle to merge; empty when the fetch failed.
    pub fn into_bundle(self) -> ChannelBundle {
        match self {
            FeedOutcome::Fetched(bundle) => bundle,
            FeedOutcome::Failed(_) => ChannelBundle::default(),
        }
    }
}

/// Client for the package index release map.
#[derive(Debug, Clone)]
pub struct ReleaseFeed {
    client: reqwest::Client,
    index: IndexConfig,
    install: InstallBranchConfig,
}

impl ReleaseFeed {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            index: config.index.clone(),
            install: config.install.clone(),
        }
    }

    /// Issues one request to the index and parses the release map.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Network`] - Connection or TLS errors
    /// - [`FeedError::Timeout`] - No complete response within `index.timeout_secs`
    /// - [`FeedError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FeedError::ResponseTooLarge`] - Body exceeded 10MB
    /// - [`FeedError::Malformed`] - Body is not a release map
    /// - [`FeedError::Empty`] - Release map has no usable versions
    /// - [`FeedError::Disabled`] - `index.enabled` is false
    pub async fn fetch_release_map(&self) -> Result<ParseResult, FeedError> {
        if !self.index.enabled {
            return Err(FeedError::Disabled);
        }

        let request = match self.index.method {
            RequestMethod::Get => self.client.get(&self.index.url),
            RequestMethod::Post => self.client.post(&self.index.url),
        }
        .header(reqwest::header::ACCEPT, "application/json");

        let timeout = self.index.timeout();
        let bytes = tokio::time::timeout(timeout, send_and_read(request))
            .await
            .map_err(|_| FeedError::Timeout(self.index.timeout_secs))??;

        let parsed = parse_release_map(&bytes).map_err(|e| FeedError::Malformed(e.to_string()))?;

        if parsed.skipped > 0 {
            tracing::debug!(
                url = %self.index.url,
                skipped = parsed.skipped,
                "Versions without usable file records skipped"
            );
        }
        if parsed.records.is_empty() {
            return Err(FeedError::Empty);
        }

        Ok(parsed)
    }

    /// Fetches, classifies, sorts and truncates the release list.
    ///
    /// Always resolves. Any failure is logged and returned as
    /// [`FeedOutcome::Failed`], whose bundle is empty.
    pub async fn fetch_and_classify(&self) -> FeedOutcome {
        match self.fetch_release_map().await {
            Ok(parsed) => {
                let total = parsed.records.len();
                let bundle = classify(parsed.records, &self.index.display_name, &self.install);
                tracing::info!(
                    url = %self.index.url,
                    versions = total,
                    weekly = bundle.weekly.len(),
                    production = bundle.production.len(),
                    "Fetched release map"
                );
                FeedOutcome::Fetched(bundle)
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.index.url,
                    error = %e,
                    "Release fetch failed, install menu will list no releases"
                );
                FeedOutcome::Failed(e)
            }
        }
    }
}

async fn send_and_read(request: reqwest::RequestBuilder) -> Result<Vec<u8>, FeedError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(FeedError::HttpStatus(response.status().as_u16()));
    }
    read_limited_bytes(response, MAX_INDEX_SIZE).await
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, FeedError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
