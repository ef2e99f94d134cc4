use crate::feed::cache::FeedCache;
use crate::feed::types::{FeedPayload, LoadSource, LoadedFeed};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// File name appended to the configured base URL.
pub const FEED_FILE: &str = "all.json";
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// The feed could not be obtained.
///
/// Every variant means the same thing to the widget: there is no new data,
/// keep whatever is already on screen and log the reason. There is no retry.
#[derive(Debug, Error)]
pub enum FeedError {
    /// `{base_url}all.json` is not a usable http(s) URL
    #[error("Feed unavailable: invalid endpoint {0:?}")]
    InvalidEndpoint(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Feed unavailable: request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("Feed unavailable: HTTP status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Feed unavailable: request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Feed unavailable: response too large")]
    ResponseTooLarge,
    /// Body is not a feed document
    #[error("Feed unavailable: malformed feed JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build the feed URL from the configured base.
///
/// The base is used verbatim (the file name is appended without inserting a
/// slash), so `https://example.com/fc/` yields `https://example.com/fc/all.json`.
pub fn feed_endpoint(base_url: &str) -> Result<Url, FeedError> {
    let raw = format!("{}{}", base_url, FEED_FILE);
    let url = Url::parse(&raw).map_err(|_| FeedError::InvalidEndpoint(raw.clone()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(FeedError::InvalidEndpoint(raw)),
    }
}

/// Fetches the feed, consulting the durable cache first.
///
/// Cheap to clone; a clone is moved into each spawned load task.
#[derive(Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    cache: FeedCache,
    base_url: String,
    timeout: Duration,
}

impl FeedLoader {
    pub fn new(
        client: reqwest::Client,
        cache: FeedCache,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Resolve the feed: a fresh cache entry if there is one, otherwise one
    /// request to the endpoint whose result is written back to the cache.
    ///
    /// # Errors
    ///
    /// Any [`FeedError`] from the network path. A cache problem is never an
    /// error; it only forces the network path.
    pub async fn load(&self) -> Result<LoadedFeed, FeedError> {
        if let Some(payload) = self.cache.read().await {
            tracing::info!(
                articles = payload.article_data.len(),
                "Loaded feed from cache"
            );
            return Ok(LoadedFeed {
                payload,
                source: LoadSource::Cache,
            });
        }

        self.refresh().await
    }

    /// Skip the cache read and fetch from the endpoint. The result still
    /// replaces the cache entry.
    pub async fn refresh(&self) -> Result<LoadedFeed, FeedError> {
        let payload = self.fetch().await?;

        if let Err(e) = self.cache.write(&payload).await {
            tracing::warn!(error = %e, "Failed to write feed cache");
        }

        tracing::info!(
            articles = payload.article_data.len(),
            "Loaded feed from network"
        );
        Ok(LoadedFeed {
            payload,
            source: LoadSource::Network,
        })
    }

    async fn fetch(&self) -> Result<FeedPayload, FeedError> {
        let url = feed_endpoint(&self.base_url)?;
        tracing::debug!(url = %url, "Fetching feed");

        let response = tokio::time::timeout(self.timeout, self.client.get(url.clone()).send())
            .await
            .map_err(|_| FeedError::Timeout)?
            .map_err(FeedError::Network)?;

        if !response.status().is_success() {
            return Err(FeedError::HttpStatus(response.status().as_u16()));
        }

        let bytes = tokio::time::timeout(self.timeout, read_limited_bytes(response, MAX_FEED_SIZE))
            .await
            .map_err(|_| FeedError::Timeout)??;

        Ok(FeedPayload::from_json(&bytes)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FeedError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FeedError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
