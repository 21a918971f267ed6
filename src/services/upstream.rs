//! HTTP client for the upstream CI API
//!
//! Upstream wraps payloads in a `{ "data": ... }` envelope. Lists are always
//! read from `data`; single entities are read from `data` when the key is
//! present and from the bare body otherwise.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Per-request timeout for upstream calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream responded with status {0}")]
    Status(u16),
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Upstream payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Upstream list payload has no data field")]
    MissingData,
    #[error("Invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Read the `data` field of a list envelope
fn unwrap_list(body: Value) -> Result<Value, UpstreamError> {
    match body {
        Value::Object(mut map) => map.remove("data").ok_or(UpstreamError::MissingData),
        _ => Err(UpstreamError::MissingData),
    }
}

/// Read an entity from `data` when present, else from the bare body;
/// `null` means the entity does not exist
fn unwrap_entity(body: Value) -> Option<Value> {
    let entity = match body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data")?,
        other => other,
    };
    (!entity.is_null()).then_some(entity)
}

/// Thin client over the upstream API rooted at `base_url`
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base_url: Url,
    client: Client,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>?<query>`
    ///
    /// Segments are percent-encoded individually, so names containing `/`
    /// stay a single path segment.
    pub fn url(&self, segments: &[&str], query: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, UpstreamError> {
        debug!(%url, "Fetching from upstream");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetch a list payload and decode its `data` array
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &str,
    ) -> Result<Vec<T>, UpstreamError> {
        let body = self.get_json(self.url(segments, query)?).await?;
        Ok(serde_json::from_value(unwrap_list(body)?)?)
    }

    /// Fetch a single entity; `Ok(None)` when upstream reports it as null
    pub async fn fetch_entity<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, UpstreamError> {
        self.entity_at(self.url(segments, "")?).await
    }

    /// Like [`fetch_entity`](Self::fetch_entity) with form-encoded query parameters
    pub async fn fetch_entity_with_params<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Option<T>, UpstreamError> {
        let mut url = self.url(segments, "")?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        self.entity_at(url).await
    }

    async fn entity_at<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, UpstreamError> {
        let body = self.get_json(url).await?;
        unwrap_entity(body)
            .map(serde_json::from_value)
            .transpose()
            .map_err(UpstreamError::from)
    }
}
