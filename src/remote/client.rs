//! HTTP clients for the remote site data and ASCII art documents

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use super::site_data::{fallback_site_data, SiteData};
use crate::cache::TtlCache;
use crate::config::{RemoteSourceConfig, SiteConfig};

/// Errors raised while fetching a remote document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A document behind a URL
#[derive(Debug, Clone)]
struct RemoteDocument {
    http: reqwest::Client,
    url: String,
}

impl RemoteDocument {
    fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Build)?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    async fn get_text(&self, accept: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: self.url.clone(),
            source,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, FetchError> {
        let text = self.get_text("application/json").await?;
        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// Result of validating the remote site-data document
#[derive(Debug, Clone, Serialize)]
pub struct SiteDataCheck {
    pub success: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SiteDataCheck {
    fn ok(url: &str) -> Self {
        Self {
            success: true,
            url: url.to_string(),
            message: Some("Site data URL is valid and accessible".to_string()),
            error: None,
        }
    }

    fn failed(url: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Cached client for the site-data JSON document
///
/// [`fetch_site_data`](Self::fetch_site_data) never fails: a refresh error
/// falls back to the last good copy, then to [`fallback_site_data`].
#[derive(Debug)]
pub struct SiteDataClient {
    remote: RemoteDocument,
    cache: TtlCache<SiteData>,
    refresh: Mutex<()>,
}

impl SiteDataClient {
    pub fn new(url: &str, ttl: Duration, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            remote: RemoteDocument::new(url, timeout)?,
            cache: TtlCache::new(ttl),
            refresh: Mutex::new(()),
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, FetchError> {
        let source: &RemoteSourceConfig = &config.site_data;
        Self::new(
            &source.url,
            source.cache_ttl(),
            Duration::from_secs(config.http.timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.remote.url
    }

    pub fn cache(&self) -> &TtlCache<SiteData> {
        &self.cache
    }

    /// Site data from the cache, the network, or a fallback, in that order
    pub async fn fetch_site_data(&self) -> SiteData {
        if let Some(data) = self.cache.get() {
            tracing::debug!("Using cached site data");
            return data;
        }

        // Concurrent misses wait here and reuse the winner's result
        let _guard = self.refresh.lock().await;
        if let Some(data) = self.cache.get() {
            return data;
        }

        match self.fetch_remote().await {
            Ok(data) => {
                tracing::info!("Site data fetched from {}", self.remote.url);
                self.cache.set(data.clone());
                data
            }
            Err(e) => {
                tracing::error!("Error fetching site data: {}", e);
                if let Some(stale) = self.cache.get_stale() {
                    tracing::warn!("Using expired cached site data as fallback");
                    stale
                } else {
                    tracing::warn!("Using static fallback site data");
                    fallback_site_data()
                }
            }
        }
    }

    /// Fetch and decode the document, bypassing the cache
    pub async fn fetch_remote(&self) -> Result<SiteData, FetchError> {
        let data: SiteData = self.remote.get_json().await?;
        Ok(data.fill_defaults())
    }

    /// Check that the document is reachable and has the fields the site needs
    pub async fn check(&self) -> SiteDataCheck {
        let url = self.remote.url.as_str();
        let value: serde_json::Value = match self.remote.get_json().await {
            Ok(value) => value,
            Err(e) => return SiteDataCheck::failed(url, e.to_string()),
        };

        let non_empty = |key: &str| value[key].as_str().is_some_and(|s| !s.is_empty());
        let is_array = |key: &str| value[key].is_array();

        if non_empty("name")
            && non_empty("tagline")
            && is_array("about")
            && is_array("projects")
            && is_array("blogPosts")
        {
            SiteDataCheck::ok(url)
        } else {
            SiteDataCheck::failed(url, "Site data is missing required fields")
        }
    }
}

/// Cached client for the ASCII art banner
#[derive(Debug)]
pub struct AsciiClient {
    remote: RemoteDocument,
    cache: TtlCache<String>,
}

impl AsciiClient {
    pub fn new(url: &str, ttl: Duration, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            remote: RemoteDocument::new(url, timeout)?,
            cache: TtlCache::new(ttl),
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.ascii.url,
            config.ascii.cache_ttl(),
            Duration::from_secs(config.http.timeout_secs),
        )
    }

    /// The banner text, falling back to the last good copy on failure
    pub async fn fetch_ascii(&self) -> Result<String, FetchError> {
        if let Some(text) = self.cache.get() {
            return Ok(text);
        }

        match self.remote.get_text("text/plain").await {
            Ok(text) => {
                let text = optimize_ascii(&text);
                self.cache.set(text.clone());
                Ok(text)
            }
            Err(e) => match self.cache.get_stale() {
                Some(stale) => {
                    tracing::warn!("Error fetching ASCII art, using expired copy: {}", e);
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }
}

/// Drop trailing whitespace from every line and the whole text
pub fn optimize_ascii(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
