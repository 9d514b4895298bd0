//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default location of the remote site-data blob
pub const DEFAULT_SITE_DATA_URL: &str =
    "https://fmja5vvgx5vfveeb.public.blob.vercel-storage.com/site.json";

/// Default location of the ASCII art banner
pub const DEFAULT_ASCII_URL: &str =
    "https://fmja5vvgx5vfveeb.public.blob.vercel-storage.com/ascii.txt";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Feed
    /// Maximum number of feed items, 0 means every post
    pub feed_limit: usize,

    // Remote sources
    #[serde(deserialize_with = "RemoteSourceConfig::site_data_section")]
    pub site_data: RemoteSourceConfig,
    #[serde(deserialize_with = "RemoteSourceConfig::ascii_section")]
    pub ascii: RemoteSourceConfig,
    pub http: HttpConfig,

    // Writing
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Nima Rasooli".to_string(),
            description: "Writings by Nima Rasooli: Rust, systems programming, blockchain, cinema, and philosophy.".to_string(),
            author: "Nima".to_string(),
            language: "en".to_string(),

            url: "https://nimara.xyz".to_string(),

            posts_dir: "src/posts".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            feed_limit: 0,

            site_data: RemoteSourceConfig::site_data(),
            ascii: RemoteSourceConfig::ascii(),
            http: HttpConfig::default(),

            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `SITE_DATA_URL` / `ASCII_URL` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SITE_DATA_URL").filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Site data URL overridden from environment: {}", url);
            self.site_data.url = url;
        }
        if let Some(url) = lookup("ASCII_URL").filter(|u| !u.trim().is_empty()) {
            tracing::debug!("ASCII URL overridden from environment: {}", url);
            self.ascii.url = url;
        }
    }

    /// Absolute URL for a site path
    pub fn full_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }
}

/// A remotely hosted document with its cache window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSourceConfig {
    pub url: String,
    pub cache_ttl_secs: u64,
}

impl RemoteSourceConfig {
    fn site_data() -> Self {
        Self {
            url: DEFAULT_SITE_DATA_URL.to_string(),
            cache_ttl_secs: 300,
        }
    }

    fn ascii() -> Self {
        Self {
            url: DEFAULT_ASCII_URL.to_string(),
            cache_ttl_secs: 3600,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn site_data_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PartialRemoteSource::deserialize_or_empty(deserializer)?.merge(Self::site_data()))
    }

    fn ascii_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PartialRemoteSource::deserialize_or_empty(deserializer)?.merge(Self::ascii()))
    }
}

/// A remote source section as written; missing keys keep the source's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialRemoteSource {
    url: Option<String>,
    cache_ttl_secs: Option<u64>,
}

impl PartialRemoteSource {
    /// An empty `site_data:` key reads as null
    fn deserialize_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<Self>::deserialize(deserializer)?.unwrap_or_default())
    }

    fn merge(self, defaults: RemoteSourceConfig) -> RemoteSourceConfig {
        RemoteSourceConfig {
            url: self.url.unwrap_or(defaults.url),
            cache_ttl_secs: self.cache_ttl_secs.unwrap_or(defaults.cache_ttl_secs),
        }
    }
}

/// Outgoing HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}
