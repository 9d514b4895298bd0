//! termsite: content engine for a terminal-themed personal site
//!
//! This crate turns a directory of markdown writings into post listings,
//! highlighted HTML, RSS and sitemap feeds, and serves them next to the
//! remotely hosted site-data document over a small JSON API.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod remote;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{MarkdownRenderer, PostRepository};

/// The main site application
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts directory
    pub posts_dir: PathBuf,
    /// Generated output directory
    pub public_dir: PathBuf,
    /// Static assets served as-is
    pub static_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    ///
    /// Reads `_config.yml` when present and applies environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            tracing::debug!("Loading configuration from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
            static_dir,
        }
    }

    /// Repository over the posts directory
    pub fn repository(&self) -> PostRepository {
        PostRepository::new(&self.posts_dir)
    }

    /// Markdown renderer using the configured highlight theme
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_theme(&self.config.highlight.theme)
    }

    /// Write the feed, sitemap and post index into the public directory
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Remove the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
