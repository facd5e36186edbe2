//! Process-level configuration
//!
//! Resolved once at start from the environment (and CLI overrides applied by
//! the binary). Nothing here changes at call time.

use anyhow::{Context, Result};
use reqwest::Url;
use std::path::PathBuf;
use tracing::Level;

use crate::config::envelope::SettingsEnvelope;
use crate::constants::{api, logging};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: Url,
    pub log_level: String,
    pub storage_path: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup(api::BASE_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| api::DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_base: parse_base_url(&base)?,
            log_level: lookup(logging::LEVEL_ENV).unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string()),
            storage_path: SettingsEnvelope::default_path(),
        })
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self> {
        self.api_base = parse_base_url(base)?;
        Ok(self)
    }

    pub fn with_storage_path(mut self, path: PathBuf) -> Self {
        self.storage_path = path;
        self
    }

    /// Max tracing level; unknown names fall back to INFO
    pub fn trace_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn parse_base_url(base: &str) -> Result<Url> {
    let url = Url::parse(base.trim()).with_context(|| format!("Invalid API base URL '{}'", base))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("API base URL '{}' cannot carry path segments", base);
    }
    Ok(url)
}
