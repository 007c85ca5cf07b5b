//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LINKDIFF_*)
//! 2. TOML config file (if LINKDIFF_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LINKDIFF_*)
/// 2. TOML config file (if LINKDIFF_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for page fetches.
    ///
    /// Set via LINKDIFF_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via LINKDIFF_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per page.
    ///
    /// Set via LINKDIFF_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum number of redirects followed per page.
    ///
    /// Set via LINKDIFF_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Allow fetching hosts that resolve to private or reserved addresses.
    ///
    /// Set via LINKDIFF_ALLOW_PRIVATE_HOSTS environment variable.
    #[serde(default)]
    pub allow_private_hosts: bool,

    /// Collect links from the detected content regions only.
    ///
    /// Set via LINKDIFF_CONTENT_LINKS_ONLY environment variable.
    #[serde(default)]
    pub content_links_only: bool,

    /// Emit a separate section listing the page's images.
    ///
    /// Set via LINKDIFF_INCLUDE_IMAGES environment variable.
    #[serde(default)]
    pub include_images: bool,

    /// Treat `<img src>` as a link source.
    #[serde(default)]
    pub collect_image_links: bool,

    /// Treat `<button>` targets (`formaction`, `data-href`) as link sources.
    #[serde(default)]
    pub collect_button_links: bool,

    /// Treat `data-href`/`data-url`/`data-link` attributes as link sources.
    #[serde(default)]
    pub collect_data_links: bool,
}

fn default_user_agent() -> String {
    "linkdiff/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
            allow_private_hosts: false,
            content_links_only: false,
            include_images: false,
            collect_image_links: false,
            collect_button_links: false,
            collect_data_links: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LINKDIFF_`
    /// 2. TOML file from `LINKDIFF_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LINKDIFF_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::from_figment(figment.merge(
            Env::prefixed("LINKDIFF_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        ))
    }

    /// Extract and validate a configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if extraction fails and
    /// `ConfigError::Invalid` if validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
