//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Configuration is sparse:
//! stock defaults cover everything, and a config file only needs the keys it
//! wants to override. Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [api]
//! base_url = "http://makeup-api.herokuapp.com"
//! brand = "maybelline"   # omit to fetch the unfiltered catalog
//! timeout_secs = 30
//!
//! [prerender]
//! ids = [495, 488]       # detail pages generated at build time
//!
//! [server]
//! addr = "0.0.0.0:3000"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// External product API settings.
    pub api: ApiConfig,
    /// Which detail pages are generated at build time.
    pub prerender: PrerenderConfig,
    /// HTTP server settings (used by `serve`).
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::Validation("api.base_url must not be empty".into()));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "api.base_url must start with http:// or https://".into(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be non-zero".into()));
        }
        if self.server.addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.addr is not a valid host:port address: {}",
                self.server.addr
            )));
        }
        Ok(())
    }
}

/// External product API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the product API (no trailing slash required).
    pub base_url: String,
    /// Brand filter applied to the list endpoint. `None` fetches everything.
    pub brand: Option<String>,
    /// Per-request timeout in seconds. Build-time fetches get double this.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://makeup-api.herokuapp.com".to_string(),
            brand: Some("maybelline".to_string()),
            timeout_secs: 30,
        }
    }
}

/// Which detail pages are generated at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrerenderConfig {
    /// Product ids whose detail pages are pre-rendered. Other ids are
    /// generated lazily on first request when serving.
    pub ids: Vec<u64>,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self { ids: vec![495, 488] }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address as `host:port`.
    pub addr: String,
}

impl ServerConfig {
    /// Parsed bind address. [`SiteConfig::validate`] guarantees this parses
    /// for loaded configs.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "server.addr is not a valid host:port address: {}",
                self.addr
            ))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: "0.0.0.0:3000".to_string() }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load config from `config.toml` in the given directory.
///
/// Returns stock defaults if no config file exists. Rejects unknown keys
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = dir.join("config.toml");
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str::<SiteConfig>(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Vitrine Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Product API
# ---------------------------------------------------------------------------
[api]
# Base URL of the product API.
base_url = "http://makeup-api.herokuapp.com"

# Brand filter for the list endpoint. Comment out to fetch the full catalog.
brand = "maybelline"

# Per-request timeout in seconds. Build-time fetches get double this.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Pre-rendering
# ---------------------------------------------------------------------------
[prerender]
# Product ids whose detail pages are generated at build time.
# Any other id is generated lazily on first request when serving.
ids = [495, 488]

# ---------------------------------------------------------------------------
# Server
# ---------------------------------------------------------------------------
[server]
# Bind address for `vitrine serve`.
addr = "0.0.0.0:3000"
"##
}
