//! Application configuration module
//!
//! Settings for the editing layer: where the member API lives, which
//! separator splits a lineage string, and the route prefix used when
//! navigating to a family page.
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file (`<config dir>/ensab/config.toml`), then environment overrides.

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Default member API root
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
/// Default lineage separator
pub const DEFAULT_LINEAGE_SEPARATOR: &str = "->";
/// Default family page prefix
pub const DEFAULT_ROUTE_PREFIX: &str = "ftree";

/// Environment variable overriding the API root
pub const ENV_SERVER_URL: &str = "ENSAB_API_URL";
/// Environment variable overriding the lineage separator
pub const ENV_LINEAGE_SEPARATOR: &str = "ENSAB_LINEAGE_SEPARATOR";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Member API root, without a trailing slash
    pub server_url: String,
    /// Separator between names in a lineage string
    pub lineage_separator: String,
    /// Path segment in front of a family name
    pub route_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            lineage_separator: DEFAULT_LINEAGE_SEPARATOR.to_string(),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
        }
    }
}

/// On-disk shape; every key is optional
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_url: Option<String>,
    lineage_separator: Option<String>,
    route_prefix: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Default location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ensab").join("config.toml"))
    }

    /// Resolve defaults, the default config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Some(path) = Self::default_path() {
            if path.exists() {
                builder = builder.merge_file(&path)?;
            }
        }
        builder.merge_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.server_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.server_url, e)))?;
        if self.lineage_separator.is_empty() {
            return Err(ConfigError::MissingValue("lineage_separator"));
        }
        if self.route_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::MissingValue("route_prefix"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    lineage_separator: Option<String>,
    route_prefix: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the lineage separator
    pub fn lineage_separator(mut self, separator: impl Into<String>) -> Self {
        self.lineage_separator = Some(separator.into());
        self
    }

    /// Set the family page prefix
    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    /// Layer a TOML file on top of what is already set
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        self.merge_toml(&text)
    }

    pub fn merge_toml(mut self, text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if file.server_url.is_some() {
            self.server_url = file.server_url;
        }
        if file.lineage_separator.is_some() {
            self.lineage_separator = file.lineage_separator;
        }
        if file.route_prefix.is_some() {
            self.route_prefix = file.route_prefix;
        }
        Ok(self)
    }

    /// Apply `ENSAB_API_URL` / `ENSAB_LINEAGE_SEPARATOR` when set
    pub fn merge_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_SERVER_URL) {
            self.server_url = Some(url);
        }
        if let Ok(separator) = std::env::var(ENV_LINEAGE_SEPARATOR) {
            self.lineage_separator = Some(separator);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            lineage_separator: self.lineage_separator.unwrap_or(defaults.lineage_separator),
            route_prefix: self
                .route_prefix
                .map(|prefix| prefix.trim_matches('/').to_string())
                .unwrap_or(defaults.route_prefix),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("could not read config file: {0}")]
    Read(String),
    #[error("could not parse config file: {0}")]
    Parse(String),
}
