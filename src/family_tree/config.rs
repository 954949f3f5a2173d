use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Client configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Defaults, the config file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppConfig::load()?,
        })
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.server_url(), path.trim_start_matches('/'))
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn lineage_separator(&self) -> &str {
        &self.app.lineage_separator
    }

    pub fn route_prefix(&self) -> &str {
        &self.app.route_prefix
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}

impl From<AppConfig> for Config {
    fn from(app: AppConfig) -> Self {
        Self { app }
    }
}
