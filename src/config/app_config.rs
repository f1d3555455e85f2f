use serde::Deserialize;
use url::Url;

use crate::domain::DomainError;
use crate::infrastructure::services::ProxyConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub proxy: ProxySettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    /// Registration scope as an absolute URL
    pub scope: String,
    /// Cache version identifier, bump to invalidate precached content
    pub cache_version: String,
    /// Resources precached at install time, relative to the scope
    pub precache_manifest: Vec<String>,
    /// Wait for cache writes before responding instead of detaching them
    pub await_cache_fill: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy: ProxySettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            scope: "http://localhost:8080/app/".to_string(),
            cache_version: "v1".to_string(),
            precache_manifest: vec![
                "/app/".to_string(),
                "/app/index.html".to_string(),
                "/app/manifest.json".to_string(),
            ],
            await_cache_fill: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ProxySettings {
    /// Converts these settings into a validated proxy configuration
    pub fn to_proxy_config(&self) -> Result<ProxyConfig, DomainError> {
        let scope = Url::parse(&self.scope).map_err(|error| {
            DomainError::configuration(format!("Invalid scope URL '{}': {}", self.scope, error))
        })?;

        let mut config = ProxyConfig::new(scope, &self.cache_version)
            .with_manifest(self.precache_manifest.clone());
        if self.await_cache_fill {
            config = config.with_awaited_fill();
        }

        Ok(config)
    }
}
