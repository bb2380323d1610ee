use std::env;
use std::time::Duration;

use apipedia_client::{Apipedia, ReqwestTransport};
use apipedia_core::{ApipediaError, DEFAULT_BASE_URL};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Account credentials
    pub credentials: CredentialsConfig,
    /// API endpoint configuration
    pub api: ApiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Credentials attached to every request
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CredentialsConfig {
    pub appkey: String,
    pub authkey: String,
}

/// API endpoint configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// Base URL (default: https://waconsole.apipedia.id/api)
    pub base_url: String,
    /// Request timeout in seconds, 0 disables it (default: 30)
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level or filter directive (default: info)
    pub level: String,
    /// Log format: json or pretty (default: pretty)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // e.g. APIPEDIA__CREDENTIALS__APPKEY
            .add_source(Environment::with_prefix("APIPEDIA").separator("__"))
            .build()?;

        let cfg: Self = s.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that cannot produce a working client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.appkey.trim().is_empty() {
            return Err(ConfigError::Message("credentials.appkey is empty".into()));
        }
        if self.credentials.authkey.trim().is_empty() {
            return Err(ConfigError::Message("credentials.authkey is empty".into()));
        }
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::Message(format!("api.base_url: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Message(format!(
                "api.base_url: unsupported scheme {}",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Build a client from this configuration.
    pub fn client(&self) -> Result<Apipedia<ReqwestTransport>, ApipediaError> {
        let transport = match self.api.timeout() {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };
        Ok(Apipedia::with_transport(
            self.credentials.appkey.clone(),
            self.credentials.authkey.clone(),
            transport,
        )
        .with_base_url(self.api.base_url.clone()))
    }
}
