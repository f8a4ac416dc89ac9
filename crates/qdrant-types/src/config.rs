//! Client settings.
//!
//! Layered config: defaults -> default config file -> explicit config file ->
//! environment variables. The default config file lives in the platform
//! config directory, e.g. `~/.config/qdrant-client/config.toml`.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Connection settings for the vector-search client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// gRPC endpoint of the service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum time to establish the connection (ms)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Deadline applied to every request (ms). No deadline when unset.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Build the channel without connecting; the first call connects.
    #[serde(default)]
    pub connect_lazily: bool,
}

fn default_endpoint() -> String {
    "http://localhost:6334".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: None,
            connect_lazily: false,
        }
    }
}

impl ClientSettings {
    /// Settings for the given endpoint, everything else default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Default config file (platform config dir)
    /// 3. Explicit config file (required when given)
    /// 4. Environment variables (`QDRANT_CLIENT_*`)
    pub fn load(config_path: Option<&str>) -> Result<Self, DataError> {
        let config_dir = ProjectDirs::from("", "", "qdrant-client")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("endpoint", default_endpoint())
            .map_err(|e| DataError::Config(e.to_string()))?
            .set_default("connect_timeout_ms", default_connect_timeout_ms() as i64)
            .map_err(|e| DataError::Config(e.to_string()))?
            .set_default("connect_lazily", false)
            .map_err(|e| DataError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // QDRANT_CLIENT_ENDPOINT, QDRANT_CLIENT_REQUEST_TIMEOUT_MS, ...
        builder = builder.add_source(
            Environment::with_prefix("QDRANT_CLIENT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()
            .map_err(|e| DataError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DataError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.endpoint.trim().is_empty() {
            return Err(DataError::Config("endpoint must not be empty".to_string()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(DataError::Config("connect_timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
