use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IndyError, Result};

/// Endpoint used when neither flag, env nor config names one
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4000";

/// Default request timeout for the REST client
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the indyctl tools, read from ~/.indyctl/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndyConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Mock backend settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub page_size: Option<usize>,
    pub cors_permissive: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    pub default_package_type: Option<String>,
}

const TEMPLATE: &str = r#"# indyctl configuration

[api]
# endpoint = "http://127.0.0.1:4000"
# timeout_secs = 30

[server]
# bind = "127.0.0.1:4000"
# page_size = 2
# cors_permissive = false

[ui]
# default_package_type = "maven"
"#;

impl IndyConfig {
    /// Get config file path: ~/.indyctl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".indyctl/config.toml")
    }

    /// Load the user config; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| IndyError::config(path, e.to_string()))
    }

    /// Commented starter file written by `indyctl config init`
    pub fn template() -> &'static str {
        TEMPLATE
    }

    /// Resolve the API endpoint: explicit value > config > default.
    pub fn endpoint(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.api.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn default_package_type(&self) -> &str {
        self.ui.default_package_type.as_deref().unwrap_or("maven")
    }
}
