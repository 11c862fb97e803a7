use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dns::{DEFAULT_TTL, REQUEST_TIMEOUT, WEBSUPPORT_API_BASE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub solver: SolverSettings,
    #[serde(default)]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// API group the solver is registered under by the issuing controller.
    pub group_name: String,
    #[serde(default = "default_solver_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

fn default_solver_name() -> String {
    "websupport-solver".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_credentials_path() -> PathBuf {
    Settings::config_dir().join("credentials.toml")
}

fn default_base_url() -> String {
    WEBSUPPORT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.solver.group_name.trim().is_empty() {
            return Err(anyhow!("solver.group_name must be specified"));
        }
        if self.api.timeout_seconds == 0 {
            return Err(anyhow!("api.timeout_seconds must be greater than zero"));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/websupport-solver")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\websupport-solver")
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            ttl: default_ttl(),
        }
    }
}
