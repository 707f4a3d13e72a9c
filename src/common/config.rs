//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Environment variable overriding the fixture server port
pub const PORT_ENV: &str = "MOCK_PORT";

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Fixture server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Collection runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Fixture server settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// TCP port the fixture server binds on the loopback host
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3050
}

/// Collection runner settings
#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// Value injected as the `api_key` variable
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Run every selected collection even after one fails
    #[serde(default)]
    pub keep_going: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            keep_going: false,
        }
    }
}

fn default_api_key() -> String {
    "mock-key".to_string()
}

impl Config {
    /// Load configuration from an explicit file, or from the default config
    /// file location
    ///
    /// An explicit path must exist. The default location is optional and
    /// falls back to the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Resolve the fixture server port
    ///
    /// Precedence: command line, then `MOCK_PORT`, then the config file.
    pub fn resolve_port(&self, cli_port: Option<u16>) -> Result<u16> {
        resolve_port_from(cli_port, std::env::var(PORT_ENV).ok(), self.server.port)
    }
}

fn resolve_port_from(cli_port: Option<u16>, env_port: Option<String>, fallback: u16) -> Result<u16> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    match env_port.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map_err(|_| Error::Config(format!("{PORT_ENV} must be a valid port number, got '{value}'"))),
        _ => Ok(fallback),
    }
}
