// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Runtime Configuration
//!
//! YAML configuration shared by the CLI and the MCP server.
//!
//! ## Example
//!
//! ```yaml
//! model: bond_portfolio
//! logging:
//!   level: info
//!   format: text
//! mcp:
//!   server_name: explicator
//! ```
//!
//! ## Discovery
//!
//! 1. Explicit `--config` path (must exist and parse)
//! 2. `EXPLICATOR_CONFIG_PATH` environment variable
//! 3. `./explicator.yaml`
//! 4. `~/.explicator/config.yaml`
//! 5. Built-in defaults
//!
//! Environment overrides (`EXPLICATOR_MODEL`, `EXPLICATOR_LOG_LEVEL`) are
//! applied after loading regardless of where the file came from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_PATH_ENV: &str = "EXPLICATOR_CONFIG_PATH";
pub const MODEL_ENV: &str = "EXPLICATOR_MODEL";
pub const LOG_LEVEL_ENV: &str = "EXPLICATOR_LOG_LEVEL";

/// Models bundled with the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    BondPortfolio,
    Stub,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::BondPortfolio, ModelKind::Stub];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BondPortfolio => "bond_portfolio",
            Self::Stub => "stub",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                anyhow::anyhow!("Unknown model '{}'. Expected one of: {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive passed to the subscriber (e.g. "info", "explicator_core=debug")
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpConfig {
    /// Name reported in the `initialize` handshake
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicatorConfig {
    /// Bundled model to serve; see [`ModelKind`]
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub mcp: McpConfig,
}

impl Default for ExplicatorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            logging: LoggingConfig::default(),
            mcp: McpConfig::default(),
        }
    }
}

impl ExplicatorConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover a configuration file using the documented precedence order.
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!("{} points to missing file {:?}; continuing discovery", CONFIG_PATH_ENV, path);
        }

        let cwd = PathBuf::from("./explicator.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".explicator").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, falling back to defaults.
    ///
    /// An explicit path that cannot be read or parsed is an error.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(&config_path)
                    .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", config_path, e))?
            }
            None => {
                tracing::debug!("No configuration file found; using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(MODEL_ENV) {
            if val.trim().is_empty() {
                tracing::warn!("Ignoring empty {}", MODEL_ENV);
            } else {
                tracing::info!("Environment override: {}={}", MODEL_ENV, val);
                self.model = val.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var(LOG_LEVEL_ENV) {
            if val.trim().is_empty() {
                tracing::warn!("Ignoring empty {}", LOG_LEVEL_ENV);
            } else {
                tracing::info!("Environment override: {}={}", LOG_LEVEL_ENV, val);
                self.logging.level = val.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.model_kind()?;

        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level cannot be empty");
        }

        if self.mcp.server_name.trim().is_empty() {
            anyhow::bail!("mcp.server_name cannot be empty");
        }

        Ok(())
    }

    pub fn model_kind(&self) -> anyhow::Result<ModelKind> {
        self.model.parse()
    }
}

fn default_model() -> String {
    ModelKind::BondPortfolio.as_str().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_name() -> String {
    "explicator".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExplicatorConfig::default();
        assert_eq!(config.model, "bond_portfolio");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.mcp.server_name, "explicator");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = ExplicatorConfig::from_yaml_str("model: stub\nlogging:\n  format: json\n").unwrap();
        assert_eq!(config.model_kind().unwrap(), ModelKind::Stub);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.mcp.server_name, "explicator");
    }

    #[test]
    fn test_validate_rejects_unknown_model() {
        let config = ExplicatorConfig {
            model: "black_scholes".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Unknown model 'black_scholes'"));
        assert!(err.contains("bond_portfolio, stub"));
    }

    #[test]
    fn test_validate_rejects_empty_server_name() {
        let mut config = ExplicatorConfig::default();
        config.mcp.server_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explicator.yaml");

        let mut config = ExplicatorConfig::default();
        config.model = "stub".to_string();
        config.mcp.server_name = "risk-desk".to_string();
        config.to_yaml_file(&path).unwrap();

        let loaded = ExplicatorConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_path_must_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model: [not, a, string").unwrap();

        let result = ExplicatorConfig::load_or_default(Some(file.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExplicatorConfig::load_or_default(Some(dir.path().join("absent.yaml")));
        assert!(result.is_err());
    }
}
