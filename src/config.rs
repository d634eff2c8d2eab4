//! Configuration for the command-line front end.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::Path;

use bayesball_network::codec;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Front-end configuration, loaded from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Model string used when `--model` is not given.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Base URL that share links append `?model=` to.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,

    /// Output format when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            share_base_url: default_share_base_url(),
            format: OutputFormat::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or fails
    /// [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config_read_failed(path, e.to_string()))?;
        let config = Self::parse(&raw, path)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate config text.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not valid TOML or fails validation.
    pub fn from_toml(raw: &str) -> Result<Self> {
        Self::parse(raw, Path::new("<inline>"))
    }

    fn parse(raw: &str, origin: &Path) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| Error::config_parse_failed(origin, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.share_base_url.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "share_base_url must not be empty".to_string(),
            ));
        }

        if self.log_filter.trim().is_empty() {
            return Err(Error::InvalidConfig("log_filter must not be empty".to_string()));
        }

        codec::decode(&self.default_model).map_err(|e| {
            Error::InvalidConfig(format!("default_model is not a valid model string: {e}"))
        })?;

        Ok(())
    }
}

fn default_model() -> String {
    "OFC2;OFC2;OFC3,4;OFC;OFC;".to_string()
}

fn default_share_base_url() -> String {
    "http://www.charlegao.com/bayesballalgorithm".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}
