//! Configuration loading and typed config structures.
//!
//! The configuration lives in a YAML file (`geocluster.yaml` by default).
//! Every section has a default so a partial file, or no file at all, is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{cluster::CohortRouting, convert::Coordinate, region::Bounds};

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "geocluster.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml { source: serde_yml::Error },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Grid dimensions used when a query does not give its own.
    #[serde(default)]
    pub grid: GridConfig,

    /// Bounds clustered by the one-shot file mode.
    #[serde(default)]
    pub bounds: Option<Bounds>,

    /// Coordinate never placed in a cell, typically a placeholder position.
    #[serde(default)]
    pub excluded: Option<Coordinate>,

    #[serde(default)]
    pub cohort_routing: CohortRouting,

    /// JSON file holding the points served by the service.
    #[serde(default)]
    pub points: Option<PathBuf>,

    /// Log destination; stderr when missing.
    #[serde(default)]
    pub logfile: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    /// Websocket service port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// HTTP route port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_dimension")]
    pub width: usize,
    #[serde(default = "default_dimension")]
    pub height: usize,
}

fn default_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    9001
}

fn default_http_port() -> u16 {
    9002
}

fn default_dimension() -> usize {
    4
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            http_port: default_http_port(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
        }
    }
}

impl ServerConfig {
    /// `address:port`, ready to be bound.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// `address:http_port`, where the HTTP route listens.
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.address, self.http_port)
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}
