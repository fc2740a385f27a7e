//! CLI command implementations.

pub mod delete;
pub mod download;
pub mod session;
pub mod status;
pub mod text;
pub mod thumbnail;
pub mod upload;
pub mod wait;

use std::path::PathBuf;

use anyhow::{Context, Result};
use crocodoc_client::{ClientConfig, CrocodocClient};
use tracing::debug;

use crate::Cli;

/// Returns the default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crocodoc")
        .join("config.json")
}

/// Loads the configuration file and environment, then builds a client.
pub fn build_client(cli: &Cli) -> Result<CrocodocClient> {
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    debug!(path = %path.display(), "Loading configuration");

    let config = ClientConfig::load_from(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?
        .with_env_overrides(|key| std::env::var(key).ok());

    CrocodocClient::new(config).context("Failed to set up the Crocodoc client")
}
