use crate::constants::{DEFAULT_BANNER, DEFAULT_LISTEN_ADDRESS, DEFAULT_ROOT_DIR};
use crate::core_cli::Cli;
use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub root_dir: String,
    pub banner_file: Option<String>, // Built-in banner when unset
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from(DEFAULT_LISTEN_ADDRESS),
            root_dir: String::from(DEFAULT_ROOT_DIR),
            banner_file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Builds the effective configuration: defaults, then the config file
    /// when one is given, then command-line flags.
    pub fn from_cli(args: &Cli) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        if let Some(path) = &args.path {
            config.server.root_dir = path.clone();
        }
        if let Some(listen) = &args.listen {
            config.server.listen_address = listen.clone();
        }
        if config.server.root_dir.trim().is_empty() {
            config.server.root_dir = String::from(DEFAULT_ROOT_DIR);
        }

        Ok(config)
    }

    /// Returns the greeting banner, read from `banner_file` when configured.
    pub fn load_banner(&self) -> Result<String> {
        let Some(path) = &self.server.banner_file else {
            return Ok(DEFAULT_BANNER.to_string());
        };

        let banner = fs::read_to_string(path)
            .with_context(|| format!("Failed to read banner file: {}", path))?;
        if banner.trim().is_empty() {
            bail!("Banner file is empty: {}", path);
        }

        info!("Banner file loaded successfully: {}", path);
        Ok(banner.trim_end().to_string())
    }

    pub fn log(&self) {
        info!("  Listen Address: {}", self.server.listen_address);
        info!("  Root Directory: {}", self.server.root_dir);
        info!(
            "  Banner File: {}",
            self.server.banner_file.as_deref().unwrap_or("<built-in>")
        );
    }
}
