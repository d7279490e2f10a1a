//! CLI commands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use tracing::debug;

use rescan_core::RescanConfig;

/// Load the explicit config file, else the user config file if present, else defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<RescanConfig> {
    if let Some(path) = path {
        return Ok(RescanConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return Ok(RescanConfig::from_file(&default_path)?);
    }

    Ok(RescanConfig::default())
}
