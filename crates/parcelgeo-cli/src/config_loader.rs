//! Layered settings for CLI commands

use anyhow::{Context, Result};
use parcelgeo_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Defaults, then the TOML file (`--config` or `PARCELGEO_CONFIG`), then
/// environment variables, then command-line overrides
pub fn load_settings(
    config_file: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let config_file = config_file.map(Path::to_path_buf).or_else(|| {
        std::env::var("PARCELGEO_CONFIG")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    });

    let mut settings = LayeredConfig::with_defaults();
    if let Some(path) = config_file {
        settings = settings
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut settings = settings.load_from_env();
    settings.update_from_cli(overrides);
    Ok(settings)
}
