//! CLI command implementations.

pub mod check;
pub mod list;
pub mod new;
pub mod watch;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use quire_core::Config;
use quire_loader::ContentRegistry;

/// Load the configuration file and register every declared collection.
pub(crate) fn open_registry(config_path: &Path) -> Result<(Config, ContentRegistry)> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let registry =
        ContentRegistry::from_config(&config).wrap_err("Failed to register collections")?;
    Ok((config, registry))
}
