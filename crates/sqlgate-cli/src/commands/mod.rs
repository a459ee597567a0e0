//! CLI command implementations.

pub mod check;
pub mod policy;

use anyhow::{Context, Result};
use sqlgate_core::ConfigSources;
use std::path::Path;

/// Gather raw policy settings: the config file if given, then the
/// environment on top.
pub fn load_sources(config_path: Option<&Path>) -> Result<ConfigSources> {
    let file = match config_path {
        Some(path) => ConfigSources::from_file(path)
            .with_context(|| format!("Failed to load policy from {:?}", path))?,
        None => ConfigSources::new(),
    };

    Ok(file.merge(ConfigSources::from_env()))
}
