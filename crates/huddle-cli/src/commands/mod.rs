//! Command implementations.

pub mod context;
pub mod init;
pub mod migrate;
pub mod persona;
pub mod query;

use anyhow::Context as _;
use huddle_core::Config;
use std::path::Path;

/// Load and validate configuration from an explicit path or the default
/// location.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_default().context(
            "failed to load config from ~/.huddle/huddle.json5 (run `huddle init` first)",
        )?,
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}
