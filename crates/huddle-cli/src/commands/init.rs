//! `huddle init` - write a starter configuration file.

use anyhow::Context as _;
use huddle_core::{paths, Config};
use std::path::Path;
use tracing::info;

pub fn run(config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => paths::config_file()?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = Config::default();
    config
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "wrote starter configuration");
    println!("Wrote starter config to {}", path.display());
    println!("Fill in embedding.api_key, index.*, and firebase.database_url before running commands.");
    Ok(())
}
