//! CLI Configuration

use anyhow::Context;
use plugin_binding::ResolverConfig;
use std::path::{Path, PathBuf};

/// Load the resolver config from an explicit path, or from
/// `~/.pluginbind/config.toml` when present.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<ResolverConfig> {
    let path = match explicit {
        Some(p) => {
            anyhow::ensure!(p.exists(), "config file {} does not exist", p.display());
            p.to_path_buf()
        }
        None => match default_path() {
            Some(p) => p,
            None => return Ok(ResolverConfig::default()),
        },
    };

    let config = ResolverConfig::load(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    tracing::debug!("Resolver config: {:?}", config);
    Ok(config)
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pluginbind").join("config.toml"))
}
