use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use date_window::ResolverConfig;
use serde::Deserialize;

use crate::cli::Cli;

/// On-disk configuration. Only `[dates]` is read here; other tables (the
/// search backend's `[server]`, for one) are ignored.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    #[serde(default)]
    dates: ResolverConfig,
}

/// `<config_dir>/log-dumper/config.toml`
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("log-dumper").join("config.toml"))
}

/// Load the resolver configuration.
///
/// An explicit `path` must exist. The default location is optional; when it
/// is missing the built-in defaults apply.
pub fn load(path: Option<&Path>) -> Result<ResolverConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                log::debug!("No configuration file, using defaults");
                return Ok(ResolverConfig::default());
            }
        },
    };

    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn parse(text: &str) -> Result<ResolverConfig> {
    Ok(toml::from_str::<FileSettings>(text)?.dates)
}

/// Command-line flags take precedence over the file.
pub fn apply_overrides(mut config: ResolverConfig, cli: &Cli) -> Result<ResolverConfig> {
    if let Some(day_first) = cli.day_first() {
        config.day_first = day_first;
    }
    if let Some(year_first) = cli.year_first() {
        config.year_first = year_first;
    }
    if let Some(limit) = cli.range_limit {
        config.range_limit = limit;
    }
    if let Some(mode) = cli.mode() {
        config.mode = mode;
    }
    config.validate()?;
    Ok(config)
}
