//! Where the config file lives, and writing the first one.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;
use webtex_common::ConfigError;

use super::template::default_config_toml;

/// Overrides the platform config location when set and non-empty.
pub const CONFIG_PATH_ENV: &str = "WEBTEX_CONFIG";

fn pick_config_path(
    override_path: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    match override_path.filter(|p| !p.is_empty()) {
        Some(p) => Some(PathBuf::from(p)),
        None => config_dir.map(|dir| dir.join("webtex").join("config.toml")),
    }
}

/// `$WEBTEX_CONFIG`, else `webtex/config.toml` under the platform config dir.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    pick_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

fn write_error(what: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot write {what} {}: {e}", path.display()))
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| write_error("config directory", dir, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| write_error("config", path, e))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}
