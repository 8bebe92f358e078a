//! Reading config files. Validation is left to the caller.

use std::path::Path;

use tracing::{debug, info};
use webtex_common::ConfigError;

use super::paths::{create_default_config, default_config_path};
use crate::schema::WebtexConfig;

/// Parse the TOML file at `path`. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<WebtexConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "config parsed");
    Ok(config)
}

/// Load the file at [`default_config_path`], writing the template first
/// when there is none yet.
pub fn load_default() -> Result<WebtexConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "no config file, creating one with defaults");
            create_default_config(&path)?;
            Ok(WebtexConfig::default())
        }
        other => other,
    }
}
