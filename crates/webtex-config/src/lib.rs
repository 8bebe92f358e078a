//! Webtex configuration system.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use webtex_config::{config_to_json, load_config};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{WebtexConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;
use webtex_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file if none exists.
pub fn load_config() -> Result<WebtexConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path, falling back to the platform default
/// when `path` is `None`.
pub fn load_config_from(path: Option<&Path>) -> Result<WebtexConfig, ConfigError> {
    let Some(path) = path else {
        return load_config();
    };
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WebtexConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&WebtexConfig::default());
        assert!(json.contains("\"render\""));
        assert!(json.contains("\"surface\""));
        assert!(json.contains("\"queues\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&WebtexConfig::default());
        let parsed: WebtexConfig = serde_json::from_str(&json).unwrap();
        assert!(parsed.render.accelerated);
        assert_eq!(parsed.surface.url, "about:blank");
        assert_eq!(parsed.queues.event_capacity, 1024);
    }

    #[test]
    fn explicit_missing_path_is_file_not_found() {
        let err = load_config_from(Some(Path::new("/tmp/webtex_missing_config.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn explicit_path_with_bad_values_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[surface]\nwidth = 0\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
