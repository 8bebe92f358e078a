//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod misc;
mod render;
mod surface;

#[cfg(test)]
mod tests;

use crate::schema::WebtexConfig;
use webtex_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WebtexConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    render::validate_render(&mut errors, config);
    surface::validate_surface(&mut errors, config);
    misc::validate_queues(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
