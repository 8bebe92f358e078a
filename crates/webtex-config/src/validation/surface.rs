//! Surface defaults: size, scale, zoom, and background color format.

use regex::Regex;
use std::sync::LazyLock;

use crate::schema::WebtexConfig;

use super::helpers::validate_range;

/// `#RRGGBB` or `#RRGGBBAA`.
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

pub(crate) fn validate_surface(errors: &mut Vec<String>, config: &WebtexConfig) {
    let surface = &config.surface;
    validate_range(errors, "surface.width", surface.width, 1, 16384);
    validate_range(errors, "surface.height", surface.height, 1, 16384);
    validate_range(
        errors,
        "surface.device_scale_factor",
        surface.device_scale_factor,
        0.25,
        8.0,
    );
    validate_range(errors, "surface.zoom_level", surface.zoom_level, -10.0, 10.0);

    if !HEX_RE.is_match(&surface.background_color) {
        errors.push(format!(
            "surface.background_color = {:?} is not #RRGGBB or #RRGGBBAA",
            surface.background_color
        ));
    }

    if surface.url.trim().is_empty() {
        errors.push("surface.url must not be empty".into());
    }
}
