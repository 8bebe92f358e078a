//! Defaults applied to newly attached browsing surfaces.

use serde::{Deserialize, Serialize};
use webtex_common::{Color, PhysicalSize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub url: String,
    /// Pixel width (valid range: 1-16384).
    pub width: u32,
    /// Pixel height (valid range: 1-16384).
    pub height: u32,
    /// Valid range: 0.25-8.0.
    pub device_scale_factor: f32,
    /// Engine zoom level (valid range: -10.0-10.0, 0 = 100%).
    pub zoom_level: f64,
    pub audio_muted: bool,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub background_color: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".into(),
            width: 1280,
            height: 720,
            device_scale_factor: 1.0,
            zoom_level: 0.0,
            audio_muted: false,
            background_color: "#ffffffff".into(),
        }
    }
}

impl SurfaceConfig {
    pub fn size(&self) -> PhysicalSize {
        PhysicalSize::new(self.width, self.height)
    }

    /// Parsed background color; white when the string does not parse.
    pub fn background(&self) -> Color {
        Color::from_hex(&self.background_color).unwrap_or(Color::WHITE)
    }
}
