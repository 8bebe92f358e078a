//! Render-bridge configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Request shared-texture (accelerated) off-screen rendering.
    /// Evaluated once per surface at creation.
    pub accelerated: bool,
    /// Frame rate cap handed to the engine (valid range: 0-240, 0 = follow host).
    pub max_frame_rate: u32,
    /// Pending dirty rects kept per software frame before collapsing to a
    /// full-surface update (valid range: 1-256).
    pub coalesce_dirty_rects: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            accelerated: true,
            max_frame_rate: 0,
            coalesce_dirty_rects: 16,
        }
    }
}
