//! Configuration schema types for webtex.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod queues;
mod render;
mod surface;
mod system;

pub use queues::*;
pub use render::*;
pub use surface::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebtexConfig {
    pub render: RenderConfig,
    pub surface: SurfaceConfig,
    pub queues: QueueConfig,
    pub logging: LoggingConfig,
}
