pub mod errors;
pub mod events;
pub mod types;

pub use errors::{ConfigError, WebtexError};
pub use events::{Event, EventBus};
pub use types::{
    Color, FallbackReason, PhysicalSize, PixelRect, Point, RenderMode, SurfaceId,
};

pub type Result<T> = std::result::Result<T, WebtexError>;
