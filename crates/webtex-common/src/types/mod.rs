mod color;
mod core;
mod geometry;

pub use self::core::*;
pub use color::*;
pub use geometry::*;
