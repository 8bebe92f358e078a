//! Drag-and-drop sessions, one state machine per direction.

mod machine;
mod ops;
mod payload;

pub use machine::*;
pub use ops::*;
pub use payload::*;
