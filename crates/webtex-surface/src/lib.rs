//! Embedded browser surfaces.
//!
//! A [`Surface`] couples one render bridge with navigation state, the
//! message bridge, input forwarding, the popup layer and the two
//! drag-and-drop state machines. [`SurfaceRegistry`] owns every surface of
//! a host plus the texture host they share.

pub mod drag;
pub mod engine;
pub mod errors;
pub mod events;
pub mod input;
pub mod message;
pub mod popup;
pub mod queue;
pub mod registry;
pub mod surface;

pub use drag::{
    DragDirection, DragMachine, DragOperation, DragOperations, DragPayload, DragPhase,
};
pub use engine::{EngineCommand, EngineEvent, EnginePort};
pub use errors::{DragError, SurfaceError};
pub use events::{LoadState, ScriptId, SurfaceEvent};
pub use popup::{PopupFrame, PopupLayer, PopupPlacement};
pub use registry::SurfaceRegistry;
pub use surface::{NavigationState, Surface, SurfaceSettings};
