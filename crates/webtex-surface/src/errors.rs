use webtex_common::SurfaceId;
use webtex_render::RendererError;

use crate::drag::{DragAction, DragDirection, DragPhase};

/// A drag call that does not fit the session's current phase.
///
/// The session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("{direction} drag: cannot {attempted} while {phase}")]
    StateConflict {
        direction: DragDirection,
        phase: DragPhase,
        attempted: DragAction,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("no such surface: {0}")]
    NotFound(SurfaceId),

    #[error("invalid surface size: {0}")]
    InvalidSize(String),

    #[error("surface is closed")]
    Closed,

    #[error(transparent)]
    Drag(#[from] DragError),

    #[error(transparent)]
    Renderer(#[from] RendererError),
}

impl From<SurfaceError> for webtex_common::WebtexError {
    fn from(e: SurfaceError) -> Self {
        webtex_common::WebtexError::Surface(e.to_string())
    }
}
