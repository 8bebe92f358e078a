use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Drag operation mask, bit-compatible with the engine's values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DragOperations: u32 {
        const COPY = 1;
        const LINK = 2;
        const MOVE = 16;
    }
}

/// The single operation a drag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragOperation {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

impl DragOperation {
    pub fn bits(self) -> DragOperations {
        match self {
            Self::None => DragOperations::empty(),
            Self::Copy => DragOperations::COPY,
            Self::Link => DragOperations::LINK,
            Self::Move => DragOperations::MOVE,
        }
    }

    /// Lowest-valued operation both sides allow, `None` when they share none.
    pub fn negotiate(allowed: DragOperations, accepted: DragOperations) -> Self {
        let common = allowed & accepted;
        if common.contains(DragOperations::COPY) {
            Self::Copy
        } else if common.contains(DragOperations::LINK) {
            Self::Link
        } else if common.contains(DragOperations::MOVE) {
            Self::Move
        } else {
            Self::None
        }
    }
}

impl fmt::Display for DragOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::Link => "link",
            Self::Move => "move",
        };
        f.write_str(name)
    }
}
