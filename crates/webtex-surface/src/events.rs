//! Events the surface reports to the host.

use serde::{Deserialize, Serialize};
use webtex_common::{FallbackReason, Point};

use crate::drag::{DragDirection, DragOperation, DragOperations, DragPayload};
use crate::popup::PopupPlacement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Started,
    Finished { http_status: u16 },
    Failed { code: i32, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    Default,
    Pointer,
    Text,
    Wait,
    Progress,
    Crosshair,
    Move,
    NotAllowed,
    Grab,
    Grabbing,
    ResizeEw,
    ResizeNs,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub id: u32,
    pub url: String,
    pub suggested_name: String,
    pub mime_type: String,
    /// Negative when the engine does not know the size.
    pub total_bytes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub id: u32,
    pub received_bytes: i64,
    pub total_bytes: i64,
    pub complete: bool,
    pub canceled: bool,
}

/// Identifies one `eval` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptId(pub u64);

/// Events emitted by a surface, drained by the host once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SurfaceEvent {
    UrlChanged(String),
    TitleChanged(String),
    LoadingStateChanged(LoadState),
    HistoryChanged {
        can_go_back: bool,
        can_go_forward: bool,
    },
    /// Page content started a drag out of the surface.
    DragStarted {
        payload: DragPayload,
        position: Point,
        allowed: DragOperations,
    },
    /// The negotiated drag operation changed.
    DragCursorUpdated {
        direction: DragDirection,
        operation: DragOperation,
    },
    /// The engine finished handling an inbound drop.
    DragDropCompleted {
        operation: DragOperation,
    },
    CursorChanged(CursorKind),
    ConsoleMessage {
        level: ConsoleLevel,
        message: String,
        source: String,
        line: i32,
    },
    DownloadRequested(DownloadRequest),
    DownloadUpdated(DownloadProgress),
    ScriptCompleted {
        id: ScriptId,
        result: Result<String, String>,
    },
    /// A popup was shown, hidden or moved.
    PopupChanged(PopupPlacement),
    /// Acceleration was lost at runtime. Sent at most once per surface.
    FallbackActivated {
        reason: FallbackReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_json_is_tagged() {
        let json = serde_json::to_string(&SurfaceEvent::TitleChanged("Docs".into())).unwrap();
        assert_eq!(json, r#"{"type":"TitleChanged","payload":"Docs"}"#);
    }

    #[test]
    fn load_state_round_trips() {
        let state = LoadState::Failed {
            code: -105,
            text: "NAME_NOT_RESOLVED".into(),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"state\":\"failed\""));
        let back: LoadState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
