//! The engine side of a surface.
//!
//! [`EnginePort`] is what the browser-engine glue holds. Everything it
//! reports is queued and applied on the host timeline during
//! `Surface::pump`; everything the host asks for comes back out of
//! [`EnginePort::drain_commands`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use webtex_common::{PhysicalSize, PixelRect, Point, SurfaceId};
use webtex_render::{ExternalHandle, FrameSender, SubmitRejection};

use crate::drag::{DragOperation, DragOperations, DragPayload};
use crate::events::{ConsoleLevel, CursorKind, DownloadProgress, DownloadRequest, LoadState, ScriptId};
use crate::input::{KeyEvent, PointerEvent, PointerKind, WheelEvent};
use crate::message::HandlerFlags;
use crate::popup::PopupFrame;
use crate::queue::BoundedQueue;

/// Notifications from the engine, in the order it produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    AddressChanged(String),
    TitleChanged(String),
    LoadingState(LoadState),
    HistoryState {
        can_go_back: bool,
        can_go_forward: bool,
    },
    Message(String),
    BinaryMessage(Vec<u8>),
    /// Page content began dragging out of the view.
    DragStarted {
        payload: DragPayload,
        position: Point,
        allowed: DragOperations,
    },
    /// Operations the page accepts under the current inbound drag.
    DragTargetAccepts(DragOperations),
    /// The page finished handling an inbound drop.
    DragTargetFinished,
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
    PopupShow(bool),
    /// Popup placement in view coordinates.
    PopupMoved(PixelRect),
    PopupPaint(PopupFrame),
}

/// Requests from the host, for the engine glue to carry out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EngineCommand {
    Create {
        url: String,
        size: PhysicalSize,
        device_scale_factor: f32,
        accelerated: bool,
        max_frame_rate: u32,
        background_argb: u32,
        zoom_level: f64,
        audio_muted: bool,
    },
    LoadUrl {
        url: String,
    },
    Reload,
    ReloadIgnoreCache,
    StopLoading,
    GoBack,
    GoForward,
    SetZoomLevel {
        level: f64,
    },
    SetAudioMuted {
        muted: bool,
    },
    Eval {
        id: ScriptId,
        script: String,
    },
    PostMessage {
        text: String,
    },
    PostBinary {
        bytes: Vec<u8>,
    },
    Resized {
        size: PhysicalSize,
        device_scale_factor: f32,
    },
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    Focus {
        focused: bool,
    },
    DragTargetEnter {
        payload: DragPayload,
        position: Point,
        allowed: DragOperations,
    },
    DragTargetOver {
        position: Point,
        allowed: DragOperations,
    },
    DragTargetLeave,
    DragTargetDrop {
        position: Point,
    },
    DragSourceEndedAt {
        position: Point,
        operation: DragOperation,
    },
    DragSourceSystemEnded,
    ResolveDownload {
        id: u32,
        accept: bool,
    },
    /// Switch the engine to raw-pixel painting.
    DisableAcceleration,
    Close,
}

impl EngineCommand {
    /// Input that a flooded queue may shed. A later event of the same kind
    /// supersedes it. Lifecycle, navigation, drag and resize commands are
    /// never shed.
    pub fn is_evictable(&self) -> bool {
        matches!(
            self,
            EngineCommand::Pointer(PointerEvent {
                kind: PointerKind::Move,
                ..
            }) | EngineCommand::Wheel(_)
        )
    }

    /// Page-bound messages, discarded on teardown.
    pub fn is_message(&self) -> bool {
        matches!(self, EngineCommand::PostMessage { .. } | EngineCommand::PostBinary { .. })
    }
}

/// Engine-side handle for one surface. `Send`, cheap to clone.
#[derive(Debug, Clone)]
pub struct EnginePort {
    surface: SurfaceId,
    frames: FrameSender,
    events: Arc<BoundedQueue<EngineEvent>>,
    commands: Arc<BoundedQueue<EngineCommand>>,
    handlers: Arc<HandlerFlags>,
}

impl EnginePort {
    pub(crate) fn new(
        surface: SurfaceId,
        frames: FrameSender,
        events: Arc<BoundedQueue<EngineEvent>>,
        commands: Arc<BoundedQueue<EngineCommand>>,
        handlers: Arc<HandlerFlags>,
    ) -> Self {
        Self {
            surface,
            frames,
            events,
            commands,
            handlers,
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    pub fn submit_external_frame(
        &self,
        handle: ExternalHandle,
        generation: u64,
        size: PhysicalSize,
    ) -> Result<u64, SubmitRejection> {
        self.frames.submit_external_frame(handle, generation, size)
    }

    pub fn submit_pixels(
        &self,
        buffer: Vec<u8>,
        stride: u32,
        size: PhysicalSize,
        dirty: Vec<PixelRect>,
    ) -> Result<u64, SubmitRejection> {
        self.frames.submit_pixels(buffer, stride, size, dirty)
    }

    /// Whether the surface still takes shared-texture frames.
    pub fn is_accelerated(&self) -> bool {
        self.frames.is_accelerated()
    }

    /// Generation of the newest accepted frame. Shared-texture generations
    /// must continue past it, including after pixel frames.
    pub fn last_generation(&self) -> u64 {
        self.frames.last_generation()
    }

    /// Hand over a popup bitmap, tightly packed BGRA8.
    pub fn submit_popup_pixels(
        &self,
        buffer: Vec<u8>,
        size: PhysicalSize,
    ) -> Result<(), SubmitRejection> {
        if self.is_closed() {
            return Err(SubmitRejection::Closed);
        }
        if size.is_empty() {
            return Err(SubmitRejection::InvalidSize(format!("empty popup {size}")));
        }
        let expected_len = size.packed_stride() as usize * size.height as usize;
        if buffer.len() != expected_len {
            return Err(SubmitRejection::SizeMismatch {
                expected_len,
                actual_len: buffer.len(),
            });
        }
        if !self.emit(EngineEvent::PopupPaint(PopupFrame { buffer, size })) {
            return Err(SubmitRejection::Closed);
        }
        Ok(())
    }

    /// Queue an event for the host. Returns `false` after teardown.
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.events.push(event)
    }

    /// Page-to-host text message. Dropped here when the host has no
    /// handler registered.
    pub fn send_message(&self, text: impl Into<String>) -> bool {
        if !self.handlers.has_text() {
            debug!(surface = %self.surface, "no host message handler, dropped");
            return false;
        }
        self.emit(EngineEvent::Message(text.into()))
    }

    pub fn send_binary_message(&self, bytes: Vec<u8>) -> bool {
        if !self.handlers.has_binary() {
            debug!(surface = %self.surface, len = bytes.len(), "no host binary handler, dropped");
            return false;
        }
        self.emit(EngineEvent::BinaryMessage(bytes))
    }

    /// Everything the host has asked for since the last drain, in order.
    pub fn drain_commands(&self) -> Vec<EngineCommand> {
        self.commands.drain()
    }

    /// True once the host has torn the surface down.
    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}
