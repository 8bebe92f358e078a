//! One embedded browsing viewport bound to one host texture.

mod drag;
mod navigation;
mod lifecycle;


pub use navigation::NavigationState;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};
use webtex_common::{FallbackReason, PhysicalSize, RenderMode, SurfaceId};
use webtex_config::schema::{QueueConfig, RenderConfig, SurfaceConfig};
use webtex_render::{FrameReport, PresentedFrame, RenderBridge, Resolution, TextureHost};

use crate::drag::{DragDirection, DragMachine};
use crate::engine::{EngineCommand, EngineEvent, EnginePort};
use crate::errors::SurfaceError;
use crate::events::{ScriptId, SurfaceEvent};
use crate::input::{to_view, KeyEvent, PointerEvent, WheelEvent};
use crate::message::MessageBridge;
use crate::popup::PopupLayer;
use crate::queue::BoundedQueue;

const ZOOM_RANGE: (f64, f64) = (-10.0, 10.0);
const SCALE_RANGE: (f32, f32) = (0.25, 8.0);

/// Settings a surface is created with.
#[derive(Debug, Clone, Default)]
pub struct SurfaceSettings {
    pub render: RenderConfig,
    pub surface: SurfaceConfig,
    pub queues: QueueConfig,
}

impl SurfaceSettings {
    pub fn from_config(config: &webtex_config::WebtexConfig) -> Self {
        Self {
            render: config.render.clone(),
            surface: config.surface.clone(),
            queues: config.queues.clone(),
        }
    }
}

pub struct Surface<T> {
    id: SurfaceId,
    bridge: RenderBridge<T>,
    navigation: NavigationState,
    size: PhysicalSize,
    device_scale_factor: f32,
    zoom_level: f64,
    audio_muted: bool,
    focused: bool,
    inbound: DragMachine,
    outbound: DragMachine,
    messages: MessageBridge,
    popup: PopupLayer,
    engine_events: Arc<BoundedQueue<EngineEvent>>,
    commands: Arc<BoundedQueue<EngineCommand>>,
    events: Vec<SurfaceEvent>,
    pending_downloads: HashSet<u32>,
    next_script: u64,
    closed: bool,
}

impl<T: Send + Sync + 'static> Surface<T> {
    /// Create a surface and the port its engine glue talks through.
    ///
    /// `resolution` is final: acceleration is never re-detected later.
    pub fn new<H>(
        host: &mut H,
        id: SurfaceId,
        resolution: Resolution,
        settings: &SurfaceSettings,
    ) -> Result<(Self, EnginePort), SurfaceError>
    where
        H: TextureHost<Texture = T>,
    {
        let size = settings.surface.size();
        if size.is_empty() {
            return Err(SurfaceError::InvalidSize(format!("{size}")));
        }
        let background = settings.surface.background();
        let (bridge, frames) =
            RenderBridge::new(host, id, resolution, size, &settings.render, background)?;

        let messages = MessageBridge::new(id);
        let engine_events = Arc::new(BoundedQueue::new(
            "engine_events",
            settings.queues.event_capacity,
        ));
        let commands = Arc::new(BoundedQueue::with_eviction(
            "engine_commands",
            settings.queues.command_capacity,
            EngineCommand::is_evictable,
        ));
        let port = EnginePort::new(
            id,
            frames,
            engine_events.clone(),
            commands.clone(),
            messages.flags(),
        );

        let s = &settings.surface;
        let device_scale_factor = s.device_scale_factor.clamp(SCALE_RANGE.0, SCALE_RANGE.1);
        let zoom_level = s.zoom_level.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
        commands.push(EngineCommand::Create {
            url: s.url.clone(),
            size,
            device_scale_factor,
            accelerated: resolution.mode == RenderMode::Accelerated,
            max_frame_rate: settings.render.max_frame_rate,
            background_argb: background.to_argb(),
            zoom_level,
            audio_muted: s.audio_muted,
        });

        info!(surface = %id, url = %s.url, %size, mode = %resolution.mode, "surface created");

        let surface = Self {
            id,
            bridge,
            navigation: NavigationState::new(s.url.clone()),
            size,
            device_scale_factor,
            zoom_level,
            audio_muted: s.audio_muted,
            focused: false,
            inbound: DragMachine::new(DragDirection::Inbound),
            outbound: DragMachine::new(DragDirection::Outbound),
            messages,
            popup: PopupLayer::default(),
            engine_events,
            commands,
            events: Vec::new(),
            pending_downloads: HashSet::new(),
            next_script: 0,
            closed: false,
        };
        Ok((surface, port))
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn command(&self, command: EngineCommand) -> bool {
        if self.closed {
            debug!(surface = %self.id, ?command, "surface closed, command dropped");
            return false;
        }
        self.commands.push(command)
    }

    fn emit(&mut self, event: SurfaceEvent) {
        self.events.push(event);
    }

    /// Host-facing events since the last drain.
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Frames ---------------------------------------------------------

    /// Last published texture, or the placeholder. Never blocks.
    pub fn current_texture(&self) -> Arc<T> {
        self.bridge.current_texture()
    }

    pub fn current_frame(&self) -> &PresentedFrame<T> {
        self.bridge.current_frame()
    }

    pub fn current_mode(&self) -> RenderMode {
        self.bridge.current_mode()
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        self.bridge.fallback_reason()
    }

    pub fn resolution(&self) -> &Resolution {
        self.bridge.resolution()
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// Popup to draw over the view, if the engine has one open.
    pub fn popup(&self) -> &PopupLayer {
        &self.popup
    }

    pub fn device_scale_factor(&self) -> f32 {
        self.device_scale_factor
    }

    pub fn resize(&mut self, size: PhysicalSize) -> Result<(), SurfaceError> {
        if size.is_empty() {
            return Err(SurfaceError::InvalidSize(format!("{size}")));
        }
        if size == self.size {
            return Ok(());
        }
        self.size = size;
        self.bridge.resize(size);
        self.command(EngineCommand::Resized {
            size,
            device_scale_factor: self.device_scale_factor,
        });
        Ok(())
    }

    pub fn set_device_scale_factor(&mut self, factor: f32) -> Result<(), SurfaceError> {
        if !factor.is_finite() || !(SCALE_RANGE.0..=SCALE_RANGE.1).contains(&factor) {
            return Err(SurfaceError::InvalidSize(format!(
                "device scale factor {factor} outside {}..={}",
                SCALE_RANGE.0, SCALE_RANGE.1
            )));
        }
        self.device_scale_factor = factor;
        self.command(EngineCommand::Resized {
            size: self.size,
            device_scale_factor: factor,
        });
        Ok(())
    }

    // -- Navigation -----------------------------------------------------

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn url(&self) -> &str {
        &self.navigation.url
    }

    pub fn title(&self) -> &str {
        &self.navigation.title
    }

    pub fn is_loading(&self) -> bool {
        self.navigation.loading
    }

    pub fn load_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.navigation.url = url.clone();
        self.command(EngineCommand::LoadUrl { url });
    }

    pub fn reload(&mut self) {
        self.command(EngineCommand::Reload);
    }

    pub fn reload_ignore_cache(&mut self) {
        self.command(EngineCommand::ReloadIgnoreCache);
    }

    pub fn stop_loading(&mut self) {
        self.command(EngineCommand::StopLoading);
    }

    pub fn go_back(&mut self) {
        self.command(EngineCommand::GoBack);
    }

    pub fn go_forward(&mut self) {
        self.command(EngineCommand::GoForward);
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// Clamped to -10..=10. Non-finite levels are ignored.
    pub fn set_zoom_level(&mut self, level: f64) {
        if !level.is_finite() {
            return;
        }
        let level = level.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
        self.zoom_level = level;
        self.command(EngineCommand::SetZoomLevel { level });
    }

    pub fn is_audio_muted(&self) -> bool {
        self.audio_muted
    }

    pub fn set_audio_muted(&mut self, muted: bool) {
        self.audio_muted = muted;
        self.command(EngineCommand::SetAudioMuted { muted });
    }

    /// Run `script` in the page. The result arrives later as
    /// [`SurfaceEvent::ScriptCompleted`] with the returned id.
    pub fn eval(&mut self, script: impl Into<String>) -> ScriptId {
        self.next_script += 1;
        let id = ScriptId(self.next_script);
        self.command(EngineCommand::Eval {
            id,
            script: script.into(),
        });
        id
    }

    // -- Messages -------------------------------------------------------

    /// Host-to-page text message. Fire and forget.
    pub fn send_message(&mut self, text: impl Into<String>) -> bool {
        self.command(EngineCommand::PostMessage { text: text.into() })
    }

    pub fn send_binary_message(&mut self, bytes: Vec<u8>) -> bool {
        self.command(EngineCommand::PostBinary { bytes })
    }

    pub fn on_message(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.messages.on_message(handler);
    }

    pub fn on_binary_message(&mut self, handler: impl FnMut(&[u8]) + Send + 'static) {
        self.messages.on_binary_message(handler);
    }

    pub fn clear_message_handlers(&mut self) {
        self.messages.clear_handlers();
    }

    pub fn messages(&self) -> &MessageBridge {
        &self.messages
    }

    // -- Input ----------------------------------------------------------

    pub fn send_pointer(&mut self, mut event: PointerEvent) {
        event.position = to_view(event.position, self.device_scale_factor);
        self.command(EngineCommand::Pointer(event));
    }

    pub fn send_wheel(&mut self, mut event: WheelEvent) {
        event.position = to_view(event.position, self.device_scale_factor);
        self.command(EngineCommand::Wheel(event));
    }

    pub fn send_key(&mut self, event: KeyEvent) {
        self.command(EngineCommand::Key(event));
    }

    pub fn set_focus(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;
        self.command(EngineCommand::Focus { focused });
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    // -- Downloads ------------------------------------------------------

    /// Answer a [`SurfaceEvent::DownloadRequested`]. Returns `false` for
    /// unknown or already answered ids.
    pub fn resolve_download(&mut self, id: u32, accept: bool) -> bool {
        if !self.pending_downloads.remove(&id) {
            return false;
        }
        self.command(EngineCommand::ResolveDownload { id, accept })
    }

    /// Apply queued engine events and present the newest frame.
    pub fn pump<H>(&mut self, host: &mut H) -> FrameReport
    where
        H: TextureHost<Texture = T>,
    {
        if self.closed {
            return FrameReport::default();
        }
        for event in self.engine_events.drain() {
            self.apply(event);
        }
        let report = self.bridge.process(host);
        if let Some(reason) = report.downgraded {
            self.emit(SurfaceEvent::FallbackActivated { reason });
            self.command(EngineCommand::DisableAcceleration);
        }
        report
    }
}

impl<T> std::fmt::Debug for Surface<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("url", &self.navigation.url)
            .field("size", &self.size)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
