//! Engine event intake and teardown.

use tracing::{debug, info, warn};
use webtex_render::TextureHost;

use super::Surface;
use crate::engine::{EngineCommand, EngineEvent};
use crate::events::SurfaceEvent;
use crate::popup::to_host_rect;

impl<T: Send + Sync + 'static> Surface<T> {
    /// Apply one engine notification on the host timeline.
    pub(super) fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::AddressChanged(url) => {
                self.navigation.url = url.clone();
                self.emit(SurfaceEvent::UrlChanged(url));
            }
            EngineEvent::TitleChanged(title) => {
                self.navigation.title = title.clone();
                self.emit(SurfaceEvent::TitleChanged(title));
            }
            EngineEvent::LoadingState(state) => {
                self.navigation.apply_load_state(&state);
                self.emit(SurfaceEvent::LoadingStateChanged(state));
            }
            EngineEvent::HistoryState {
                can_go_back,
                can_go_forward,
            } => {
                self.navigation.can_go_back = can_go_back;
                self.navigation.can_go_forward = can_go_forward;
                self.emit(SurfaceEvent::HistoryChanged {
                    can_go_back,
                    can_go_forward,
                });
            }
            EngineEvent::Message(text) => {
                self.messages.deliver_text(&text);
            }
            EngineEvent::BinaryMessage(bytes) => {
                self.messages.deliver_binary(&bytes);
            }
            EngineEvent::DragStarted {
                payload,
                position,
                allowed,
            } => self.on_drag_started(payload, position, allowed),
            EngineEvent::DragTargetAccepts(accepted) => self.on_drag_target_accepts(accepted),
            EngineEvent::DragTargetFinished => self.on_drag_target_finished(),
            EngineEvent::CursorChanged(kind) => self.emit(SurfaceEvent::CursorChanged(kind)),
            EngineEvent::ConsoleMessage {
                level,
                message,
                source,
                line,
            } => self.emit(SurfaceEvent::ConsoleMessage {
                level,
                message,
                source,
                line,
            }),
            EngineEvent::DownloadRequested(request) => {
                self.pending_downloads.insert(request.id);
                self.emit(SurfaceEvent::DownloadRequested(request));
            }
            EngineEvent::DownloadUpdated(progress) => {
                if progress.complete || progress.canceled {
                    self.pending_downloads.remove(&progress.id);
                }
                self.emit(SurfaceEvent::DownloadUpdated(progress));
            }
            EngineEvent::PopupShow(visible) => {
                if self.popup.show(visible) {
                    self.emit(SurfaceEvent::PopupChanged(self.popup.placement()));
                }
            }
            EngineEvent::PopupMoved(rect) => {
                let rect = to_host_rect(rect, self.device_scale_factor);
                if self.popup.place(rect) {
                    self.emit(SurfaceEvent::PopupChanged(self.popup.placement()));
                }
            }
            EngineEvent::PopupPaint(frame) => {
                if !self.popup.paint(frame) {
                    debug!(surface = %self.id, "paint for hidden popup ignored");
                }
            }
            EngineEvent::ScriptCompleted { id, result } => {
                if id.0 == 0 || id.0 > self.next_script {
                    debug!(surface = %self.id, id = id.0, "result for unknown script ignored");
                    return;
                }
                self.emit(SurfaceEvent::ScriptCompleted { id, result });
            }
        }
    }

    /// Tear the surface down.
    ///
    /// Pending frames are dropped before the live import is released and
    /// open drags are force-cancelled. Undelivered messages are discarded
    /// in both directions and any open popup is forgotten.
    /// The engine is left with a final `Close` command to drain.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: TextureHost<Texture = T>,
    {
        if self.closed {
            return;
        }

        self.bridge.teardown(host);
        self.engine_events.close();
        self.messages.clear_handlers();
        let discarded = self.commands.retain(|command| !command.is_message());
        if discarded > 0 {
            debug!(surface = %self.id, discarded, "undelivered host messages discarded");
        }

        if self.inbound.force_cancel().is_some() {
            warn!(surface = %self.id, "inbound drag cancelled by teardown");
            self.commands.push(EngineCommand::DragTargetLeave);
        }
        if self.outbound.force_cancel().is_some() {
            warn!(surface = %self.id, "outbound drag cancelled by teardown");
            self.commands.push(EngineCommand::DragSourceSystemEnded);
        }
        self.commands.push(EngineCommand::Close);

        self.popup = Default::default();
        self.pending_downloads.clear();
        self.events.clear();
        self.closed = true;
        info!(surface = %self.id, "surface torn down");
    }
}
