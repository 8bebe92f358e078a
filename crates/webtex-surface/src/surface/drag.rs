//! Drag-and-drop entry points for both directions.

use tracing::debug;
use webtex_common::Point;

use super::Surface;
use crate::drag::{DragDirection, DragMachine, DragOperation, DragOperations, DragPayload};
use crate::engine::EngineCommand;
use crate::errors::DragError;
use crate::events::SurfaceEvent;
use crate::input::to_view;

impl<T: Send + Sync + 'static> Surface<T> {
    pub fn inbound_drag(&self) -> &DragMachine {
        &self.inbound
    }

    pub fn outbound_drag(&self) -> &DragMachine {
        &self.outbound
    }

    fn cursor_updated(&mut self, direction: DragDirection, operation: Option<DragOperation>) {
        if let Some(operation) = operation {
            self.emit(SurfaceEvent::DragCursorUpdated {
                direction,
                operation,
            });
        }
    }

    // -- Inbound: host content dragged into the surface ------------------

    pub fn drag_enter(
        &mut self,
        payload: DragPayload,
        position: Point,
        allowed: DragOperations,
    ) -> Result<(), DragError> {
        self.inbound.enter(payload.clone(), position, allowed)?;
        self.command(EngineCommand::DragTargetEnter {
            payload,
            position: to_view(position, self.device_scale_factor),
            allowed,
        });
        Ok(())
    }

    /// Pointer moved over a target accepting `accepted`. Returns the new
    /// negotiated operation when it changed.
    pub fn drag_over(
        &mut self,
        position: Point,
        accepted: DragOperations,
    ) -> Result<Option<DragOperation>, DragError> {
        let changed = self.inbound.over(position, accepted)?;
        let allowed = self
            .inbound
            .session()
            .map(|s| s.allowed)
            .unwrap_or_else(DragOperations::empty);
        self.command(EngineCommand::DragTargetOver {
            position: to_view(position, self.device_scale_factor),
            allowed,
        });
        self.cursor_updated(DragDirection::Inbound, changed);
        Ok(changed)
    }

    pub fn drag_leave(&mut self) -> Result<(), DragError> {
        self.inbound.leave()?;
        self.command(EngineCommand::DragTargetLeave);
        Ok(())
    }

    /// Abandon the inbound drag. Also valid after `drag_drop` while the
    /// engine has not confirmed the drop.
    pub fn drag_cancel(&mut self) -> Result<(), DragError> {
        self.inbound.cancel()?;
        self.command(EngineCommand::DragTargetLeave);
        Ok(())
    }

    /// Drop the inbound drag. The session stays open until the engine
    /// reports it handled the drop.
    pub fn drag_drop(&mut self, position: Point) -> Result<DragOperation, DragError> {
        let operation = self.inbound.drop_at(position, None)?;
        self.command(EngineCommand::DragTargetDrop {
            position: to_view(position, self.device_scale_factor),
        });
        Ok(operation)
    }

    pub(super) fn on_drag_target_accepts(&mut self, accepted: DragOperations) {
        match self.inbound.retarget(accepted) {
            Ok(changed) => self.cursor_updated(DragDirection::Inbound, changed),
            Err(e) => debug!(surface = %self.id, error = %e, "drag target update ignored"),
        }
    }

    pub(super) fn on_drag_target_finished(&mut self) {
        match self.inbound.finish() {
            Ok(session) => self.emit(SurfaceEvent::DragDropCompleted {
                operation: session.operation,
            }),
            Err(e) => debug!(surface = %self.id, error = %e, "drop completion ignored"),
        }
    }

    // -- Outbound: page content dragged out of the surface ---------------

    pub(super) fn on_drag_started(
        &mut self,
        payload: DragPayload,
        position: Point,
        allowed: DragOperations,
    ) {
        if self.outbound.enter(payload.clone(), position, allowed).is_ok() {
            self.emit(SurfaceEvent::DragStarted {
                payload,
                position,
                allowed,
            });
        }
    }

    /// The host's drag moved over a target accepting `accepted`.
    pub fn drag_source_moved(
        &mut self,
        position: Point,
        accepted: DragOperations,
    ) -> Result<Option<DragOperation>, DragError> {
        let changed = self.outbound.over(position, accepted)?;
        self.cursor_updated(DragDirection::Outbound, changed);
        Ok(changed)
    }

    /// The outbound drag ended at `position` with `operation` applied
    /// (`None` when nothing accepted it).
    pub fn drag_source_ended(
        &mut self,
        position: Point,
        operation: DragOperation,
    ) -> Result<(), DragError> {
        self.outbound.drop_at(position, Some(operation))?;
        self.command(EngineCommand::DragSourceEndedAt {
            position: to_view(position, self.device_scale_factor),
            operation,
        });
        Ok(())
    }

    /// The platform drag loop finished. Closes the outbound session.
    pub fn drag_source_system_ended(&mut self) -> Result<(), DragError> {
        self.outbound.finish()?;
        self.command(EngineCommand::DragSourceSystemEnded);
        Ok(())
    }
}
