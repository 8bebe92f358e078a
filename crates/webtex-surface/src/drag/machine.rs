//! Per-direction drag session state machine.
//!
//! `Idle -> Entered -> Over* -> Dropped -> Idle`, with leave and cancel
//! returning straight to `Idle` from `Entered` or `Over`. A dropped session
//! stays open until its owner reports completion.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use webtex_common::Point;

use super::{DragOperation, DragOperations, DragPayload};
use crate::errors::DragError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragDirection {
    /// Host content dragged into the surface.
    Inbound,
    /// Page content dragged out of the surface.
    Outbound,
}

impl fmt::Display for DragDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Entered,
    Over,
    Dropped,
}

impl fmt::Display for DragPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Entered => "entered",
            Self::Over => "over",
            Self::Dropped => "dropped",
        })
    }
}

/// The transition a caller asked for, reported in conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAction {
    Enter,
    Over,
    Leave,
    Cancel,
    Drop,
    Finish,
}

impl fmt::Display for DragAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "enter",
            Self::Over => "over",
            Self::Leave => "leave",
            Self::Cancel => "cancel",
            Self::Drop => "drop",
            Self::Finish => "finish",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    pub direction: DragDirection,
    pub payload: DragPayload,
    /// Fixed when the session is entered.
    pub allowed: DragOperations,
    pub position: Point,
    pub operation: DragOperation,
}

#[derive(Debug)]
pub struct DragMachine {
    direction: DragDirection,
    phase: DragPhase,
    session: Option<DragSession>,
}

impl DragMachine {
    pub fn new(direction: DragDirection) -> Self {
        Self {
            direction,
            phase: DragPhase::Idle,
            session: None,
        }
    }

    pub fn direction(&self) -> DragDirection {
        self.direction
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    fn conflict(&self, attempted: DragAction) -> DragError {
        conflict(self.direction, self.phase, attempted)
    }

    fn require(&self, attempted: DragAction, phases: &[DragPhase]) -> Result<(), DragError> {
        if phases.contains(&self.phase) {
            Ok(())
        } else {
            Err(self.conflict(attempted))
        }
    }

    /// Open a session. Only valid while idle.
    pub fn enter(
        &mut self,
        payload: DragPayload,
        position: Point,
        allowed: DragOperations,
    ) -> Result<(), DragError> {
        self.require(DragAction::Enter, &[DragPhase::Idle])?;
        self.session = Some(DragSession {
            direction: self.direction,
            payload,
            allowed,
            position,
            operation: DragOperation::None,
        });
        self.phase = DragPhase::Entered;
        debug!(direction = %self.direction, ?allowed, "drag entered");
        Ok(())
    }

    /// Move over a target accepting `accepted`.
    ///
    /// Returns the new negotiated operation only when it changed.
    pub fn over(
        &mut self,
        position: Point,
        accepted: DragOperations,
    ) -> Result<Option<DragOperation>, DragError> {
        self.require(DragAction::Over, &[DragPhase::Entered, DragPhase::Over])?;
        self.phase = DragPhase::Over;
        let (direction, phase) = (self.direction, self.phase);
        let Some(session) = self.session.as_mut() else {
            return Err(conflict(direction, phase, DragAction::Over));
        };
        session.position = position;
        Ok(renegotiate(session, accepted))
    }

    /// The target changed what it accepts without the pointer moving.
    pub fn retarget(&mut self, accepted: DragOperations) -> Result<Option<DragOperation>, DragError> {
        self.require(DragAction::Over, &[DragPhase::Entered, DragPhase::Over])?;
        let (direction, phase) = (self.direction, self.phase);
        let Some(session) = self.session.as_mut() else {
            return Err(conflict(direction, phase, DragAction::Over));
        };
        Ok(renegotiate(session, accepted))
    }

    /// Drop at `position`. `result` overrides the negotiated operation when
    /// the outcome was decided elsewhere.
    pub fn drop_at(
        &mut self,
        position: Point,
        result: Option<DragOperation>,
    ) -> Result<DragOperation, DragError> {
        self.require(DragAction::Drop, &[DragPhase::Entered, DragPhase::Over])?;
        let (direction, phase) = (self.direction, self.phase);
        let Some(session) = self.session.as_mut() else {
            return Err(conflict(direction, phase, DragAction::Drop));
        };
        session.position = position;
        if let Some(op) = result {
            session.operation = op;
        }
        let op = session.operation;
        self.phase = DragPhase::Dropped;
        debug!(direction = %self.direction, operation = %op, "drag dropped");
        Ok(op)
    }

    /// Pointer left the surface. No operation is applied.
    pub fn leave(&mut self) -> Result<DragSession, DragError> {
        self.close(DragAction::Leave)
    }

    /// Abandon the session. An inbound session may also be cancelled after
    /// the drop, when the engine never reports that it handled it.
    pub fn cancel(&mut self) -> Result<DragSession, DragError> {
        if self.direction == DragDirection::Inbound && self.phase == DragPhase::Dropped {
            return self.reset(DragAction::Cancel);
        }
        self.close(DragAction::Cancel)
    }

    fn close(&mut self, action: DragAction) -> Result<DragSession, DragError> {
        self.require(action, &[DragPhase::Entered, DragPhase::Over])?;
        self.reset(action)
    }

    /// Completion of a dropped session.
    pub fn finish(&mut self) -> Result<DragSession, DragError> {
        self.require(DragAction::Finish, &[DragPhase::Dropped])?;
        self.reset(DragAction::Finish)
    }

    fn reset(&mut self, action: DragAction) -> Result<DragSession, DragError> {
        let session = self.session.take().ok_or_else(|| self.conflict(action))?;
        self.phase = DragPhase::Idle;
        debug!(direction = %self.direction, %action, "drag session closed");
        Ok(session)
    }

    /// End any session regardless of phase. Used on teardown.
    pub fn force_cancel(&mut self) -> Option<DragSession> {
        self.phase = DragPhase::Idle;
        self.session.take()
    }
}

fn conflict(direction: DragDirection, phase: DragPhase, attempted: DragAction) -> DragError {
    warn!(%direction, %phase, %attempted, "drag state conflict");
    DragError::StateConflict {
        direction,
        phase,
        attempted,
    }
}

fn renegotiate(session: &mut DragSession, accepted: DragOperations) -> Option<DragOperation> {
    let next = DragOperation::negotiate(session.allowed, accepted);
    if next == session.operation {
        return None;
    }
    session.operation = next;
    Some(next)
}
