//! Process-wide surface lifecycle notifications.
//!
//! Per-surface traffic (frames, drags, messages) never goes through the bus;
//! it stays on each surface's own queues. The bus only carries coarse
//! lifecycle facts that diagnostics or an editor UI may want to observe.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{FallbackReason, RenderMode, SurfaceId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    SurfaceAttached { surface: SurfaceId, mode: RenderMode },
    SurfaceDetached(SurfaceId),
    FallbackActivated { surface: SurfaceId, reason: FallbackReason },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publish to all current subscribers. Returns how many received it.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
