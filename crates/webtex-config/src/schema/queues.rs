//! Capacities for the cross-context queues.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Engine-to-host event intake (valid range: 16-65536).
    pub event_capacity: usize,
    /// Host-to-engine command outflow (valid range: 16-65536).
    pub command_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
            command_capacity: 1024,
        }
    }
}
