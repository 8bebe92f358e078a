use serde::{Deserialize, Serialize};

use crate::events::LoadState;

/// Best-effort mirror of the engine's navigation state.
///
/// Written by host calls and by engine notifications alike; whichever
/// arrives last wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub url: String,
    pub title: String,
    pub loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// HTTP status of the last finished load.
    pub last_status: Option<u16>,
    /// Error text of the last failed load.
    pub last_error: Option<String>,
}

impl NavigationState {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            loading: false,
            can_go_back: false,
            can_go_forward: false,
            last_status: None,
            last_error: None,
        }
    }

    pub fn apply_load_state(&mut self, state: &LoadState) {
        match state {
            LoadState::Started => {
                self.loading = true;
                self.last_error = None;
            }
            LoadState::Finished { http_status } => {
                self.loading = false;
                self.last_status = Some(*http_status);
            }
            LoadState::Failed { text, .. } => {
                self.loading = false;
                self.last_error = Some(text.clone());
            }
        }
    }
}
