//! String and binary messages between host logic and page script.
//!
//! Order is kept per direction. A message sent toward a side with no
//! handler is dropped at send time; nothing is buffered until a handler
//! shows up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use webtex_common::SurfaceId;

pub type TextHandler = Box<dyn FnMut(&str) + Send>;
pub type BinaryHandler = Box<dyn FnMut(&[u8]) + Send>;

/// Handler presence, shared with the engine side so it can drop messages
/// before they are queued.
#[derive(Debug, Default)]
pub struct HandlerFlags {
    text: AtomicBool,
    binary: AtomicBool,
}

impl HandlerFlags {
    pub fn has_text(&self) -> bool {
        self.text.load(Ordering::Acquire)
    }

    pub fn has_binary(&self) -> bool {
        self.binary.load(Ordering::Acquire)
    }
}

/// Host-side receiving end for page-originated messages.
pub struct MessageBridge {
    surface: SurfaceId,
    flags: Arc<HandlerFlags>,
    text: Option<TextHandler>,
    binary: Option<BinaryHandler>,
    delivered: u64,
    dropped: u64,
}

impl MessageBridge {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            flags: Arc::new(HandlerFlags::default()),
            text: None,
            binary: None,
            delivered: 0,
            dropped: 0,
        }
    }

    pub fn flags(&self) -> Arc<HandlerFlags> {
        self.flags.clone()
    }

    pub fn on_message(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.text = Some(Box::new(handler));
        self.flags.text.store(true, Ordering::Release);
    }

    pub fn on_binary_message(&mut self, handler: impl FnMut(&[u8]) + Send + 'static) {
        self.binary = Some(Box::new(handler));
        self.flags.binary.store(true, Ordering::Release);
    }

    pub fn clear_handlers(&mut self) {
        self.flags.text.store(false, Ordering::Release);
        self.flags.binary.store(false, Ordering::Release);
        self.text = None;
        self.binary = None;
    }

    /// Hand a page message to the text handler. Returns whether it was
    /// observed.
    pub fn deliver_text(&mut self, text: &str) -> bool {
        match self.text.as_mut() {
            Some(handler) => {
                handler(text);
                self.delivered += 1;
                true
            }
            None => {
                self.dropped += 1;
                debug!(surface = %self.surface, len = text.len(), "no message handler, dropped");
                false
            }
        }
    }

    pub fn deliver_binary(&mut self, bytes: &[u8]) -> bool {
        match self.binary.as_mut() {
            Some(handler) => {
                handler(bytes);
                self.delivered += 1;
                true
            }
            None => {
                self.dropped += 1;
                debug!(surface = %self.surface, len = bytes.len(), "no binary handler, dropped");
                false
            }
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl std::fmt::Debug for MessageBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBridge")
            .field("surface", &self.surface)
            .field("text_handler", &self.text.is_some())
            .field("binary_handler", &self.binary.is_some())
            .field("delivered", &self.delivered)
            .field("dropped", &self.dropped)
            .finish()
    }
}
