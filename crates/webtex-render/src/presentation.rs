//! The single front texture the host samples every draw.

use std::sync::Arc;

use tracing::debug;
use webtex_common::PhysicalSize;

/// Which path produced the published texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    Placeholder,
    Accelerated,
    Software,
}

#[derive(Debug)]
pub struct PresentedFrame<T> {
    pub generation: u64,
    pub size: PhysicalSize,
    pub origin: FrameOrigin,
    pub texture: Arc<T>,
}

impl<T> Clone for PresentedFrame<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            size: self.size,
            origin: self.origin,
            texture: self.texture.clone(),
        }
    }
}

/// Owns the published frame. Generations only move forward.
#[derive(Debug)]
pub struct PresentationController<T> {
    current: PresentedFrame<T>,
}

impl<T> PresentationController<T> {
    /// Start out showing `placeholder` at generation 0.
    pub fn new(placeholder: T) -> Self {
        Self {
            current: PresentedFrame {
                generation: 0,
                size: PhysicalSize::new(1, 1),
                origin: FrameOrigin::Placeholder,
                texture: Arc::new(placeholder),
            },
        }
    }

    /// Replace the published frame. Frames not newer than the current one
    /// are refused and `false` is returned.
    pub fn publish(&mut self, frame: PresentedFrame<T>) -> bool {
        if frame.generation <= self.current.generation {
            debug!(
                generation = frame.generation,
                current = self.current.generation,
                "refusing to publish stale frame"
            );
            return false;
        }
        self.current = frame;
        true
    }

    /// Never blocks. The placeholder until the first frame lands.
    pub fn current_texture(&self) -> Arc<T> {
        self.current.texture.clone()
    }

    pub fn current(&self) -> &PresentedFrame<T> {
        &self.current
    }

    pub fn generation(&self) -> u64 {
        self.current.generation
    }

    pub fn origin(&self) -> FrameOrigin {
        self.current.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(generation: u64, origin: FrameOrigin, tag: &'static str) -> PresentedFrame<&'static str> {
        PresentedFrame {
            generation,
            size: PhysicalSize::new(2, 2),
            origin,
            texture: Arc::new(tag),
        }
    }

    #[test]
    fn starts_with_placeholder() {
        let pc = PresentationController::new("placeholder");
        assert_eq!(*pc.current_texture(), "placeholder");
        assert_eq!(pc.origin(), FrameOrigin::Placeholder);
        assert_eq!(pc.generation(), 0);
    }

    #[test]
    fn generations_never_go_backwards() {
        let mut pc = PresentationController::new("placeholder");
        assert!(pc.publish(frame(3, FrameOrigin::Accelerated, "a3")));
        assert!(!pc.publish(frame(2, FrameOrigin::Software, "s2")));
        assert!(!pc.publish(frame(3, FrameOrigin::Software, "s3")));
        assert_eq!(*pc.current_texture(), "a3");
        assert!(pc.publish(frame(4, FrameOrigin::Software, "s4")));
        assert_eq!(pc.origin(), FrameOrigin::Software);
    }

    #[test]
    fn readers_keep_their_texture_across_publish() {
        let mut pc = PresentationController::new("placeholder");
        pc.publish(frame(1, FrameOrigin::Accelerated, "a1"));
        let held = pc.current_texture();
        pc.publish(frame(2, FrameOrigin::Accelerated, "a2"));
        assert_eq!(*held, "a1");
        assert_eq!(*pc.current_texture(), "a2");
    }
}
