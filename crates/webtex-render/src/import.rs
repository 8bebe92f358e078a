//! One live external import per surface.

use std::sync::Arc;

use tracing::debug;
use webtex_common::PhysicalSize;

use crate::errors::ImportError;
use crate::frame::ExternalFrame;
use crate::host::{ExternalHandle, TextureHost};

#[derive(Debug)]
struct LiveImport<T> {
    handle: ExternalHandle,
    texture: Arc<T>,
}

/// Holds the currently imported shared texture and enforces the
/// import-then-release order.
#[derive(Debug)]
pub struct ImportSlot<T> {
    live: Option<LiveImport<T>>,
}

impl<T> Default for ImportSlot<T> {
    fn default() -> Self {
        Self { live: None }
    }
}

impl<T> ImportSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Option<ExternalHandle> {
        self.live.as_ref().map(|l| l.handle)
    }

    pub fn texture(&self) -> Option<&Arc<T>> {
        self.live.as_ref().map(|l| &l.texture)
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_none()
    }

    /// Import `frame` and make it the live texture.
    ///
    /// The previous import is released only after the new one succeeds.
    /// On failure the previous import stays live and untouched.
    pub fn replace<H>(
        &mut self,
        host: &mut H,
        frame: &ExternalFrame,
        surface_size: PhysicalSize,
    ) -> Result<Arc<T>, ImportError>
    where
        H: TextureHost<Texture = T>,
    {
        if frame.size != surface_size {
            return Err(ImportError::SizeMismatch {
                expected: surface_size,
                actual: frame.size,
            });
        }

        // Re-announcing the handle that is already live needs no new import.
        if let Some(live) = &self.live {
            if live.handle == frame.handle {
                return Ok(live.texture.clone());
            }
        }

        let texture = Arc::new(host.import_external(frame.handle, frame.size)?);
        if let Some(old) = self.live.replace(LiveImport {
            handle: frame.handle,
            texture: texture.clone(),
        }) {
            host.release_external(old.handle);
            debug!(
                released = old.handle.0,
                imported = frame.handle.0,
                generation = frame.generation,
                "swapped external import"
            );
        }
        Ok(texture)
    }

    /// Release the live import, if any.
    pub fn release<H>(&mut self, host: &mut H)
    where
        H: TextureHost<Texture = T>,
    {
        if let Some(old) = self.live.take() {
            host.release_external(old.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, MemoryTexture};

    fn frame(handle: u64, generation: u64, size: PhysicalSize) -> ExternalFrame {
        ExternalFrame {
            handle: ExternalHandle(handle),
            generation,
            size,
        }
    }

    #[test]
    fn replace_releases_previous_after_import() {
        let mut host = MemoryHost::new();
        let mut slot: ImportSlot<MemoryTexture> = ImportSlot::new();
        let size = PhysicalSize::new(4, 4);

        slot.replace(&mut host, &frame(1, 1, size), size).unwrap();
        slot.replace(&mut host, &frame(2, 2, size), size).unwrap();

        assert_eq!(slot.handle(), Some(ExternalHandle(2)));
        assert!(!host.is_live(ExternalHandle(1)));
        assert_eq!(host.live_imports(), 1);
        assert_eq!(host.releases(), 1);
    }

    #[test]
    fn failed_import_keeps_previous_live() {
        let mut host = MemoryHost::new();
        let mut slot: ImportSlot<MemoryTexture> = ImportSlot::new();
        let size = PhysicalSize::new(4, 4);
        slot.replace(&mut host, &frame(1, 1, size), size).unwrap();

        host.reject_handle(ExternalHandle(2));
        assert!(slot.replace(&mut host, &frame(2, 2, size), size).is_err());
        assert_eq!(slot.handle(), Some(ExternalHandle(1)));
        assert!(host.is_live(ExternalHandle(1)));
        assert_eq!(host.releases(), 0);
    }

    #[test]
    fn size_mismatch_is_an_import_failure() {
        let mut host = MemoryHost::new();
        let mut slot: ImportSlot<MemoryTexture> = ImportSlot::new();
        let err = slot
            .replace(
                &mut host,
                &frame(1, 1, PhysicalSize::new(4, 4)),
                PhysicalSize::new(8, 8),
            )
            .unwrap_err();
        assert!(matches!(err, ImportError::SizeMismatch { .. }));
        assert_eq!(host.imports(), 0);
    }

    #[test]
    fn same_handle_is_not_imported_twice() {
        let mut host = MemoryHost::new();
        let mut slot: ImportSlot<MemoryTexture> = ImportSlot::new();
        let size = PhysicalSize::new(2, 2);
        let a = slot.replace(&mut host, &frame(7, 1, size), size).unwrap();
        let b = slot.replace(&mut host, &frame(7, 2, size), size).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(host.imports(), 1);
        assert_eq!(host.releases(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let mut host = MemoryHost::new();
        let mut slot: ImportSlot<MemoryTexture> = ImportSlot::new();
        let size = PhysicalSize::new(2, 2);
        slot.replace(&mut host, &frame(3, 1, size), size).unwrap();
        slot.release(&mut host);
        slot.release(&mut host);
        assert!(slot.is_empty());
        assert_eq!(host.releases(), 1);
        assert_eq!(host.double_releases(), 0);
    }
}
