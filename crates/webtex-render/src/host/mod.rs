//! Texture hosts: the seam between the bridge and a concrete GPU device.

mod memory;

pub use memory::*;

use crate::errors::{ImportError, RendererError};
use webtex_common::{Color, PhysicalSize, PixelRect};

/// Every texture the bridge creates or receives is 4-byte BGRA.
pub const BYTES_PER_PIXEL: u32 = 4;

/// Opaque shared-texture handle produced by the engine process
/// (DXGI shared handle, IOSurface id, or exported memory fd).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalHandle(pub u64);

/// GPU operations the render bridge needs from the host application.
///
/// All methods run on the host's render timeline.
pub trait TextureHost {
    type Texture: Send + Sync + 'static;

    /// A 1x1 texture filled with `color`, shown before the first frame.
    fn placeholder(&mut self, color: Color) -> Result<Self::Texture, RendererError>;

    /// A writable, sampleable BGRA texture.
    fn create_texture(&mut self, size: PhysicalSize) -> Result<Self::Texture, RendererError>;

    /// Copy `rect` of a packed frame buffer into the same rect of `texture`.
    ///
    /// `data` holds the whole frame, `stride` bytes per row.
    fn write_region(
        &mut self,
        texture: &Self::Texture,
        data: &[u8],
        stride: u32,
        rect: PixelRect,
    ) -> Result<(), RendererError>;

    /// Open an engine-owned shared texture as a read-only sampled texture.
    fn import_external(
        &mut self,
        handle: ExternalHandle,
        size: PhysicalSize,
    ) -> Result<Self::Texture, ImportError>;

    /// Give back everything `import_external` acquired for `handle`.
    /// Called exactly once per successful import.
    fn release_external(&mut self, handle: ExternalHandle);
}

/// Byte offset of pixel (`x`, `y`) in a buffer with the given stride.
pub fn pixel_offset(x: u32, y: u32, stride: u32) -> usize {
    y as usize * stride as usize + x as usize * BYTES_PER_PIXEL as usize
}
