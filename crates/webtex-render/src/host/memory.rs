//! CPU texture host.
//!
//! Keeps BGRA pixels in memory and tracks every external import so
//! callers can check that imports are never leaked or released twice.
//! Used by the headless `replay` command and throughout the tests.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;
use webtex_common::{Color, PhysicalSize, PixelRect};

use super::{pixel_offset, ExternalHandle, TextureHost, BYTES_PER_PIXEL};
use crate::errors::{ImportError, RendererError};

#[derive(Debug)]
pub struct MemoryTexture {
    id: u64,
    size: PhysicalSize,
    imported_from: Option<ExternalHandle>,
    pixels: Mutex<Vec<u8>>,
}

impl MemoryTexture {
    fn filled(id: u64, size: PhysicalSize, bgra: [u8; 4]) -> Self {
        let count = size.width as usize * size.height as usize;
        Self {
            id,
            size,
            imported_from: None,
            pixels: Mutex::new(bgra.repeat(count)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    pub fn imported_from(&self) -> Option<ExternalHandle> {
        self.imported_from
    }

    /// BGRA bytes at (`x`, `y`), or `None` outside the texture.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let pixels = self.pixels.lock().ok()?;
        let at = pixel_offset(x, y, self.size.packed_stride());
        let mut out = [0u8; 4];
        out.copy_from_slice(&pixels[at..at + 4]);
        Some(out)
    }

    /// Copy of the texture as an RGBA image.
    pub fn to_image(&self) -> image::RgbaImage {
        let mut rgba = self
            .pixels
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default();
        for px in rgba.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        image::RgbaImage::from_raw(self.size.width, self.size.height, rgba)
            .unwrap_or_else(|| image::RgbaImage::new(self.size.width, self.size.height))
    }
}

/// In-memory [`TextureHost`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    live_imports: HashSet<ExternalHandle>,
    rejected_handles: HashSet<ExternalHandle>,
    context_lost: bool,
    imports: u64,
    releases: u64,
    double_releases: u64,
    writes: Vec<PixelRect>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later import of `handle` fail with `InvalidHandle`.
    pub fn reject_handle(&mut self, handle: ExternalHandle) {
        self.rejected_handles.insert(handle);
    }

    /// Make every later import fail with `ContextLost`.
    pub fn lose_context(&mut self) {
        self.context_lost = true;
    }

    pub fn imports(&self) -> u64 {
        self.imports
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    pub fn double_releases(&self) -> u64 {
        self.double_releases
    }

    pub fn live_imports(&self) -> usize {
        self.live_imports.len()
    }

    pub fn is_live(&self, handle: ExternalHandle) -> bool {
        self.live_imports.contains(&handle)
    }

    /// Every region written so far, in order.
    pub fn writes(&self) -> &[PixelRect] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Fill color an imported handle shows, so tests can tell imports apart.
pub fn handle_color(handle: ExternalHandle) -> [u8; 4] {
    let b = handle.0.to_le_bytes();
    [b[0], b[1], b[2], 0xff]
}

impl TextureHost for MemoryHost {
    type Texture = MemoryTexture;

    fn placeholder(&mut self, color: Color) -> Result<MemoryTexture, RendererError> {
        let id = self.allocate_id();
        Ok(MemoryTexture::filled(id, PhysicalSize::new(1, 1), color.to_bgra()))
    }

    fn create_texture(&mut self, size: PhysicalSize) -> Result<MemoryTexture, RendererError> {
        if size.is_empty() {
            return Err(RendererError::TextureError(format!("empty texture size {size}")));
        }
        let id = self.allocate_id();
        Ok(MemoryTexture::filled(id, size, [0, 0, 0, 0]))
    }

    fn write_region(
        &mut self,
        texture: &MemoryTexture,
        data: &[u8],
        stride: u32,
        rect: PixelRect,
    ) -> Result<(), RendererError> {
        if !rect.fits_within(texture.size) {
            return Err(RendererError::TextureError(format!(
                "region {}x{} at {},{} exceeds texture {}",
                rect.width, rect.height, rect.x, rect.y, texture.size
            )));
        }
        let row_bytes = (rect.width * BYTES_PER_PIXEL) as usize;
        let dst_stride = texture.size.packed_stride();
        let mut pixels = texture
            .pixels
            .lock()
            .map_err(|_| RendererError::TextureError("texture lock poisoned".into()))?;

        for row in 0..rect.height {
            let src = pixel_offset(rect.x, rect.y + row, stride);
            let dst = pixel_offset(rect.x, rect.y + row, dst_stride);
            let line = data.get(src..src + row_bytes).ok_or_else(|| {
                RendererError::TextureError(format!("source buffer too short at row {row}"))
            })?;
            pixels[dst..dst + row_bytes].copy_from_slice(line);
        }
        self.writes.push(rect);
        Ok(())
    }

    fn import_external(
        &mut self,
        handle: ExternalHandle,
        size: PhysicalSize,
    ) -> Result<MemoryTexture, ImportError> {
        if self.context_lost {
            return Err(ImportError::ContextLost);
        }
        if handle.0 == 0 || self.rejected_handles.contains(&handle) {
            return Err(ImportError::InvalidHandle(handle.0));
        }
        let id = self.allocate_id();
        let mut texture = MemoryTexture::filled(id, size, handle_color(handle));
        texture.imported_from = Some(handle);
        self.live_imports.insert(handle);
        self.imports += 1;
        debug!(handle = handle.0, %size, "imported external texture");
        Ok(texture)
    }

    fn release_external(&mut self, handle: ExternalHandle) {
        if self.live_imports.remove(&handle) {
            self.releases += 1;
        } else {
            self.double_releases += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_region_copies_only_rect() {
        let mut host = MemoryHost::new();
        let size = PhysicalSize::new(4, 4);
        let tex = host.create_texture(size).unwrap();
        let frame = [9u8, 8, 7, 255].repeat(16);
        host.write_region(&tex, &frame, size.packed_stride(), PixelRect::new(1, 1, 2, 2))
            .unwrap();
        assert_eq!(tex.pixel(1, 1), Some([9, 8, 7, 255]));
        assert_eq!(tex.pixel(2, 2), Some([9, 8, 7, 255]));
        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(tex.pixel(3, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn write_region_honours_padded_stride() {
        let mut host = MemoryHost::new();
        let size = PhysicalSize::new(2, 2);
        let tex = host.create_texture(size).unwrap();
        // 2 pixels + 1 pixel of padding per row
        let mut frame = vec![0u8; 12 * 2];
        frame[12..16].copy_from_slice(&[1, 2, 3, 4]);
        host.write_region(&tex, &frame, 12, PixelRect::full(size)).unwrap();
        assert_eq!(tex.pixel(0, 1), Some([1, 2, 3, 4]));
    }

    #[test]
    fn write_region_rejects_out_of_bounds() {
        let mut host = MemoryHost::new();
        let tex = host.create_texture(PhysicalSize::new(2, 2)).unwrap();
        let frame = vec![0u8; 16];
        assert!(host
            .write_region(&tex, &frame, 8, PixelRect::new(1, 1, 2, 1))
            .is_err());
    }

    #[test]
    fn import_and_release_are_counted() {
        let mut host = MemoryHost::new();
        let h = ExternalHandle(0x42);
        let tex = host.import_external(h, PhysicalSize::new(2, 2)).unwrap();
        assert_eq!(tex.imported_from(), Some(h));
        assert_eq!(tex.pixel(0, 0), Some(handle_color(h)));
        assert!(host.is_live(h));
        host.release_external(h);
        host.release_external(h);
        assert_eq!(host.imports(), 1);
        assert_eq!(host.releases(), 1);
        assert_eq!(host.double_releases(), 1);
        assert_eq!(host.live_imports(), 0);
    }

    #[test]
    fn null_and_rejected_handles_fail() {
        let mut host = MemoryHost::new();
        let size = PhysicalSize::new(1, 1);
        assert_eq!(
            host.import_external(ExternalHandle(0), size).unwrap_err(),
            ImportError::InvalidHandle(0)
        );
        host.reject_handle(ExternalHandle(5));
        assert!(host.import_external(ExternalHandle(5), size).is_err());
        host.lose_context();
        assert_eq!(
            host.import_external(ExternalHandle(6), size).unwrap_err(),
            ImportError::ContextLost
        );
        assert_eq!(host.live_imports(), 0);
    }

    #[test]
    fn to_image_swaps_to_rgba() {
        let mut host = MemoryHost::new();
        let tex = host.placeholder(Color::from_rgba(10, 20, 30, 255)).unwrap();
        let img = tex.to_image();
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
