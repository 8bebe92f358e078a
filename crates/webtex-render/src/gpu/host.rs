//! [`TextureHost`] over a wgpu device.

use std::sync::mpsc;

use tracing::debug;
use webtex_common::{Color, PhysicalSize, PixelRect};

use super::GpuContext;
use crate::errors::{ImportError, RendererError};
use crate::host::{pixel_offset, ExternalHandle, TextureHost, BYTES_PER_PIXEL};

pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

/// Platform interop that wraps an engine shared handle as a wgpu texture
/// (D3D12 shared handle, IOSurface, or Vulkan external memory).
pub trait NativeImporter: Send {
    fn import(
        &mut self,
        device: &wgpu::Device,
        handle: ExternalHandle,
        size: PhysicalSize,
    ) -> Result<wgpu::Texture, ImportError>;

    fn release(&mut self, handle: ExternalHandle);
}

/// Importer for builds without platform interop. Every import fails, so
/// accelerated surfaces fall back on their first frame.
#[derive(Debug, Default)]
pub struct UnsupportedImporter;

impl NativeImporter for UnsupportedImporter {
    fn import(
        &mut self,
        _device: &wgpu::Device,
        _handle: ExternalHandle,
        _size: PhysicalSize,
    ) -> Result<wgpu::Texture, ImportError> {
        Err(ImportError::Unsupported)
    }

    fn release(&mut self, _handle: ExternalHandle) {}
}

pub struct WgpuHost {
    context: GpuContext,
    importer: Box<dyn NativeImporter>,
}

impl WgpuHost {
    pub fn new(context: GpuContext) -> Self {
        Self::with_importer(context, Box::new(UnsupportedImporter))
    }

    pub fn with_importer(context: GpuContext, importer: Box<dyn NativeImporter>) -> Self {
        Self { context, importer }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    fn allocate(&self, size: PhysicalSize, label: &str) -> wgpu::Texture {
        self.context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Read a texture back to the CPU as RGBA.
    pub fn read_texture(&self, texture: &wgpu::Texture) -> Result<image::RgbaImage, RendererError> {
        let width = texture.width();
        let height = texture.height();
        let row_bytes = width * BYTES_PER_PIXEL;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row = row_bytes.div_ceil(align) * align;

        let buffer = self.context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("webtex readback"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("webtex readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            texture.size(),
        );
        self.context.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.context.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| RendererError::TextureError(format!("readback channel closed: {e}")))?
            .map_err(|e| RendererError::TextureError(format!("readback map failed: {e}")))?;

        let mut rgba = Vec::with_capacity((row_bytes * height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(padded_row as usize) {
                rgba.extend_from_slice(&row[..row_bytes as usize]);
            }
        }
        buffer.unmap();

        for px in rgba.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| RendererError::TextureError("readback size mismatch".into()))
    }
}

impl TextureHost for WgpuHost {
    type Texture = wgpu::Texture;

    fn placeholder(&mut self, color: Color) -> Result<wgpu::Texture, RendererError> {
        let size = PhysicalSize::new(1, 1);
        let texture = self.allocate(size, "webtex placeholder");
        self.write_region(&texture, &color.to_bgra(), BYTES_PER_PIXEL, PixelRect::full(size))?;
        Ok(texture)
    }

    fn create_texture(&mut self, size: PhysicalSize) -> Result<wgpu::Texture, RendererError> {
        let max = self.context.device.limits().max_texture_dimension_2d;
        if size.is_empty() || size.width > max || size.height > max {
            return Err(RendererError::TextureError(format!(
                "texture size {size} outside 1..={max}"
            )));
        }
        Ok(self.allocate(size, "webtex software frame"))
    }

    fn write_region(
        &mut self,
        texture: &wgpu::Texture,
        data: &[u8],
        stride: u32,
        rect: PixelRect,
    ) -> Result<(), RendererError> {
        if rect.is_empty() {
            return Ok(());
        }
        let start = pixel_offset(rect.x, rect.y, stride);
        let needed = (rect.height as usize - 1) * stride as usize
            + (rect.width * BYTES_PER_PIXEL) as usize;
        let region = data
            .get(start..)
            .filter(|r| r.len() >= needed)
            .ok_or_else(|| RendererError::TextureError("source buffer too short".into()))?;

        self.context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: rect.x,
                    y: rect.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            region,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(stride),
                rows_per_image: Some(rect.height),
            },
            wgpu::Extent3d {
                width: rect.width,
                height: rect.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn import_external(
        &mut self,
        handle: ExternalHandle,
        size: PhysicalSize,
    ) -> Result<wgpu::Texture, ImportError> {
        let texture = self.importer.import(&self.context.device, handle, size)?;
        let actual = PhysicalSize::new(texture.width(), texture.height());
        if actual != size {
            self.importer.release(handle);
            return Err(ImportError::SizeMismatch {
                expected: size,
                actual,
            });
        }
        debug!(handle = handle.0, %size, "imported shared texture");
        Ok(texture)
    }

    fn release_external(&mut self, handle: ExternalHandle) {
        self.importer.release(handle);
    }
}
