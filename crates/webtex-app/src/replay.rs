//! `webtex replay`: drive one surface with synthetic software frames.
//!
//! Frame 0 paints the whole surface. Every later frame moves a small block
//! along the diagonal and reports only that block as damaged, so the
//! uploader's partial-copy path does the work.

use std::path::Path;

use serde::Serialize;
use tracing::info;
use webtex_common::{FallbackReason, PhysicalSize, PixelRect, RenderMode, SurfaceId, WebtexError};
use webtex_config::schema::SurfaceConfig;
use webtex_config::WebtexConfig;
use webtex_render::{
    CapabilityEnv, GpuBackend, GpuContext, MemoryHost, TextureHost, WgpuHost, BYTES_PER_PIXEL,
};
use webtex_surface::SurfaceRegistry;

use crate::cli::ReplayArgs;

#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub surface: SurfaceId,
    pub size: PhysicalSize,
    pub backend: GpuBackend,
    pub mode: RenderMode,
    pub fallback: Option<FallbackReason>,
    pub submitted: u32,
    pub presented: u32,
    pub dropped: u32,
    pub generation: u64,
}

/// Software canvas in the engine's BGRA layout.
struct Canvas {
    size: PhysicalSize,
    stride: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(size: PhysicalSize) -> Self {
        let stride = size.width * BYTES_PER_PIXEL;
        let mut canvas = Self {
            size,
            stride,
            pixels: vec![0; stride as usize * size.height as usize],
        };
        for y in 0..size.height {
            let shade = (y * 255 / size.height.max(1)) as u8;
            canvas.fill(PixelRect::new(0, y, size.width, 1), [shade, 0x40, 0x20, 0xff]);
        }
        canvas
    }

    fn fill(&mut self, rect: PixelRect, bgra: [u8; 4]) {
        for y in rect.y..rect.y + rect.height {
            let row = (y * self.stride) as usize;
            for x in rect.x..rect.x + rect.width {
                let at = row + (x * BYTES_PER_PIXEL) as usize;
                self.pixels[at..at + 4].copy_from_slice(&bgra);
            }
        }
    }

    /// The block damaged by frame `index` (1-based).
    fn block(&self, index: u32) -> PixelRect {
        let w = (self.size.width / 8).max(1);
        let h = (self.size.height / 8).max(1);
        let span_x = self.size.width - w + 1;
        let span_y = self.size.height - h + 1;
        let step = index * w.min(h);
        PixelRect::new(step % span_x, step % span_y, w, h)
    }
}

fn submit_error(e: impl std::fmt::Display) -> WebtexError {
    WebtexError::Surface(format!("frame rejected: {e}"))
}

/// Create a surface on `registry` and push `args.frames + 1` frames
/// through it, pumping after each one.
pub fn drive<H: TextureHost>(
    registry: &mut SurfaceRegistry<H>,
    base: &SurfaceConfig,
    args: &ReplayArgs,
) -> Result<ReplaySummary, WebtexError> {
    let config = SurfaceConfig {
        width: args.width,
        height: args.height,
        ..base.clone()
    };
    let (id, port) = registry.create_with(config)?;
    let size = PhysicalSize::new(args.width, args.height);
    let mut canvas = Canvas::new(size);

    let mut summary = ReplaySummary {
        surface: id,
        size,
        backend: registry.capability_env().backend,
        mode: RenderMode::Software,
        fallback: None,
        submitted: 0,
        presented: 0,
        dropped: 0,
        generation: 0,
    };

    for index in 0..=args.frames {
        let dirty = if index == 0 {
            PixelRect::full(size)
        } else {
            let block = canvas.block(index);
            let tint = (index * 37 % 256) as u8;
            canvas.fill(block, [0xff, tint, 0xff - tint, 0xff]);
            block
        };
        port.submit_pixels(canvas.pixels.clone(), canvas.stride, size, vec![dirty])
            .map_err(submit_error)?;
        summary.submitted += 1;

        let report = registry.pump(id)?;
        if let Some(generation) = report.presented {
            summary.presented += 1;
            summary.generation = generation;
        }
        summary.dropped += report.dropped;
    }

    if let Some(surface) = registry.get(id) {
        summary.mode = surface.current_mode();
        summary.fallback = surface.fallback_reason();
    }
    info!(
        surface = %id,
        submitted = summary.submitted,
        presented = summary.presented,
        generation = summary.generation,
        "replay finished"
    );
    Ok(summary)
}

fn save(image: &image::RgbaImage, path: &Path) -> Result<(), WebtexError> {
    image
        .save(path)
        .map_err(|e| WebtexError::Other(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), "snapshot written");
    Ok(())
}

fn snapshot_error(id: SurfaceId) -> WebtexError {
    WebtexError::Surface(format!("{id} has no frame to snapshot"))
}

pub fn run(args: &ReplayArgs, config: &WebtexConfig) -> Result<ReplaySummary, WebtexError> {
    if args.gpu {
        let context = pollster::block_on(GpuContext::new_headless())?;
        let env = CapabilityEnv::current(context.backend());
        let mut registry = SurfaceRegistry::new(WgpuHost::new(context), env, config);
        let summary = drive(&mut registry, &config.surface, args)?;
        if let Some(path) = &args.snapshot {
            let texture = registry
                .current_texture(summary.surface)
                .ok_or_else(|| snapshot_error(summary.surface))?;
            save(&registry.host().read_texture(&texture)?, path)?;
        }
        registry.destroy_all();
        Ok(summary)
    } else {
        let env = CapabilityEnv::current(GpuBackend::Empty);
        let mut registry = SurfaceRegistry::new(MemoryHost::new(), env, config);
        let summary = drive(&mut registry, &config.surface, args)?;
        if let Some(path) = &args.snapshot {
            let texture = registry
                .current_texture(summary.surface)
                .ok_or_else(|| snapshot_error(summary.surface))?;
            save(&texture.to_image(), path)?;
        }
        registry.destroy_all();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(frames: u32) -> ReplayArgs {
        ReplayArgs {
            width: 64,
            height: 32,
            frames,
            snapshot: None,
            gpu: false,
        }
    }

    #[test]
    fn every_frame_is_presented_in_order() {
        let summary = run(&args(5), &WebtexConfig::default()).unwrap();
        assert_eq!(summary.submitted, 6);
        assert_eq!(summary.presented, 6);
        assert_eq!(summary.generation, 6);
        assert_eq!(summary.mode, RenderMode::Software);
        assert_eq!(summary.fallback, Some(FallbackReason::BackendUnsupported));
    }

    #[test]
    fn later_frames_upload_only_the_block() {
        let config = WebtexConfig::default();
        let env = CapabilityEnv::current(GpuBackend::Empty);
        let mut registry = SurfaceRegistry::new(MemoryHost::new(), env, &config);
        drive(&mut registry, &config.surface, &args(3)).unwrap();

        let writes = registry.host().writes();
        assert_eq!(writes[0], PixelRect::full(PhysicalSize::new(64, 32)));
        assert!(writes[1..].iter().all(|r| r.width == 8 && r.height == 4));
    }

    #[test]
    fn blocks_stay_inside_the_canvas() {
        let canvas = Canvas::new(PhysicalSize::new(17, 9));
        for i in 1..50 {
            assert!(canvas.block(i).fits_within(canvas.size));
        }
    }

    #[test]
    fn snapshot_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut a = args(2);
        a.snapshot = Some(path.clone());
        run(&a, &WebtexConfig::default()).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (64, 32));
    }
}
