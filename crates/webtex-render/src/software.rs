//! Software fallback: raw pixel frames uploaded into a host-owned texture.

use std::sync::Arc;

use tracing::debug;
use webtex_common::{PhysicalSize, PixelRect};

use crate::errors::RendererError;
use crate::frame::PixelFrame;
use crate::host::TextureHost;

#[derive(Debug)]
pub struct SoftwareUploader<T> {
    texture: Option<Arc<T>>,
    size: Option<PhysicalSize>,
    needs_full: bool,
}

impl<T> Default for SoftwareUploader<T> {
    fn default() -> Self {
        Self {
            texture: None,
            size: None,
            needs_full: true,
        }
    }
}

impl<T> SoftwareUploader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next upload to copy the whole frame.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn texture(&self) -> Option<&Arc<T>> {
        self.texture.as_ref()
    }

    /// Drop the host texture.
    pub fn clear(&mut self) {
        self.texture = None;
        self.size = None;
        self.needs_full = true;
    }

    /// Copy `frame` into the host texture and return it.
    ///
    /// The first frame, a size change, or an invalidation recreates the
    /// texture with a full copy. Otherwise only the dirty regions are
    /// written in place.
    pub fn upload<H>(&mut self, host: &mut H, frame: &PixelFrame) -> Result<Arc<T>, RendererError>
    where
        H: TextureHost<Texture = T>,
    {
        let reusable = match (&self.texture, self.size) {
            (Some(texture), Some(size)) if size == frame.size && !self.needs_full => {
                Some(texture.clone())
            }
            _ => None,
        };

        let Some(texture) = reusable else {
            let texture = Arc::new(host.create_texture(frame.size)?);
            host.write_region(&texture, &frame.buffer, frame.stride, PixelRect::full(frame.size))?;
            debug!(size = %frame.size, generation = frame.generation, "software texture (re)created");
            self.texture = Some(texture.clone());
            self.size = Some(frame.size);
            self.needs_full = false;
            return Ok(texture);
        };

        for rect in &frame.dirty {
            host.write_region(&texture, &frame.buffer, frame.stride, *rect)?;
        }
        Ok(texture)
    }
}
