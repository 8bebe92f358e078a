//! Per-surface render bridge: picks the authoritative frame path and
//! feeds the presentation controller.

use std::sync::Arc;

use tracing::{debug, info, warn};
use webtex_common::{Color, FallbackReason, PhysicalSize, RenderMode, SurfaceId};
use webtex_config::schema::RenderConfig;

use crate::capability::Resolution;
use crate::errors::RendererError;
use crate::frame::{ExternalFrame, FrameMailbox, FrameSender, PixelFrame};
use crate::host::TextureHost;
use crate::import::ImportSlot;
use crate::presentation::{FrameOrigin, PresentationController, PresentedFrame};
use crate::software::SoftwareUploader;

/// What one [`RenderBridge::process`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Generation published by this call, if any.
    pub presented: Option<u64>,
    /// Set when this call downgraded the surface to software.
    pub downgraded: Option<FallbackReason>,
    /// Frames picked up but not published.
    pub dropped: u32,
}

#[derive(Debug)]
pub struct RenderBridge<T> {
    surface: SurfaceId,
    resolution: Resolution,
    mode: RenderMode,
    fallback_reason: Option<FallbackReason>,
    size: PhysicalSize,
    mailbox: Arc<FrameMailbox>,
    imports: ImportSlot<T>,
    software: SoftwareUploader<T>,
    presentation: PresentationController<T>,
}

impl<T: Send + Sync + 'static> RenderBridge<T> {
    /// Build the bridge for a new surface and the engine-side sender that
    /// feeds it.
    pub fn new<H>(
        host: &mut H,
        surface: SurfaceId,
        resolution: Resolution,
        size: PhysicalSize,
        config: &RenderConfig,
        background: Color,
    ) -> Result<(Self, FrameSender), RendererError>
    where
        H: TextureHost<Texture = T>,
    {
        let mailbox = FrameMailbox::new(
            resolution.mode == RenderMode::Accelerated,
            config.coalesce_dirty_rects as usize,
        );
        let placeholder = host.placeholder(background)?;

        info!(
            %surface,
            mode = %resolution.mode,
            reason = ?resolution.reason,
            %size,
            "render bridge created"
        );

        let bridge = Self {
            surface,
            resolution,
            mode: resolution.mode,
            fallback_reason: resolution.reason,
            size,
            mailbox: mailbox.clone(),
            imports: ImportSlot::new(),
            software: SoftwareUploader::new(),
            presentation: PresentationController::new(placeholder),
        };
        Ok((bridge, FrameSender::new(mailbox)))
    }

    /// Drain both mailboxes and publish whatever is newest.
    pub fn process<H>(&mut self, host: &mut H) -> FrameReport
    where
        H: TextureHost<Texture = T>,
    {
        let mut report = FrameReport::default();

        if self.mode == RenderMode::Accelerated {
            if let Some(frame) = self.mailbox.take_external() {
                self.present_external(host, frame, &mut report);
            }
        }

        if let Some(frame) = self.mailbox.take_pixels() {
            self.present_pixels(host, frame, &mut report);
        }

        report
    }

    fn present_external<H>(&mut self, host: &mut H, frame: ExternalFrame, report: &mut FrameReport)
    where
        H: TextureHost<Texture = T>,
    {
        match self.imports.replace(host, &frame, self.size) {
            Ok(texture) => {
                let published = self.presentation.publish(PresentedFrame {
                    generation: frame.generation,
                    size: frame.size,
                    origin: FrameOrigin::Accelerated,
                    texture,
                });
                if published {
                    report.presented = Some(frame.generation);
                } else {
                    report.dropped += 1;
                }
            }
            Err(e) => {
                warn!(
                    surface = %self.surface,
                    handle = frame.handle.0,
                    generation = frame.generation,
                    error = %e,
                    "shared texture import failed"
                );
                report.dropped += 1;
                if self.downgrade(FallbackReason::ImportFailed) {
                    report.downgraded = Some(FallbackReason::ImportFailed);
                }
            }
        }
    }

    fn present_pixels<H>(&mut self, host: &mut H, frame: PixelFrame, report: &mut FrameReport)
    where
        H: TextureHost<Texture = T>,
    {
        let texture = match self.software.upload(host, &frame) {
            Ok(texture) => texture,
            Err(e) => {
                warn!(surface = %self.surface, generation = frame.generation, error = %e, "software upload failed");
                self.software.invalidate();
                report.dropped += 1;
                return;
            }
        };

        let published = self.presentation.publish(PresentedFrame {
            generation: frame.generation,
            size: frame.size,
            origin: FrameOrigin::Software,
            texture,
        });
        if !published {
            report.dropped += 1;
            return;
        }
        report.presented = Some(frame.generation);

        // The last accelerated frame is no longer on screen.
        if self.mode == RenderMode::Software && !self.imports.is_empty() {
            self.imports.release(host);
            debug!(surface = %self.surface, "released last shared texture after fallback");
        }
    }

    /// Switch to the software path for the rest of this surface's life.
    ///
    /// Returns `false` if the surface was already in software mode.
    pub fn downgrade(&mut self, reason: FallbackReason) -> bool {
        if self.mode == RenderMode::Software {
            return false;
        }
        self.mode = RenderMode::Software;
        self.fallback_reason = Some(reason);
        self.mailbox.disable_acceleration();
        warn!(surface = %self.surface, %reason, "falling back to software rendering");
        true
    }

    /// New logical size. Pending shared frames were rendered for the old
    /// size and are dropped; the next software frame is a full copy.
    pub fn resize(&mut self, size: PhysicalSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.software.invalidate();
        if self.mailbox.take_external().is_some() {
            debug!(surface = %self.surface, %size, "dropped pending shared frame on resize");
        }
    }

    /// Stop accepting frames and release every GPU resource held.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: TextureHost<Texture = T>,
    {
        self.mailbox.close();
        self.imports.release(host);
        self.software.clear();
    }

    pub fn current_texture(&self) -> Arc<T> {
        self.presentation.current_texture()
    }

    pub fn current_frame(&self) -> &PresentedFrame<T> {
        self.presentation.current()
    }

    pub fn current_mode(&self) -> RenderMode {
        self.mode
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        self.fallback_reason
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// Another engine-side sender for the same mailbox.
    pub fn sender(&self) -> FrameSender {
        FrameSender::new(self.mailbox.clone())
    }

    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }
}

#[cfg(test)]
mod tests;
