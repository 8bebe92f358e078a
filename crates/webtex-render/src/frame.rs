//! Frame ingress: latest-only mailboxes between the engine and the host.
//!
//! The engine side holds a [`FrameSender`]; the host side drains the
//! shared [`FrameMailbox`] once per pump. Submissions never block, and a
//! pending frame that has not been picked up is simply replaced.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;
use webtex_common::{PhysicalSize, PixelRect};

use crate::errors::SubmitRejection;
use crate::host::{ExternalHandle, BYTES_PER_PIXEL};

/// A shared-texture frame announced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFrame {
    pub handle: ExternalHandle,
    pub generation: u64,
    pub size: PhysicalSize,
}

/// A raw BGRA8 frame painted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    pub generation: u64,
    pub buffer: Vec<u8>,
    pub stride: u32,
    pub size: PhysicalSize,
    /// Regions that changed since the previous frame. May be empty.
    pub dirty: Vec<PixelRect>,
}

impl PixelFrame {
    /// Whether this frame replaces the whole surface.
    pub fn is_full(&self) -> bool {
        self.dirty.len() == 1 && self.dirty[0].covers(self.size)
    }
}

#[derive(Debug)]
pub struct FrameMailbox {
    external: Mutex<Option<ExternalFrame>>,
    pixels: Mutex<Option<PixelFrame>>,
    last_generation: AtomicU64,
    accelerated: AtomicBool,
    closed: AtomicBool,
    dirty_cap: usize,
}

impl FrameMailbox {
    pub fn new(accelerated: bool, dirty_cap: usize) -> Arc<Self> {
        Arc::new(Self {
            external: Mutex::new(None),
            pixels: Mutex::new(None),
            last_generation: AtomicU64::new(0),
            accelerated: AtomicBool::new(accelerated),
            closed: AtomicBool::new(false),
            dirty_cap: dirty_cap.max(1),
        })
    }

    pub fn take_external(&self) -> Option<ExternalFrame> {
        self.external.lock().ok().and_then(|mut slot| slot.take())
    }

    pub fn take_pixels(&self) -> Option<PixelFrame> {
        self.pixels.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Highest generation accepted so far (0 before the first frame).
    pub fn last_generation(&self) -> u64 {
        self.last_generation.load(Ordering::Acquire)
    }

    /// Stop accepting shared-texture frames and drop any pending one.
    pub fn disable_acceleration(&self) {
        self.accelerated.store(false, Ordering::Release);
        self.take_external();
    }

    pub fn is_accelerated(&self) -> bool {
        self.accelerated.load(Ordering::Acquire)
    }

    /// Refuse all further submissions and drop anything pending.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.take_external();
        self.take_pixels();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn has_pending(&self) -> bool {
        let external = self.external.lock().map(|s| s.is_some()).unwrap_or(false);
        let pixels = self.pixels.lock().map(|s| s.is_some()).unwrap_or(false);
        external || pixels
    }
}

/// Engine-side frame ingress for one surface. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FrameSender {
    mailbox: Arc<FrameMailbox>,
}

impl FrameSender {
    pub fn new(mailbox: Arc<FrameMailbox>) -> Self {
        Self { mailbox }
    }

    /// Announce a shared texture. `generation` must exceed every
    /// generation accepted before on this surface.
    ///
    /// Pixel frames draw from the same sequence, so after any
    /// [`submit_pixels`](Self::submit_pixels) the next shared texture has to
    /// be numbered past [`last_generation`](Self::last_generation).
    pub fn submit_external_frame(
        &self,
        handle: ExternalHandle,
        generation: u64,
        size: PhysicalSize,
    ) -> Result<u64, SubmitRejection> {
        if self.mailbox.is_closed() {
            return Err(SubmitRejection::Closed);
        }
        if !self.mailbox.is_accelerated() {
            return Err(SubmitRejection::NotAccelerated);
        }
        if size.is_empty() {
            return Err(SubmitRejection::InvalidSize(format!("empty frame {size}")));
        }

        let mut slot = self
            .mailbox
            .external
            .lock()
            .map_err(|_| SubmitRejection::Closed)?;

        let stamp = self.mailbox.last_generation.fetch_update(
            Ordering::AcqRel,
            Ordering::Acquire,
            |last| (generation > last).then_some(generation),
        );
        if let Err(last) = stamp {
            debug!(generation, last, "discarding stale external frame");
            return Err(SubmitRejection::OutOfOrder { generation, last });
        }

        if let Some(replaced) = slot.replace(ExternalFrame {
            handle,
            generation,
            size,
        }) {
            debug!(
                replaced = replaced.generation,
                generation, "external frame superseded before pickup"
            );
        }
        Ok(generation)
    }

    /// Hand over a raw BGRA8 frame. Returns the generation it was stamped
    /// with.
    pub fn submit_pixels(
        &self,
        buffer: Vec<u8>,
        stride: u32,
        size: PhysicalSize,
        dirty: Vec<PixelRect>,
    ) -> Result<u64, SubmitRejection> {
        if self.mailbox.is_closed() {
            return Err(SubmitRejection::Closed);
        }
        validate_pixels(&buffer, stride, size, &dirty)?;

        let mut slot = self
            .mailbox
            .pixels
            .lock()
            .map_err(|_| SubmitRejection::Closed)?;

        let generation = self.mailbox.last_generation.fetch_add(1, Ordering::AcqRel) + 1;
        let mut frame = PixelFrame {
            generation,
            buffer,
            stride,
            size,
            dirty: dirty.into_iter().filter(|r| !r.is_empty()).collect(),
        };

        if let Some(pending) = slot.take() {
            frame.dirty = coalesce(pending, &frame, self.mailbox.dirty_cap);
        } else if frame.dirty.len() > self.mailbox.dirty_cap {
            frame.dirty = vec![PixelRect::full(size)];
        }
        *slot = Some(frame);
        Ok(generation)
    }

    /// Whether the host has frames it has not picked up yet.
    pub fn has_pending(&self) -> bool {
        self.mailbox.has_pending()
    }

    /// Highest generation accepted so far, from either kind of frame.
    pub fn last_generation(&self) -> u64 {
        self.mailbox.last_generation()
    }

    pub fn is_accelerated(&self) -> bool {
        self.mailbox.is_accelerated()
    }
}

fn validate_pixels(
    buffer: &[u8],
    stride: u32,
    size: PhysicalSize,
    dirty: &[PixelRect],
) -> Result<(), SubmitRejection> {
    if size.is_empty() {
        return Err(SubmitRejection::InvalidSize(format!("empty frame {size}")));
    }
    let row_bytes = size.width as u64 * BYTES_PER_PIXEL as u64;
    if (stride as u64) < row_bytes {
        return Err(SubmitRejection::InvalidSize(format!(
            "stride {stride} is shorter than a {}-pixel row",
            size.width
        )));
    }
    if stride % BYTES_PER_PIXEL != 0 {
        return Err(SubmitRejection::InvalidSize(format!(
            "stride {stride} is not a whole number of pixels"
        )));
    }
    let expected_len = stride as u64 * size.height as u64;
    if buffer.len() as u64 != expected_len {
        return Err(SubmitRejection::SizeMismatch {
            expected_len: expected_len as usize,
            actual_len: buffer.len(),
        });
    }
    if let Some(r) = dirty.iter().find(|r| !r.fits_within(size)) {
        return Err(SubmitRejection::DirtyRectOutOfBounds {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        });
    }
    Ok(())
}

/// Merge the damage of a superseded frame into its replacement.
///
/// A size change means the next upload is a full copy, so the old damage
/// no longer matters.
fn coalesce(pending: PixelFrame, next: &PixelFrame, cap: usize) -> Vec<PixelRect> {
    if pending.size != next.size {
        return vec![PixelRect::full(next.size)];
    }
    let mut merged: Vec<PixelRect> = Vec::with_capacity(pending.dirty.len() + next.dirty.len());
    for rect in pending.dirty.into_iter().chain(next.dirty.iter().copied()) {
        if merged.iter().any(|m| m.contains_rect(&rect)) {
            continue;
        }
        merged.retain(|m| !rect.contains_rect(m));
        merged.push(rect);
    }
    if merged.len() > cap {
        vec![PixelRect::full(next.size)]
    } else {
        merged
    }
}
