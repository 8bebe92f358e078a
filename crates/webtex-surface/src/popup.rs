//! Engine popups such as `<select>` dropdowns.
//!
//! The engine paints popups apart from the view. The layer keeps where the
//! popup sits and its latest bitmap so the host can draw it over the view
//! texture.

use serde::{Deserialize, Serialize};
use webtex_common::{PhysicalSize, PixelRect};

/// Latest popup bitmap, tightly packed BGRA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupFrame {
    pub buffer: Vec<u8>,
    pub size: PhysicalSize,
}

/// Popup placement in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupPlacement {
    pub visible: bool,
    pub rect: Option<PixelRect>,
}

#[derive(Debug, Default)]
pub struct PopupLayer {
    visible: bool,
    rect: Option<PixelRect>,
    frame: Option<PopupFrame>,
}

impl PopupLayer {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rect(&self) -> Option<PixelRect> {
        self.rect
    }

    /// Bitmap to draw, only while the popup is shown.
    pub fn frame(&self) -> Option<&PopupFrame> {
        self.frame.as_ref().filter(|_| self.visible)
    }

    pub fn placement(&self) -> PopupPlacement {
        PopupPlacement {
            visible: self.visible,
            rect: self.rect,
        }
    }

    /// Show or hide. Hiding forgets the placement and bitmap. Returns
    /// whether anything changed.
    pub(crate) fn show(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        if !visible {
            self.clear();
        }
        true
    }

    /// Returns whether the placement changed.
    pub(crate) fn place(&mut self, rect: PixelRect) -> bool {
        if self.rect == Some(rect) {
            return false;
        }
        self.rect = Some(rect);
        true
    }

    /// Keep `frame` as the bitmap. Refused while hidden.
    pub(crate) fn paint(&mut self, frame: PopupFrame) -> bool {
        if !self.visible {
            return false;
        }
        self.frame = Some(frame);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.rect = None;
        self.frame = None;
    }
}

/// Engine view rectangle to host pixels.
pub fn to_host_rect(rect: PixelRect, device_scale_factor: f32) -> PixelRect {
    if device_scale_factor <= 0.0 || !device_scale_factor.is_finite() {
        return rect;
    }
    let scale = |v: u32| (v as f32 * device_scale_factor).round() as u32;
    PixelRect::new(
        scale(rect.x),
        scale(rect.y),
        scale(rect.width),
        scale(rect.height),
    )
}
