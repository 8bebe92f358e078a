//! Pixel-space geometry shared by the frame and input paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Tightly packed BGRA8 row length in bytes.
    pub fn packed_stride(&self) -> u32 {
        self.width * 4
    }

    /// Scale a logical size by a device scale factor, rounding to whole pixels.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: ((self.width as f32) * factor).round().max(1.0) as u32,
            height: ((self.height as f32) * factor).round().max(1.0) as u32,
        }
    }
}

impl fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A position in surface pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole surface.
    pub const fn full(size: PhysicalSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// True when the rectangle lies inside `[0, size)` on both axes.
    pub fn fits_within(&self, size: PhysicalSize) -> bool {
        self.right() <= size.width as u64 && self.bottom() <= size.height as u64
    }

    pub fn covers(&self, size: PhysicalSize) -> bool {
        self.x == 0 && self.y == 0 && self.width >= size.width && self.height >= size.height
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, (right - x as u64) as u32, (bottom - y as u64) as u32)
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
