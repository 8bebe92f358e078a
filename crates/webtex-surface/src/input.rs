//! Input forwarded from the host to the engine.
//!
//! Positions arrive in host pixels and leave in engine view coordinates.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use webtex_common::Point;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Move,
    Down(PointerButton),
    Up(PointerButton),
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub modifiers: Modifiers,
    pub click_count: u32,
}

impl PointerEvent {
    pub fn moved(position: Point) -> Self {
        Self {
            kind: PointerKind::Move,
            position,
            modifiers: Modifiers::empty(),
            click_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    pub delta_x: f32,
    pub delta_y: f32,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Down,
    Up,
    /// A produced character, sent after the matching `Down`.
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyKind,
    /// Platform virtual key code.
    pub key_code: u32,
    pub character: Option<char>,
    pub modifiers: Modifiers,
}

/// Host pixel position to engine view coordinates.
pub fn to_view(position: Point, device_scale_factor: f32) -> Point {
    if device_scale_factor <= 0.0 || !device_scale_factor.is_finite() {
        return position;
    }
    Point::new(
        (position.x as f32 / device_scale_factor).round() as i32,
        (position.y as f32 / device_scale_factor).round() as i32,
    )
}
