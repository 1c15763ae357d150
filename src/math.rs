//! Small geometry helpers.
//!
//! Vectors come from [`glam`]; this module only adds the axis-aligned
//! rectangle used for sprite-sheet frames and collision boxes.

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Overlap test; touching edges do not count as a collision.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.x + self.w && point.y >= self.y && point.y < self.y + self.h
    }
}
