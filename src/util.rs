// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! Small shared data structures: float and integer points.
//! Tile-space positions and scroll offsets are PointF32,
//! pixel offsets from the terrain table are PointI32.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF32 {
    pub x: f32,
    pub y: f32,
}

impl PointF32 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointI32 {
    pub x: i32,
    pub y: i32,
}
