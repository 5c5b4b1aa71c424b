//! Canvas-relative placement for visual layers.
//!
//! Positions and sizes are percentages of the composition canvas, not
//! pixels: `(0, 0)` is the top-left corner and a size of `100 x 100` covers
//! the whole canvas.

use serde::{Deserialize, Serialize};

/// Smallest width/height a visual layer may shrink to (percent).
pub const MIN_SIZE_PERCENT: f64 = 1.0;
/// Largest width/height a visual layer may grow to (percent).
pub const MAX_SIZE_PERCENT: f64 = 100.0;
/// Furthest a layer's top-left corner may move off-canvas in either
/// direction (percent). Beyond this the layer cannot be visible.
pub const POSITION_LIMIT_PERCENT: f64 = 100.0;

/// Top-left corner of a layer, in canvas percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Layer extent, in canvas percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Placement of a visual layer on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Position,
    pub size: Size,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp into the reachable range; NaN coordinates become 0.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_coord(self.x),
            y: clamp_coord(self.y),
        }
    }
}

impl Size {
    /// Full canvas.
    pub const FULL: Size = Size {
        width: 100.0,
        height: 100.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to `[MIN_SIZE_PERCENT, MAX_SIZE_PERCENT]`.
    pub fn clamped(self) -> Self {
        Self {
            width: clamp_extent(self.width),
            height: clamp_extent(self.height),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::FULL
    }
}

impl Transform {
    /// Covers the full canvas.
    pub const FULL_CANVAS: Transform = Transform {
        position: Position { x: 0.0, y: 0.0 },
        size: Size::FULL,
    };

    /// Transform of the given size centered at `(cx, cy)`, kept on canvas.
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let size = Size::new(width, height).clamped();
        let x = (cx - size.width / 2.0).clamp(0.0, 100.0 - size.width);
        let y = (cy - size.height / 2.0).clamp(0.0, 100.0 - size.height);
        Self {
            position: Position::new(x, y),
            size,
        }
    }

    /// Clamp position and size into their documented ranges.
    pub fn clamped(self) -> Self {
        Self {
            position: self.position.clamped(),
            size: self.size.clamped(),
        }
    }

    /// Check if a canvas point falls inside this transform's box.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.position.x
            && px <= self.position.x + self.size.width
            && py >= self.position.y
            && py <= self.position.y + self.size.height
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::FULL_CANVAS
    }
}

fn clamp_coord(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-POSITION_LIMIT_PERCENT, POSITION_LIMIT_PERCENT)
}

fn clamp_extent(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_SIZE_PERCENT;
    }
    value.clamp(MIN_SIZE_PERCENT, MAX_SIZE_PERCENT)
}
