use crate::foundation::error::{LogicError, LogicResult};

pub use kurbo::Point;

/// Monotonic per-device frame counter. Bumped every time the device advances to a new frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The following frame, saturating at `u64::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Display surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a validated size: both dimensions non-zero and addressable by `i32` pixel
    /// coordinates.
    pub fn new(width: u32, height: u32) -> LogicResult<Self> {
        if width == 0 || height == 0 {
            return Err(LogicError::config("canvas width and height must be > 0"));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(LogicError::config(format!(
                "canvas {width}x{height} exceeds the {} pixel limit",
                i32::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Largest addressable pixel column.
    pub fn max_x(self) -> u32 {
        self.width.saturating_sub(1)
    }

    /// Largest addressable pixel row.
    pub fn max_y(self) -> u32 {
        self.height.saturating_sub(1)
    }

    /// Largest pixel coordinate on each axis, saturated to the `i32` range.
    pub fn pixel_bounds(self) -> (i32, i32) {
        let bound = |max: u32| i32::try_from(max).unwrap_or(i32::MAX);
        (bound(self.max_x()), bound(self.max_y()))
    }

    /// Map a pixel position into `[0, 1]` on both axes.
    ///
    /// Degenerate one-pixel axes map to `0.0`.
    pub fn normalize(self, px: Point) -> Point {
        fn axis(v: f64, max: u32) -> f64 {
            if max == 0 {
                0.0
            } else {
                (v / f64::from(max)).clamp(0.0, 1.0)
            }
        }
        Point::new(axis(px.x, self.max_x()), axis(px.y, self.max_y()))
    }

    /// Map a normalized position back onto integer pixel coordinates.
    pub fn denormalize(self, n: Point) -> (i32, i32) {
        let (max_x, max_y) = self.pixel_bounds();
        let x = (n.x.clamp(0.0, 1.0) * f64::from(max_x)).round() as i32;
        let y = (n.y.clamp(0.0, 1.0) * f64::from(max_y)).round() as i32;
        (x, y)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
