//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A 2D size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Size with the given width and a height that keeps `ratio` (height / width).
    #[inline]
    pub fn from_width_and_ratio(width: f64, ratio: f64) -> Self {
        Self::new(width, width * ratio)
    }
}
