//! Rectangles in the two coordinate spaces Lasso reconciles.
//!
//! [`LogicalRect`] lives in the desktop's logical (toolkit) space and may
//! have a negative origin. [`PixelRect`] addresses pixels of a concrete
//! raster buffer and is always non-negative.

use serde::{Deserialize, Serialize};

/// Rectangle in logical desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LogicalRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// Empty rectangles do not contribute, so folding from an empty
    /// rectangle yields the union of the rest.
    pub fn united(&self, other: &LogicalRect) -> LogicalRect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }

        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        LogicalRect {
            x: left,
            y: top,
            width: (right - left as i64) as u32,
            height: (bottom - top as i64) as u32,
        }
    }
}

/// Rectangle addressing pixels of a raster buffer.
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

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Whether the rectangle lies entirely inside a `width` x `height` buffer.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }
}
