//! Captured frames: one monitor's pixels plus where they sit on the desktop.

use image::RgbaImage;
use lasso_platform_core::LogicalRect;
use serde::{Deserialize, Serialize};

/// One monitor's captured image and its placement metadata.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Physical pixels. Alpha is kept exactly as the source produced it.
    pub image: RgbaImage,

    /// Placement in the logical desktop.
    pub geometry: LogicalRect,

    /// Physical pixels per logical pixel. Always finite and `> 0`.
    pub scale_factor: f64,

    /// Monitor identifier, for display only.
    pub name: String,

    /// Left-to-right position among the captured frames.
    pub index: usize,
}

impl Frame {
    /// `(width, height)` of the pixel buffer.
    pub fn physical_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Serializable description without the pixels.
    pub fn summary(&self) -> FrameSummary {
        let (physical_width, physical_height) = self.physical_size();
        FrameSummary {
            index: self.index,
            name: self.name.clone(),
            geometry: self.geometry,
            scale_factor: self.scale_factor,
            physical_width,
            physical_height,
        }
    }
}

/// Frame metadata as written next to dumped frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub index: usize,
    pub name: String,
    pub geometry: LogicalRect,
    pub scale_factor: f64,
    pub physical_width: u32,
    pub physical_height: u32,
}

/// Order frames by ascending logical x and renumber them.
///
/// The sort is stable: frames sharing an x keep their enumeration order.
pub fn sort_left_to_right(frames: &mut [Frame]) {
    frames.sort_by_key(|frame| frame.geometry.x);
    for (position, frame) in frames.iter_mut().enumerate() {
        frame.index = position;
    }
}

/// A usable scale factor: finite and strictly positive.
pub(crate) fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str, x: i32, y: i32) -> Frame {
        Frame {
            image: RgbaImage::new(4, 4),
            geometry: LogicalRect::new(x, y, 4, 4),
            scale_factor: 1.0,
            name: name.to_string(),
            index: usize::MAX,
        }
    }

    #[test]
    fn sorts_by_x_and_renumbers() {
        let mut frames = vec![frame("b", 1920, 0), frame("a", -1920, 0), frame("c", 0, 0)];
        sort_left_to_right(&mut frames);

        let names: Vec<_> = frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "c", "b"]);
        let indices: Vec<_> = frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let mut frames = vec![frame("top", 0, 0), frame("bottom", 0, 1080), frame("left", -800, 0)];
        sort_left_to_right(&mut frames);

        let names: Vec<_> = frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["left", "top", "bottom"]);
    }

    #[test]
    fn scale_validity() {
        assert!(is_valid_scale(1.0));
        assert!(is_valid_scale(1.25));
        assert!(!is_valid_scale(0.0));
        assert!(!is_valid_scale(-2.0));
        assert!(!is_valid_scale(f64::NAN));
        assert!(!is_valid_scale(f64::INFINITY));
    }
}
