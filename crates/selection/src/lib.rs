//! Lasso Selection
//!
//! Turns a freehand stroke drawn over one frame into a cropped image of
//! that frame:
//!
//! ```text
//! pointer samples ──▶ Stroke ──▶ StrokeBounds (logical)
//!                                   │ clamp origin ≥ 0
//!                                   ▼ × scale factor
//!                               PixelRect (physical)
//!                                   │ clamp to image
//!                                   ▼
//!                               cropped RgbaImage ──▶ PNG
//! ```

pub mod crop;
pub mod output;
pub mod stroke;

pub use crop::{crop_selection, crop_stroke, physical_selection};
pub use output::save_png;
pub use stroke::{BrushStyle, LogicalPoint, PathSegment, Stroke, StrokeBounds};
