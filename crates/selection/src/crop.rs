//! Logical stroke bounds to a physical-pixel crop.
//!
//! Two independent error sources are contained separately: brush expansion
//! can push the bounds past the frame's logical origin, and scaling can push
//! the physical rectangle past the buffer. The first is clamped in logical
//! space, the second in physical space.

use image::RgbaImage;
use lasso_common::error::{LassoError, LassoResult};
use lasso_platform_core::PixelRect;

use crate::stroke::{Stroke, StrokeBounds};

/// Map logical stroke bounds to a pixel rectangle inside the frame image.
///
/// Fails with [`LassoError::Selection`] when nothing of the selection is
/// left after clamping.
pub fn physical_selection(
    bounds: &StrokeBounds,
    scale: f64,
    image_width: u32,
    image_height: u32,
) -> LassoResult<PixelRect> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(LassoError::selection(format!(
            "Frame scale factor {scale} is unusable"
        )));
    }
    if bounds.is_empty() {
        return Err(LassoError::selection("Stroke covers no area"));
    }

    // Size is measured from the clamped edge: the part of a stroke left of
    // or above the frame does not widen the crop on the far side.
    let left = bounds.min_x.max(0.0);
    let top = bounds.min_y.max(0.0);
    let logical_width = bounds.max_x - left;
    let logical_height = bounds.max_y - top;

    let phys_x = left * scale;
    let phys_y = top * scale;
    let phys_width = (logical_width * scale).min(image_width as f64 - phys_x);
    let phys_height = (logical_height * scale).min(image_height as f64 - phys_y);

    if phys_width <= 0.0 || phys_height <= 0.0 {
        return Err(LassoError::selection(format!(
            "Selection ({:.1}, {:.1})-({:.1}, {:.1}) lies outside the {}x{} frame",
            bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y, image_width, image_height
        )));
    }

    let x0 = phys_x.floor() as u32;
    let y0 = phys_y.floor() as u32;
    let x1 = ((phys_x + phys_width).ceil() as u32).min(image_width);
    let y1 = ((phys_y + phys_height).ceil() as u32).min(image_height);

    Ok(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
}

/// Cut the selection out of a frame's physical image.
///
/// Pixels are copied verbatim; alpha is untouched.
pub fn crop_selection(
    image: &RgbaImage,
    scale: f64,
    bounds: &StrokeBounds,
) -> LassoResult<RgbaImage> {
    let (width, height) = image.dimensions();
    let rect = physical_selection(bounds, scale, width, height)?;
    tracing::debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        scale,
        "Cropping selection"
    );
    Ok(image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}

/// Finish `stroke` and crop what it encloses.
pub fn crop_stroke(image: &RgbaImage, scale: f64, stroke: Stroke) -> LassoResult<RgbaImage> {
    let bounds = stroke
        .finish()
        .ok_or_else(|| LassoError::selection("Pointer released without drawing"))?;
    crop_selection(image, scale, &bounds)
}
