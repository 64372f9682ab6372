//! Direct strategy: grab each screen in-process.

use image::RgbaImage;
use lasso_common::error::LassoResult;
use lasso_platform_core::ScreenInfo;

use crate::backend::ScreenSource;
use crate::frame::{is_valid_scale, sort_left_to_right, Frame};

/// Grab every screen the source reports.
///
/// A screen whose grab fails or comes back empty is logged and skipped; only
/// failing to enumerate screens is an error.
pub fn capture_direct(source: &dyn ScreenSource) -> LassoResult<Vec<Frame>> {
    let layout = source.screens()?;
    let mut frames = Vec::with_capacity(layout.len());

    for (position, screen) in layout.into_iter().enumerate() {
        let image = match source.grab(position) {
            Ok(Some(image)) if image.width() > 0 && image.height() > 0 => image,
            Ok(_) => {
                tracing::warn!(
                    screen = %screen.name,
                    "Grab returned an empty buffer; skipping screen"
                );
                continue;
            }
            Err(e) => {
                tracing::warn!(screen = %screen.name, error = %e, "Grab failed; skipping screen");
                continue;
            }
        };

        let scale_factor = frame_scale(&screen, &image);
        tracing::debug!(
            screen = %screen.name,
            x = screen.geometry.x,
            y = screen.geometry.y,
            logical_width = screen.geometry.width,
            logical_height = screen.geometry.height,
            physical_width = image.width(),
            physical_height = image.height(),
            scale_factor,
            "Grabbed screen"
        );

        frames.push(Frame {
            image,
            geometry: screen.geometry,
            scale_factor,
            name: screen.name,
            index: position,
        });
    }

    sort_left_to_right(&mut frames);
    Ok(frames)
}

/// The reported scale, or the buffer/geometry ratio when the report is unusable.
fn frame_scale(screen: &ScreenInfo, image: &RgbaImage) -> f64 {
    if is_valid_scale(screen.scale_factor) {
        return screen.scale_factor;
    }

    let derived = image.width() as f64 / screen.geometry.width as f64;
    let scale = if is_valid_scale(derived) { derived } else { 1.0 };
    tracing::warn!(
        screen = %screen.name,
        reported = screen.scale_factor,
        derived = scale,
        "Reported scale factor unusable; using buffer ratio"
    );
    scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticScreens;
    use lasso_platform_core::LogicalRect;

    fn screen(name: &str, x: i32, width: u32, scale: f64) -> ScreenInfo {
        ScreenInfo::new(name, LogicalRect::new(x, 0, width, 1080), scale)
    }

    #[test]
    fn one_frame_per_grabbed_screen_ordered_by_x() {
        let source = StaticScreens::with_images(
            vec![
                screen("DP-1", 1920, 1920, 1.0),
                screen("eDP-1", 0, 1920, 2.0),
            ],
            vec![
                Some(RgbaImage::new(1920, 1080)),
                Some(RgbaImage::new(3840, 2160)),
            ],
        );

        let frames = capture_direct(&source).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].name, "eDP-1");
        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[0].scale_factor, 2.0);
        assert_eq!(frames[0].physical_size(), (3840, 2160));
        assert_eq!(frames[1].name, "DP-1");
        assert_eq!(frames[1].index, 1);
    }

    #[test]
    fn empty_grabs_are_skipped_not_fatal() {
        let source = StaticScreens::with_images(
            vec![screen("A", 0, 1920, 1.0), screen("B", 1920, 1920, 1.0)],
            vec![None, Some(RgbaImage::new(1920, 1080))],
        );

        let frames = capture_direct(&source).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].name, "B");
        assert_eq!(frames[0].index, 0);
    }

    #[test]
    fn zero_sized_buffer_counts_as_empty() {
        let source = StaticScreens::with_images(
            vec![screen("A", 0, 1920, 1.0)],
            vec![Some(RgbaImage::new(0, 0))],
        );
        assert!(capture_direct(&source).unwrap().is_empty());
    }

    #[test]
    fn every_grab_failing_yields_no_frames() {
        let source = StaticScreens::with_images(
            vec![screen("A", 0, 1920, 1.0), screen("B", 1920, 1920, 1.0)],
            vec![None, None],
        );
        assert!(capture_direct(&source).unwrap().is_empty());
    }

    #[test]
    fn unusable_reported_scale_falls_back_to_buffer_ratio() {
        let source = StaticScreens::with_images(
            vec![screen("A", 0, 1280, 0.0), screen("B", 1280, 0, f64::NAN)],
            vec![Some(RgbaImage::new(2560, 1440)), Some(RgbaImage::new(8, 8))],
        );

        let frames = capture_direct(&source).unwrap();
        assert_eq!(frames[0].scale_factor, 2.0);
        // Zero-width geometry gives an infinite ratio, so the last resort applies.
        assert_eq!(frames[1].scale_factor, 1.0);
    }
}
