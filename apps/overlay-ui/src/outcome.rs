//! How an overlay session ends.

use std::path::{Path, PathBuf};

use lasso_capture_engine::Frame;
use lasso_selection::{crop_stroke, save_png, Stroke};

/// Terminal state of the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The selection was written to this path.
    Saved(PathBuf),
    /// Nothing usable was selected, or saving failed.
    Failed,
    /// The user dismissed the overlay.
    Aborted,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Saved(_) => 0,
            Outcome::Failed | Outcome::Aborted => 1,
        }
    }
}

/// Crop the finished stroke out of `frame` and save it to `output`.
pub fn finish_selection(frame: &Frame, stroke: Stroke, output: &Path) -> Outcome {
    let saved = crop_stroke(&frame.image, frame.scale_factor, stroke)
        .and_then(|cropped| save_png(&cropped, output));

    match saved {
        Ok(path) => Outcome::Saved(path),
        Err(e) if e.is_selection_failure() => {
            tracing::warn!(frame = %frame.name, error = %e, "Nothing selected");
            Outcome::Failed
        }
        Err(e) => {
            tracing::error!(frame = %frame.name, error = %e, "Failed to save selection");
            Outcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use lasso_common::config::OUTPUT_FILE_NAME;
    use lasso_platform_core::LogicalRect;
    use lasso_selection::{BrushStyle, LogicalPoint};

    fn frame(scale: f64) -> Frame {
        Frame {
            image: RgbaImage::new((400.0 * scale) as u32, (300.0 * scale) as u32),
            geometry: LogicalRect::new(0, 0, 400, 300),
            scale_factor: scale,
            name: "eDP-1".to_string(),
            index: 0,
        }
    }

    #[test]
    fn drawn_selection_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(OUTPUT_FILE_NAME);
        let style = BrushStyle::new(0.0, 0.0, 1.0);
        let mut stroke = Stroke::begin(LogicalPoint::new(10.0, 10.0), style);
        stroke.extend(LogicalPoint::new(60.0, 40.0));

        let outcome = finish_selection(&frame(2.0), stroke, &output);
        assert_eq!(outcome, Outcome::Saved(output.clone()));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(image::image_dimensions(&output).unwrap(), (100, 60));
    }

    #[test]
    fn click_without_drag_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(OUTPUT_FILE_NAME);
        let stroke = Stroke::begin(LogicalPoint::new(10.0, 10.0), BrushStyle::default());

        let outcome = finish_selection(&frame(1.0), stroke, &output);
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(outcome.exit_code(), 1);
        assert!(!output.exists());
    }

    #[test]
    fn aborting_exits_with_failure() {
        assert_eq!(Outcome::Aborted.exit_code(), 1);
    }
}
