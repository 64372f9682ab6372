//! Crop a saved frame by logical selection bounds.

use std::path::PathBuf;

use anyhow::Context;
use lasso_selection::{crop_selection, save_png, StrokeBounds};

pub fn run(
    image: PathBuf,
    scale: f64,
    bounds: StrokeBounds,
    output: PathBuf,
) -> anyhow::Result<()> {
    let frame = image::open(&image)
        .with_context(|| format!("Failed to open frame {}", image.display()))?
        .into_rgba8();

    tracing::info!(
        path = %image.display(),
        width = frame.width(),
        height = frame.height(),
        scale,
        "Loaded frame"
    );

    let cropped = crop_selection(&frame, scale, &bounds)?;
    let saved = save_png(&cropped, &output)?;
    println!("{}", saved.display());
    Ok(())
}
