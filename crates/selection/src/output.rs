//! Persisting the cropped selection.

use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, RgbaImage};
use lasso_common::error::{LassoError, LassoResult};

/// Write `image` as PNG to `path`, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> LassoResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| match e {
            ImageError::IoError(io) => LassoError::Io(io),
            other => LassoError::unsupported(format!(
                "Cannot encode {} as PNG: {other}",
                path.display()
            )),
        })?;

    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Saved selection"
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn saved_png_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lasso_capture.png");
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(2, 1, Rgba([200, 100, 50, 128]));

        let written = save_png(&image, &path).unwrap();
        assert_eq!(written, path);

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded, image);
    }
}
