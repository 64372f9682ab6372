//! Portal strategy: one combined desktop image, sliced per screen.
//!
//! The portal returns a single physical-pixel image of the whole desktop,
//! while the toolkit describes screens in logical coordinates that may not
//! match the compositor's backing resolution. The slicing scale is therefore
//! derived from the image itself:
//!
//! ```text
//! scale = image.width / union(screen geometries).width
//! slice = round((geometry.origin - bounds.origin) * scale), round(geometry.size * scale)
//! ```
//!
//! and every slice is clamped to the image.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::RgbaImage;
use lasso_common::error::{LassoError, LassoResult};
use lasso_platform_core::{
    virtual_desktop_bounds, LogicalRect, PixelRect, PortalResponse, ScreenInfo, ScreenshotRequest,
};

use crate::backend::{ScreenSource, ScreenshotService};
use crate::cancel::CancelToken;
use crate::engine::CaptureOptions;
use crate::frame::{is_valid_scale, sort_left_to_right, Frame};

/// Request a desktop screenshot and slice it into one frame per screen.
pub async fn capture_via_portal(
    source: &dyn ScreenSource,
    service: &dyn ScreenshotService,
    options: &CaptureOptions,
) -> LassoResult<Vec<Frame>> {
    let layout = source.screens()?;
    if layout.is_empty() {
        return Err(LassoError::capture("No screens reported; nothing to slice"));
    }

    let request = ScreenshotRequest::new(options.interactive);
    tracing::info!(token = %request.token, "Waiting for screenshot portal response");

    let response = await_response(
        service.request_screenshot(&request),
        options.timeout,
        &options.cancel,
    )
    .await?;

    let Some(uri) = response.saved_uri() else {
        return Err(LassoError::portal(format!(
            "Screenshot request {} refused (status {}, uri {:?})",
            request.token, response.status, response.uri
        )));
    };

    let path = uri_to_path(uri)?;
    let combined = load_and_discard(&path)?;
    tracing::info!(
        path = %path.display(),
        width = combined.width(),
        height = combined.height(),
        "Loaded portal screenshot"
    );

    slice_combined(&combined, &layout)
}

/// Wait for the portal's completion, bounded by `timeout` and `cancel`.
///
/// Exceeding the timeout is reported as a portal failure.
pub async fn await_response<F>(
    response: F,
    timeout: Option<Duration>,
    cancel: &CancelToken,
) -> LassoResult<PortalResponse>
where
    F: Future<Output = LassoResult<PortalResponse>>,
{
    let bounded = async move {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, response).await {
                Ok(result) => result,
                Err(_) => Err(LassoError::portal(format!(
                    "No screenshot response within {:.1}s",
                    limit.as_secs_f64()
                ))),
            },
            None => response.await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LassoError::Cancelled),
        result = bounded => result,
    }
}

/// Local path behind a `file://` URI.
pub fn uri_to_path(uri: &str) -> LassoResult<PathBuf> {
    let url = url::Url::parse(uri)
        .map_err(|e| LassoError::portal(format!("Invalid screenshot URI {uri:?}: {e}")))?;
    url.to_file_path()
        .map_err(|_| LassoError::portal(format!("Screenshot URI {uri:?} is not a local file")))
}

/// Decode the portal's temporary file, then delete it.
///
/// The file is removed whether or not decoding succeeds.
pub fn load_and_discard(path: &Path) -> LassoResult<RgbaImage> {
    if !path.exists() {
        return Err(LassoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let _artifact = PortalArtifact::new(path);
    let decoded = image::open(path).map_err(|e| {
        LassoError::capture(format!(
            "Failed to decode portal screenshot {}: {e}",
            path.display()
        ))
    })?;
    Ok(decoded.into_rgba8())
}

/// Removes the portal's temporary file when dropped.
struct PortalArtifact {
    path: PathBuf,
}

impl PortalArtifact {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Drop for PortalArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed portal screenshot"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove portal screenshot"
            ),
        }
    }
}

/// Physical pixels per logical pixel for the combined image.
///
/// Falls back to `1.0` when either width is zero so the result is always a
/// usable scale.
pub fn global_scale_factor(image_width: u32, logical_width: u32) -> f64 {
    if image_width == 0 || logical_width == 0 {
        return 1.0;
    }
    let scale = image_width as f64 / logical_width as f64;
    if is_valid_scale(scale) {
        scale
    } else {
        1.0
    }
}

/// Where `geometry` lands in the combined image, clamped to its size.
///
/// `None` when nothing of the screen is left after clamping.
pub fn slice_rect(
    geometry: &LogicalRect,
    bounds: &LogicalRect,
    scale: f64,
    image_width: u32,
    image_height: u32,
) -> Option<PixelRect> {
    let x = ((geometry.x as i64 - bounds.x as i64) as f64 * scale).round();
    let y = ((geometry.y as i64 - bounds.y as i64) as f64 * scale).round();
    let width = (geometry.width as f64 * scale).round();
    let height = (geometry.height as f64 * scale).round();

    let x = x.clamp(0.0, image_width as f64) as u32;
    let y = y.clamp(0.0, image_height as f64) as u32;
    let width = width.clamp(0.0, (image_width - x) as f64) as u32;
    let height = height.clamp(0.0, (image_height - y) as f64) as u32;

    (width > 0 && height > 0).then_some(PixelRect::new(x, y, width, height))
}

/// Cut the combined desktop image into one frame per screen.
///
/// Every frame carries the derived global scale; the per-screen reported
/// scale is not used here.
pub fn slice_combined(combined: &RgbaImage, layout: &[ScreenInfo]) -> LassoResult<Vec<Frame>> {
    let bounds = virtual_desktop_bounds(layout)
        .ok_or_else(|| LassoError::capture("Screens report no logical area"))?;
    let (image_width, image_height) = combined.dimensions();
    let scale = global_scale_factor(image_width, bounds.width);

    tracing::debug!(
        bounds_x = bounds.x,
        bounds_y = bounds.y,
        bounds_width = bounds.width,
        bounds_height = bounds.height,
        image_width,
        image_height,
        scale,
        "Derived global scale factor"
    );

    let mut frames = Vec::with_capacity(layout.len());
    for (position, screen) in layout.iter().enumerate() {
        let Some(rect) = slice_rect(&screen.geometry, &bounds, scale, image_width, image_height)
        else {
            tracing::warn!(
                screen = %screen.name,
                x = screen.geometry.x,
                y = screen.geometry.y,
                width = screen.geometry.width,
                height = screen.geometry.height,
                "Screen falls outside the portal image; skipping"
            );
            continue;
        };

        if (screen.scale_factor - scale).abs() > f64::EPSILON {
            tracing::debug!(
                screen = %screen.name,
                reported = screen.scale_factor,
                derived = scale,
                "Reported scale differs from portal image"
            );
        }

        let image =
            image::imageops::crop_imm(combined, rect.x, rect.y, rect.width, rect.height).to_image();
        frames.push(Frame {
            image,
            geometry: screen.geometry,
            scale_factor: scale,
            name: screen.name.clone(),
            index: position,
        });
    }

    sort_left_to_right(&mut frames);
    Ok(frames)
}
