//! Session detection and screen enumeration.

use image::RgbaImage;
use lasso_common::error::{LassoError, LassoResult};
use lasso_platform_core::{LogicalRect, ScreenInfo, SessionType};

/// Environment variable carrying the session type.
pub const SESSION_TYPE_VAR: &str = "XDG_SESSION_TYPE";

/// Variables that only say which backend a toolkit renders with.
const RENDERING_BACKEND_VARS: [&str; 3] =
    ["QT_QPA_PLATFORM", "GDK_BACKEND", "WINIT_UNIX_BACKEND"];

/// Detect the current display-server session.
pub fn detect_session_type() -> SessionType {
    let value = std::env::var(SESSION_TYPE_VAR).ok();
    let session = SessionType::from_env_value(value.as_deref());
    tracing::debug!(raw = ?value, ?session, "Probed session type");
    session
}

/// Rendering backend forced on toolkits, if any.
///
/// Informational only: a Wayland session with `QT_QPA_PLATFORM=xcb` still
/// forbids direct capture.
pub fn rendering_backend_hint() -> Option<(&'static str, String)> {
    RENDERING_BACKEND_VARS.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| (*var, v))
    })
}

/// Connected screens, backed by xcap.
pub struct XcapDisplay {
    monitors: Vec<xcap::Monitor>,
}

impl XcapDisplay {
    /// Enumerate the connected monitors.
    pub fn connect() -> LassoResult<Self> {
        let monitors = xcap::Monitor::all()
            .map_err(|e| LassoError::platform(format!("Failed to enumerate monitors: {e}")))?;
        tracing::debug!(count = monitors.len(), "Enumerated monitors");
        Ok(Self { monitors })
    }

    /// Logical layout of every monitor, in enumeration order.
    pub fn screens(&self) -> Vec<ScreenInfo> {
        self.monitors.iter().map(screen_info).collect()
    }

    /// Grab one monitor. `Ok(None)` when the grab produced no pixels.
    pub fn grab(&self, index: usize) -> LassoResult<Option<RgbaImage>> {
        let monitor = self.monitors.get(index).ok_or_else(|| {
            LassoError::capture(format!(
                "Monitor index {index} out of range ({} monitors)",
                self.monitors.len()
            ))
        })?;

        let image = monitor.capture_image().map_err(|e| {
            LassoError::capture(format!("Grab of monitor {} failed: {e}", monitor.name()))
        })?;

        if image.width() == 0 || image.height() == 0 {
            return Ok(None);
        }
        Ok(Some(image))
    }
}

fn screen_info(monitor: &xcap::Monitor) -> ScreenInfo {
    reported_screen(
        monitor.name(),
        monitor.x(),
        monitor.y(),
        monitor.width(),
        monitor.height(),
        monitor.scale_factor(),
    )
}

/// Build a screen from the values xcap reports for a monitor.
///
/// xcap already divides position and size by the scale factor, so they are
/// taken as logical units unchanged.
pub fn reported_screen(
    name: &str,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    scale: f32,
) -> ScreenInfo {
    let scale = scale as f64;
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    ScreenInfo::new(name, LogicalRect::new(x, y, width, height), scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lasso_platform_core::virtual_desktop_bounds;

    #[test]
    fn reported_geometry_is_already_logical() {
        let left = reported_screen("DP-1", 0, 0, 1920, 1080, 2.0);
        let right = reported_screen("DP-2", 1920, 0, 1920, 1080, 2.0);

        assert_eq!(left.geometry, LogicalRect::new(0, 0, 1920, 1080));
        assert_eq!(right.scale_factor, 2.0);
        assert_eq!(
            virtual_desktop_bounds(&[left, right]),
            Some(LogicalRect::new(0, 0, 3840, 1080))
        );
    }

    #[test]
    fn bogus_scale_falls_back_to_one() {
        assert_eq!(reported_screen("X", 0, 0, 10, 10, 0.0).scale_factor, 1.0);
        assert_eq!(reported_screen("X", 0, 0, 10, 10, f32::NAN).scale_factor, 1.0);
    }
}
