//! Lasso platform core contracts.
//!
//! This crate contains cross-platform screen, geometry, and portal data
//! structures used by the capture engine and the selection layer without
//! coupling to a concrete OS backend.

pub mod geometry;
pub mod portal;

pub use geometry::{LogicalRect, PixelRect};
pub use portal::{
    PortalResponse, ScreenshotRequest, RESPONSE_CANCELLED, RESPONSE_OTHER, RESPONSE_SUCCESS,
};

use serde::{Deserialize, Serialize};

/// A connected screen as reported by the windowing system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenInfo {
    /// Monitor name/identifier (display only).
    pub name: String,
    /// Placement in the logical desktop.
    pub geometry: LogicalRect,
    /// Reported physical/logical ratio. Not trusted by the portal strategy.
    pub scale_factor: f64,
}

impl ScreenInfo {
    pub fn new(name: impl Into<String>, geometry: LogicalRect, scale_factor: f64) -> Self {
        Self {
            name: name.into(),
            geometry,
            scale_factor,
        }
    }
}

/// Display-server session type, probed from the session environment.
///
/// This is the capability signal for capture. The toolkit's rendering
/// backend (which can be forced to X11 under Wayland) is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Wayland,
    X11,
    Tty,
    #[default]
    Unknown,
}

impl SessionType {
    /// Interpret an `XDG_SESSION_TYPE`-style value.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("wayland") => SessionType::Wayland,
            Some("x11") => SessionType::X11,
            Some("tty") => SessionType::Tty,
            _ => SessionType::Unknown,
        }
    }

    /// Whether the compositor forbids direct cross-process pixel access.
    pub fn forbids_direct_capture(&self) -> bool {
        matches!(self, SessionType::Wayland)
    }
}

/// Compute the virtual desktop bounds: the union of every screen's
/// logical geometry. `None` when no screen has a non-empty geometry.
pub fn virtual_desktop_bounds(screens: &[ScreenInfo]) -> Option<LogicalRect> {
    let bounds = screens
        .iter()
        .fold(LogicalRect::new(0, 0, 0, 0), |acc, screen| {
            acc.united(&screen.geometry)
        });
    (!bounds.is_empty()).then_some(bounds)
}
