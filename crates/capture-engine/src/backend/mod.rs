use image::RgbaImage;

use lasso_common::error::LassoResult;
use lasso_platform_core::{PortalResponse, ScreenInfo, ScreenshotRequest, SessionType};

/// Screen enumeration and direct grabs.
pub trait ScreenSource {
    /// Connected screens in enumeration order.
    fn screens(&self) -> LassoResult<Vec<ScreenInfo>>;

    /// Synchronously grab the screen at `index` (as returned by [`screens`]).
    /// `Ok(None)` means the grab produced an empty buffer.
    ///
    /// [`screens`]: ScreenSource::screens
    fn grab(&self, index: usize) -> LassoResult<Option<RgbaImage>>;
}

/// The desktop screenshot service, consumed as a request/response channel.
///
/// Capture runs on one thread, so the returned future need not be `Send`.
#[async_trait::async_trait(?Send)]
pub trait ScreenshotService {
    /// Issue the request and resolve with its completion.
    async fn request_screenshot(&self, request: &ScreenshotRequest)
        -> LassoResult<PortalResponse>;
}

#[cfg(target_os = "linux")]
pub mod linux;
pub mod memory;

#[cfg(target_os = "linux")]
pub use linux::{DesktopPortal, XcapScreenSource};
pub use memory::{FilePortal, StaticScreens};

/// Collaborators for the running session.
pub struct PlatformBackends {
    pub session: SessionType,
    pub screens: Box<dyn ScreenSource>,
    pub portal: Box<dyn ScreenshotService>,
}

/// Get the platform-specific collaborators.
pub fn platform_backends() -> LassoResult<PlatformBackends> {
    #[cfg(target_os = "linux")]
    {
        Ok(PlatformBackends {
            session: lasso_platform_linux::detect_session_type(),
            screens: Box::new(XcapScreenSource::new()),
            portal: Box::new(DesktopPortal),
        })
    }
    #[cfg(not(target_os = "linux"))]
    {
        Err(lasso_common::error::LassoError::unsupported(
            "Only Linux desktop sessions are supported",
        ))
    }
}
