use std::sync::Mutex;

use image::RgbaImage;

use lasso_common::error::{LassoError, LassoResult};
use lasso_platform_core::{PortalResponse, ScreenInfo, ScreenshotRequest};
use lasso_platform_linux::portal::request_screenshot;
use lasso_platform_linux::XcapDisplay;

use crate::backend::{ScreenSource, ScreenshotService};

/// Screens of the running session via xcap.
///
/// The display is connected on first use so that a failure surfaces as a
/// capture failure rather than at construction.
pub struct XcapScreenSource {
    display: Mutex<Option<XcapDisplay>>,
}

impl XcapScreenSource {
    pub fn new() -> Self {
        Self {
            display: Mutex::new(None),
        }
    }
}

impl Default for XcapScreenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenSource for XcapScreenSource {
    fn screens(&self) -> LassoResult<Vec<ScreenInfo>> {
        let display = XcapDisplay::connect()?;
        let screens = display.screens();
        let mut slot = self
            .display
            .lock()
            .map_err(|_| LassoError::platform("Display handle poisoned"))?;
        *slot = Some(display);
        Ok(screens)
    }

    fn grab(&self, index: usize) -> LassoResult<Option<RgbaImage>> {
        let mut slot = self
            .display
            .lock()
            .map_err(|_| LassoError::platform("Display handle poisoned"))?;
        if slot.is_none() {
            *slot = Some(XcapDisplay::connect()?);
        }
        match slot.as_ref() {
            Some(display) => display.grab(index),
            None => Ok(None),
        }
    }
}

/// `org.freedesktop.portal.Screenshot` on the session bus.
pub struct DesktopPortal;

#[async_trait::async_trait(?Send)]
impl ScreenshotService for DesktopPortal {
    async fn request_screenshot(
        &self,
        request: &ScreenshotRequest,
    ) -> LassoResult<PortalResponse> {
        request_screenshot(request).await
    }
}
