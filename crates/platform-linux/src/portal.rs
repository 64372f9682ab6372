//! XDG Desktop Portal integration for one-shot screenshots.
//!
//! On Wayland, clients cannot read other surfaces' pixels. The
//! `org.freedesktop.portal.Screenshot` interface asks the compositor to
//! write the whole desktop to a temporary file and answers with its URI.
//!
//! # Flow
//!
//! 1. Call `Screenshot` on `org.freedesktop.portal.Desktop` with a fresh
//!    handle token and `interactive = false`
//! 2. Wait for the `Response` signal on the returned request object
//! 3. Status `0` carries `uri`; anything else is a refusal

use ashpd::desktop::screenshot::Screenshot;
use ashpd::desktop::ResponseError;

use lasso_common::error::{LassoError, LassoResult};
use lasso_platform_core::{PortalResponse, ScreenshotRequest, RESPONSE_CANCELLED, RESPONSE_OTHER};

/// Send one screenshot request and wait for its completion.
///
/// ashpd derives the DBus handle token itself; `request.token` correlates
/// this call in the logs.
pub async fn request_screenshot(request: &ScreenshotRequest) -> LassoResult<PortalResponse> {
    tracing::info!(
        token = %request.token,
        interactive = request.interactive,
        "Requesting XDG screenshot"
    );

    let pending = Screenshot::request()
        .interactive(request.interactive)
        .modal(false)
        .send()
        .await
        .map_err(|e| {
            LassoError::portal(format!("Screenshot interface not reachable: {e}"))
        })?;

    match pending.response() {
        Ok(screenshot) => {
            let uri = screenshot.uri().to_string();
            tracing::debug!(token = %request.token, %uri, "Portal response received");
            Ok(PortalResponse::success(uri))
        }
        Err(ashpd::Error::Response(ResponseError::Cancelled)) => {
            Ok(PortalResponse::failure(RESPONSE_CANCELLED))
        }
        Err(ashpd::Error::Response(ResponseError::Other)) => {
            Ok(PortalResponse::failure(RESPONSE_OTHER))
        }
        Err(e) => Err(LassoError::portal(format!(
            "Screenshot request {} failed: {e}",
            request.token
        ))),
    }
}

/// Check whether a screenshot portal can plausibly be reached.
pub fn is_portal_available() -> bool {
    std::env::var("DBUS_SESSION_BUS_ADDRESS").is_ok()
        || std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| std::path::Path::new(&dir).join("bus").exists())
            .unwrap_or(false)
}
