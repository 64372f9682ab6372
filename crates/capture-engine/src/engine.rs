//! Capture engine: pick a strategy, produce one frame per screen.

use std::time::Duration;

use lasso_common::config::CaptureSettings;
use lasso_common::error::{LassoError, LassoResult};

use crate::backend::{platform_backends, ScreenSource, ScreenshotService};
use crate::cancel::CancelToken;
use crate::direct::capture_direct;
use crate::frame::Frame;
use crate::portal::capture_via_portal;
use crate::strategy::CaptureStrategy;

/// Knobs for the portal strategy.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Ask the portal for its interactive dialog.
    pub interactive: bool,

    /// Upper bound on the wait for the portal response. `None` waits forever.
    pub timeout: Option<Duration>,

    /// Aborts a pending portal wait.
    pub cancel: CancelToken,
}

impl CaptureOptions {
    pub fn from_settings(settings: &CaptureSettings) -> Self {
        Self {
            interactive: settings.interactive,
            timeout: settings.portal_timeout(),
            cancel: CancelToken::new(),
        }
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::from_settings(&CaptureSettings::default())
    }
}

/// Produces one frame per connected screen using the session's strategy.
pub struct CaptureEngine {
    strategy: CaptureStrategy,
    screens: Box<dyn ScreenSource>,
    portal: Box<dyn ScreenshotService>,
    options: CaptureOptions,
}

impl CaptureEngine {
    /// Engine with an explicit strategy and collaborators.
    pub fn new(
        strategy: CaptureStrategy,
        screens: Box<dyn ScreenSource>,
        portal: Box<dyn ScreenshotService>,
    ) -> Self {
        Self {
            strategy,
            screens,
            portal,
            options: CaptureOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }

    /// Engine for the running desktop session.
    ///
    /// The strategy follows the session type, not the toolkit's rendering
    /// backend.
    pub fn for_current_session(settings: &CaptureSettings) -> LassoResult<Self> {
        let backends = platform_backends()?;
        let strategy = CaptureStrategy::for_session(backends.session);
        tracing::info!(
            session = ?backends.session,
            strategy = %strategy,
            "Selected capture strategy"
        );
        Ok(Self::new(strategy, backends.screens, backends.portal)
            .with_options(CaptureOptions::from_settings(settings)))
    }

    pub fn strategy(&self) -> CaptureStrategy {
        self.strategy
    }

    /// Token that aborts this engine's pending portal wait.
    pub fn cancel_token(&self) -> CancelToken {
        self.options.cancel.clone()
    }

    /// Capture every screen, or fail with the reason.
    pub async fn try_capture_all(&self) -> LassoResult<Vec<Frame>> {
        match self.strategy {
            CaptureStrategy::Direct => capture_direct(self.screens.as_ref()),
            CaptureStrategy::Portal => {
                capture_via_portal(self.screens.as_ref(), self.portal.as_ref(), &self.options)
                    .await
            }
        }
    }

    /// Capture every screen.
    ///
    /// Failures are logged and surface as an empty list; callers treat an
    /// empty result as "nothing to select from".
    pub async fn capture_all(&self) -> Vec<Frame> {
        match self.try_capture_all().await {
            Ok(frames) => {
                tracing::info!(
                    strategy = %self.strategy,
                    frames = frames.len(),
                    "Capture complete"
                );
                frames
            }
            Err(LassoError::Cancelled) => {
                tracing::warn!(strategy = %self.strategy, "Capture cancelled");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(strategy = %self.strategy, error = %e, "Capture failed");
                Vec::new()
            }
        }
    }

    /// [`capture_all`](Self::capture_all) for callers without a runtime.
    pub fn capture_all_blocking(&self) -> LassoResult<Vec<Frame>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.capture_all()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FilePortal, StaticScreens};
    use image::{Rgba, RgbaImage};
    use lasso_platform_core::{LogicalRect, ScreenInfo, RESPONSE_CANCELLED, RESPONSE_OTHER};

    fn layout() -> Vec<ScreenInfo> {
        vec![
            ScreenInfo::new("right", LogicalRect::new(1920, 0, 1920, 1080), 1.0),
            ScreenInfo::new("left", LogicalRect::new(0, 0, 1920, 1080), 1.0),
        ]
    }

    fn portal_engine(portal: FilePortal) -> CaptureEngine {
        CaptureEngine::new(
            CaptureStrategy::Portal,
            Box::new(StaticScreens::new(layout())),
            Box::new(portal),
        )
        .with_options(CaptureOptions {
            interactive: false,
            timeout: Some(Duration::from_secs(5)),
            cancel: CancelToken::new(),
        })
    }

    #[tokio::test]
    async fn portal_capture_slices_and_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut combined = RgbaImage::from_pixel(3840, 1080, Rgba([0, 255, 0, 255]));
        combined.put_pixel(1920, 0, Rgba([255, 0, 0, 255]));

        let engine = portal_engine(FilePortal::serving(dir.path(), combined));
        let frames = engine.try_capture_all().await.unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].name, "left");
        assert_eq!(frames[1].name, "right");
        assert_eq!(*frames[1].image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn denied_request_yields_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        for status in [RESPONSE_CANCELLED, RESPONSE_OTHER] {
            let engine = portal_engine(FilePortal::refusing(dir.path(), status));
            let err = engine.try_capture_all().await.unwrap_err();
            assert!(matches!(err, LassoError::Portal { .. }));
            assert!(engine.capture_all().await.is_empty());
        }
    }

    #[tokio::test]
    async fn empty_uri_yields_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        let engine = portal_engine(FilePortal::empty_uri(dir.path()));
        assert!(engine.capture_all().await.is_empty());
    }

    #[tokio::test]
    async fn undecodable_file_is_still_removed() {
        let dir = tempfile::tempdir().unwrap();
        let portal = FilePortal::serving_bytes(dir.path(), b"garbage".to_vec());
        let engine = portal_engine(portal);

        assert!(engine.capture_all().await.is_empty());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn no_screens_means_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let portal = FilePortal::serving(dir.path(), RgbaImage::new(8, 8));
        let engine = CaptureEngine::new(
            CaptureStrategy::Portal,
            Box::new(StaticScreens::new(Vec::new())),
            Box::new(portal),
        );

        assert!(engine.capture_all().await.is_empty());
    }

    #[tokio::test]
    async fn cancelled_engine_returns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = portal_engine(FilePortal::serving(dir.path(), RgbaImage::new(8, 8)));
        engine.cancel_token().cancel();

        let err = engine.try_capture_all().await.unwrap_err();
        assert!(matches!(err, LassoError::Cancelled));
    }

    #[test]
    fn direct_capture_runs_without_a_runtime() {
        let engine = CaptureEngine::new(
            CaptureStrategy::Direct,
            Box::new(StaticScreens::with_images(
                layout(),
                vec![
                    Some(RgbaImage::new(1920, 1080)),
                    Some(RgbaImage::new(1920, 1080)),
                ],
            )),
            Box::new(FilePortal::refusing(std::env::temp_dir(), RESPONSE_OTHER)),
        );

        let frames = engine.capture_all_blocking().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].name, "left");
    }

    #[test]
    fn options_follow_settings() {
        let settings = CaptureSettings {
            interactive: true,
            portal_timeout_secs: 0,
        };
        let options = CaptureOptions::from_settings(&settings);
        assert!(options.interactive);
        assert_eq!(options.timeout, None);
        assert!(!options.cancel.is_cancelled());
    }
}
