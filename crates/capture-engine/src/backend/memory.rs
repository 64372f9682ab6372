//! In-memory collaborators for headless runs and tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{ImageFormat, RgbaImage};

use lasso_common::error::{LassoError, LassoResult};
use lasso_platform_core::{PortalResponse, ScreenInfo, ScreenshotRequest};

use crate::backend::{ScreenSource, ScreenshotService};

/// A fixed screen layout with optional per-screen grab results.
#[derive(Debug, Clone, Default)]
pub struct StaticScreens {
    screens: Vec<ScreenInfo>,
    images: Vec<Option<RgbaImage>>,
}

impl StaticScreens {
    /// Layout only; every grab returns an empty buffer.
    pub fn new(screens: Vec<ScreenInfo>) -> Self {
        Self {
            screens,
            images: Vec::new(),
        }
    }

    /// Layout plus what each grab returns (`None` = empty buffer).
    pub fn with_images(screens: Vec<ScreenInfo>, images: Vec<Option<RgbaImage>>) -> Self {
        Self { screens, images }
    }
}

impl ScreenSource for StaticScreens {
    fn screens(&self) -> LassoResult<Vec<ScreenInfo>> {
        Ok(self.screens.clone())
    }

    fn grab(&self, index: usize) -> LassoResult<Option<RgbaImage>> {
        if index >= self.screens.len() {
            return Err(LassoError::capture(format!(
                "Screen index {index} out of range ({} screens)",
                self.screens.len()
            )));
        }
        Ok(self.images.get(index).cloned().flatten())
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Image(RgbaImage),
    Bytes(Vec<u8>),
    EmptyUri,
    Status(u32),
}

/// A screenshot service that answers from a fixed payload.
///
/// Successful replies write the payload to `<dir>/<token>.png` and answer
/// with its `file://` URI, like a real portal does.
#[derive(Debug)]
pub struct FilePortal {
    dir: PathBuf,
    reply: Reply,
    requests: Mutex<Vec<ScreenshotRequest>>,
    written: Mutex<Vec<PathBuf>>,
}

impl FilePortal {
    /// Answer every request with `image`.
    pub fn serving(dir: impl Into<PathBuf>, image: RgbaImage) -> Self {
        Self::with_reply(dir, Reply::Image(image))
    }

    /// Answer with a file holding arbitrary bytes (e.g. an undecodable image).
    pub fn serving_bytes(dir: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self::with_reply(dir, Reply::Bytes(bytes))
    }

    /// Answer with success but an empty URI.
    pub fn empty_uri(dir: impl Into<PathBuf>) -> Self {
        Self::with_reply(dir, Reply::EmptyUri)
    }

    /// Refuse every request with `status`.
    pub fn refusing(dir: impl Into<PathBuf>, status: u32) -> Self {
        Self::with_reply(dir, Reply::Status(status))
    }

    fn with_reply(dir: impl Into<PathBuf>, reply: Reply) -> Self {
        Self {
            dir: dir.into(),
            reply,
            requests: Mutex::new(Vec::new()),
            written: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ScreenshotRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Files handed out so far.
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .map(|written| written.clone())
            .unwrap_or_default()
    }

    fn write_payload(&self, path: &Path) -> LassoResult<()> {
        match &self.reply {
            Reply::Image(image) => image
                .save_with_format(path, ImageFormat::Png)
                .map_err(|e| LassoError::capture(format!("Failed to stage payload: {e}"))),
            Reply::Bytes(bytes) => Ok(std::fs::write(path, bytes)?),
            Reply::EmptyUri | Reply::Status(_) => Ok(()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl ScreenshotService for FilePortal {
    async fn request_screenshot(
        &self,
        request: &ScreenshotRequest,
    ) -> LassoResult<PortalResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.reply {
            Reply::Status(status) => return Ok(PortalResponse::failure(status)),
            Reply::EmptyUri => return Ok(PortalResponse::success("")),
            Reply::Image(_) | Reply::Bytes(_) => {}
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.png", request.token));
        self.write_payload(&path)?;

        let uri = url::Url::from_file_path(&path).map_err(|_| {
            LassoError::capture(format!("Cannot express {} as a file URI", path.display()))
        })?;
        if let Ok(mut written) = self.written.lock() {
            written.push(path);
        }
        Ok(PortalResponse::success(uri.to_string()))
    }
}
