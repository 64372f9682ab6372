//! Acquisition strategy selection.

use std::fmt;

use lasso_platform_core::SessionType;
use serde::{Deserialize, Serialize};

/// How screen pixels are acquired for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStrategy {
    /// Synchronous in-process grab, one per screen.
    Direct,
    /// One combined desktop image from the screenshot portal, sliced per screen.
    Portal,
}

impl CaptureStrategy {
    /// Pick the strategy from the session type.
    ///
    /// Only the session type decides; unknown sessions use direct capture.
    pub fn for_session(session: SessionType) -> Self {
        if session.forbids_direct_capture() {
            CaptureStrategy::Portal
        } else {
            CaptureStrategy::Direct
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStrategy::Direct => "direct",
            CaptureStrategy::Portal => "portal",
        }
    }
}

impl fmt::Display for CaptureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
