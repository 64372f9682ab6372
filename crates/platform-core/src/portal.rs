//! Screenshot portal request/response contract.
//!
//! The desktop screenshot service is consumed as a black box: one request
//! carrying a unique token, one completion carrying a status code and, on
//! success, the URI of a temporary image file.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Completion status: the request succeeded.
pub const RESPONSE_SUCCESS: u32 = 0;
/// Completion status: the user cancelled the interaction.
pub const RESPONSE_CANCELLED: u32 = 1;
/// Completion status: the interaction ended some other way.
pub const RESPONSE_OTHER: u32 = 2;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Parameters for one screenshot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotRequest {
    /// Unique per request; restricted to `[A-Za-z0-9_]` so it is a valid
    /// object-path element.
    pub token: String,

    /// Whether the portal may show its own dialog.
    pub interactive: bool,
}

impl ScreenshotRequest {
    /// A request with a freshly generated token.
    pub fn new(interactive: bool) -> Self {
        Self {
            token: fresh_token(),
            interactive,
        }
    }
}

/// Completion of a screenshot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalResponse {
    pub status: u32,
    pub uri: Option<String>,
}

impl PortalResponse {
    pub fn success(uri: impl Into<String>) -> Self {
        Self {
            status: RESPONSE_SUCCESS,
            uri: Some(uri.into()),
        }
    }

    pub fn failure(status: u32) -> Self {
        Self { status, uri: None }
    }

    /// The URI when the status is success and the URI is non-empty.
    pub fn saved_uri(&self) -> Option<&str> {
        if self.status != RESPONSE_SUCCESS {
            return None;
        }
        self.uri.as_deref().filter(|uri| !uri.trim().is_empty())
    }
}

fn fresh_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let sequence = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("lasso_{}_{:x}_{}", std::process::id(), nanos, sequence)
}
