//! Lasso Capture Engine
//!
//! Produces one [`Frame`] per connected screen, each carrying the screen's
//! pixels, its logical placement, and the physical/logical scale that
//! relates the two. Two acquisition strategies exist:
//!
//! ```text
//!                    ┌──────────────────┐
//!                    │  CaptureEngine   │
//!                    └────────┬─────────┘
//!               session type  │
//!            ┌────────────────┴───────────────┐
//!            ▼                                ▼
//!   ┌─────────────────┐             ┌───────────────────┐
//!   │ Direct          │             │ Portal            │
//!   │ grab per screen │             │ one desktop image │
//!   │ reported scale  │             │ derived scale     │
//!   └────────┬────────┘             └─────────┬─────────┘
//!            │                                │ slice per screen
//!            └───────────────┬────────────────┘
//!                            ▼
//!                 frames, sorted left to right
//! ```
//!
//! Failures never propagate out of [`CaptureEngine::capture_all`]: they are
//! logged and yield an empty list.

pub mod backend;
pub mod cancel;
pub mod direct;
pub mod engine;
pub mod frame;
pub mod portal;
pub mod strategy;

pub use backend::{FilePortal, ScreenSource, ScreenshotService, StaticScreens};
pub use cancel::CancelToken;
pub use engine::{CaptureEngine, CaptureOptions};
pub use frame::{sort_left_to_right, Frame, FrameSummary};
pub use strategy::CaptureStrategy;
