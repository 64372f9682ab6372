//! Lasso Linux Platform Integration
//!
//! Platform-specific implementations for Linux:
//! - **Session Detection:** which capture path the session allows
//! - **Screen Enumeration:** monitor layout and direct grabs (xcap)
//! - **XDG Desktop Portal:** one-shot screenshots via DBus
//! - **Capabilities:** environment checks and user guidance

pub mod display;
pub mod permissions;
pub mod portal;

pub use display::*;
