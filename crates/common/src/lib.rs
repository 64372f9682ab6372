//! Lasso Common Utilities
//!
//! Shared infrastructure for all Lasso crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Runtime configuration (defaults + environment overrides)

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
