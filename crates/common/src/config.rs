//! Runtime configuration.
//!
//! Lasso keeps no configuration on disk. A [`LassoConfig`] starts from
//! defaults, then picks up environment overrides; binaries apply their
//! command-line flags on top.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the saved image path.
pub const ENV_OUTPUT: &str = "LASSO_OUTPUT";
/// Environment variable overriding the portal watchdog, in seconds (`0` = unbounded).
pub const ENV_PORTAL_TIMEOUT: &str = "LASSO_PORTAL_TIMEOUT_SECS";
/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "LASSO_LOG";

/// File name of the single saved selection.
pub const OUTPUT_FILE_NAME: &str = "lasso_capture.png";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LassoConfig {
    /// Where the cropped selection is written.
    pub output_path: PathBuf,

    /// Screen acquisition settings.
    pub capture: CaptureSettings,

    /// Stroke appearance used by the overlay.
    pub brush: BrushSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Screen acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Ask the screenshot portal for its interactive dialog.
    pub interactive: bool,

    /// Watchdog for the portal response. `0` waits forever.
    pub portal_timeout_secs: u64,
}

/// Freehand brush parameters, in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushSettings {
    /// Core line width.
    pub size: f64,

    /// Extra width of the outermost glow layer.
    pub glow: f64,

    /// Pointer smoothing factor in `(0.0, 1.0]`; `1.0` disables smoothing.
    pub smoothing: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lasso_capture_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LassoConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            capture: CaptureSettings::default(),
            brush: BrushSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            interactive: false,
            portal_timeout_secs: 60,
        }
    }
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 5.0,
            glow: 10.0,
            smoothing: 0.35,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl CaptureSettings {
    /// Portal watchdog as a duration, `None` when unbounded.
    pub fn portal_timeout(&self) -> Option<Duration> {
        (self.portal_timeout_secs > 0).then(|| Duration::from_secs(self.portal_timeout_secs))
    }
}

impl LassoConfig {
    /// Defaults with `LASSO_*` environment overrides applied.
    pub fn from_env() -> crate::LassoResult<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::LassoResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_OUTPUT).filter(|v| !v.trim().is_empty()) {
            self.output_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_PORTAL_TIMEOUT) {
            self.capture.portal_timeout_secs = parse_timeout_secs(&raw)?;
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
        Ok(())
    }
}

/// Parse a watchdog value in whole seconds.
pub fn parse_timeout_secs(raw: &str) -> crate::LassoResult<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        crate::LassoError::config(format!(
            "{ENV_PORTAL_TIMEOUT} must be a whole number of seconds, got {raw:?}: {e}"
        ))
    })
}

/// Fixed location of the saved selection.
pub fn default_output_path() -> PathBuf {
    std::env::temp_dir().join(OUTPUT_FILE_NAME)
}
