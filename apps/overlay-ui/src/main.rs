//! Lasso overlay: capture every screen, let the user circle a region, save it.
//!
//! On success the saved image path is printed on stdout and the process
//! exits with 0. Anything else (no frames, nothing selected, save failure,
//! dismissal) exits with 1.

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use lasso_capture_engine::CaptureEngine;
use lasso_common::config::LassoConfig;
use lasso_selection::BrushStyle;

mod app;
mod canvas;
mod outcome;
mod paint;

use app::LassoOverlayApp;
use outcome::Outcome;

fn main() -> ExitCode {
    match run() {
        Ok(Outcome::Saved(path)) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("lasso-overlay: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<Outcome> {
    let config = LassoConfig::from_env()?;
    lasso_common::logging::init_logging(&config.logging);

    let engine = CaptureEngine::for_current_session(&config.capture)?;
    let frames = engine.capture_all_blocking()?;
    if frames.is_empty() {
        tracing::error!(strategy = %engine.strategy(), "No frames captured");
        return Ok(Outcome::Failed);
    }

    let slot = Arc::new(Mutex::new(None));
    let app = LassoOverlayApp::new(
        frames,
        BrushStyle::from(&config.brush),
        config.output_path.clone(),
        slot.clone(),
    );

    let options = eframe::NativeOptions {
        viewport: app.root_viewport(),
        ..Default::default()
    };

    eframe::run_native("Lasso", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("overlay launch failed: {e}"))?;

    let outcome = slot
        .lock()
        .map_err(|_| anyhow::anyhow!("overlay outcome poisoned"))?
        .take()
        .unwrap_or(Outcome::Aborted);
    Ok(outcome)
}
