//! Virtual Desktop Test Suite for Lasso
//!
//! Runs the portal capture strategy headlessly against synthetic desktops:
//! - Renders a combined desktop image per monitor arrangement
//! - Serves it through an in-memory screenshot portal
//! - Checks frame sizes, colors, ordering, derived scale and temp-file cleanup

use anyhow::Result;
use clap::Parser;
use lasso_capture_engine::Frame;
use lasso_common::config::LoggingConfig;
use std::path::{Path, PathBuf};

mod synthetic;
mod verify;

use synthetic::Preset;
use verify::TestStatus;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory for test results
    #[arg(short, long, default_value = "vdesktop_test_output")]
    output_dir: PathBuf,

    /// Presets to run (all when omitted)
    #[arg(long, value_enum)]
    preset: Vec<Preset>,

    /// Also save the combined desktop and every sliced frame as PNG
    #[arg(long)]
    keep_images: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    lasso_common::logging::init_logging(&LoggingConfig {
        level: "info,lasso_capture_engine=debug".to_string(),
        json: false,
    });

    let args = Args::parse();

    if args.output_dir.exists() {
        std::fs::remove_dir_all(&args.output_dir)?;
    }
    std::fs::create_dir_all(&args.output_dir)?;

    let presets: Vec<Preset> = if args.preset.is_empty() {
        Preset::all().to_vec()
    } else {
        args.preset.clone()
    };

    tracing::info!("Starting Virtual Desktop Test Suite ({} presets)", presets.len());

    let mut reports = Vec::with_capacity(presets.len());
    for preset in presets {
        let work_dir = args.output_dir.join("portal").join(preset.name());
        let (report, frames) = verify::verify_preset(preset, &work_dir).await?;
        tracing::info!(
            preset = preset.name(),
            status = ?report.status,
            frames = frames.len(),
            "Preset finished"
        );

        if args.keep_images {
            save_images(&args.output_dir.join("images").join(preset.name()), preset, &frames)?;
        }
        reports.push(report);
    }

    let report = verify::generate_report(&args.output_dir.join("test_report.json"), reports)?;
    if report.overall_status != TestStatus::Pass {
        anyhow::bail!("Test suite failed with status: {:?}", report.overall_status);
    }

    tracing::info!("Test suite completed successfully!");
    Ok(())
}

fn save_images(dir: &Path, preset: Preset, frames: &[Frame]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    synthetic::render_desktop(preset.layout())
        .image
        .save(dir.join("desktop.png"))?;
    for frame in frames {
        frame.image.save(dir.join(format!("frame-{}-{}.png", frame.index, frame.name)))?;
    }
    tracing::info!("Images written to: {}", dir.display());
    Ok(())
}
