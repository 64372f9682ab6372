//! Lasso CLI: inspect capture support, dump frames, crop selections.
//!
//! Usage:
//!   lasso check                                   Check session and capabilities
//!   lasso frames [-o DIR]                         Capture every screen to PNG files
//!   lasso crop <IMAGE> --scale S --bounds A,B,C,D Crop a saved frame by logical bounds
//!
//! Logs go to stderr; stdout carries only results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lasso_common::config::LassoConfig;
use lasso_selection::StrokeBounds;

mod commands;

#[derive(Parser)]
#[command(
    name = "lasso",
    about = "Multi-monitor capture and freehand selection cropping",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check session type, strategy, screens and capabilities
    Check,

    /// Capture every screen and write one PNG per frame plus frames.json
    Frames {
        /// Output directory
        #[arg(short, long, default_value = "lasso-frames")]
        output: PathBuf,

        /// Let the screenshot portal show its dialog
        #[arg(long)]
        interactive: bool,

        /// Seconds to wait for the portal (0 waits forever)
        #[arg(long)]
        portal_timeout: Option<u64>,
    },

    /// Crop a saved frame by logical selection bounds
    Crop {
        /// Frame image (physical pixels)
        image: PathBuf,

        /// Physical pixels per logical pixel for this frame
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Logical bounds as MINX,MINY,MAXX,MAXY
        #[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
        bounds: StrokeBounds,

        /// Output file (defaults to the configured output path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_bounds(raw: &str) -> Result<StrokeBounds, String> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("bounds must be numbers: {e}"))?;

    match values.as_slice() {
        [min_x, min_y, max_x, max_y] => {
            Ok(StrokeBounds::from_edges(*min_x, *min_y, *max_x, *max_y))
        }
        _ => Err(format!(
            "expected MINX,MINY,MAXX,MAXY, got {} value(s)",
            values.len()
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = LassoConfig::from_env()?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config.logging.json = cli.json_logs;
    lasso_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Check => commands::check::run(),
        Commands::Frames {
            output,
            interactive,
            portal_timeout,
        } => {
            config.capture.interactive |= interactive;
            if let Some(secs) = portal_timeout {
                config.capture.portal_timeout_secs = secs;
            }
            commands::frames::run(output, &config).await
        }
        Commands::Crop {
            image,
            scale,
            bounds,
            output,
        } => {
            let output = output.unwrap_or_else(|| config.output_path.clone());
            commands::crop::run(image, scale, bounds, output)
        }
    }
}
