//! Capture every screen and dump the frames.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lasso_capture_engine::{CaptureEngine, CaptureStrategy, Frame, FrameSummary};
use lasso_common::config::LassoConfig;
use lasso_selection::save_png;
use serde::Serialize;

/// Written next to the frame images as `frames.json`.
#[derive(Debug, Serialize)]
struct FramesManifest {
    captured_at: DateTime<Utc>,
    strategy: CaptureStrategy,
    frames: Vec<FrameEntry>,
}

#[derive(Debug, Serialize)]
struct FrameEntry {
    file: String,
    #[serde(flatten)]
    summary: FrameSummary,
}

pub async fn run(output: PathBuf, config: &LassoConfig) -> anyhow::Result<()> {
    let engine = CaptureEngine::for_current_session(&config.capture)?;

    let cancel = engine.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; cancelling capture");
            cancel.cancel();
        }
    });

    let captured_at = Utc::now();
    let frames = engine.capture_all().await;
    if frames.is_empty() {
        anyhow::bail!("No frames captured");
    }

    let manifest = write_frames(&output, &frames, engine.strategy(), captured_at)?;
    println!("{}", manifest.display());
    Ok(())
}

fn write_frames(
    dir: &Path,
    frames: &[Frame],
    strategy: CaptureStrategy,
    captured_at: DateTime<Utc>,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut entries = Vec::with_capacity(frames.len());
    for frame in frames {
        let file = format!("frame-{}.png", frame.index);
        save_png(&frame.image, &dir.join(&file))?;
        entries.push(FrameEntry {
            file,
            summary: frame.summary(),
        });
    }

    let manifest = FramesManifest {
        captured_at,
        strategy,
        frames: entries,
    };
    let path = dir.join("frames.json");
    std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    tracing::info!(path = %path.display(), frames = frames.len(), "Wrote frame manifest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use lasso_platform_core::LogicalRect;

    #[test]
    fn manifest_lists_every_frame() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("frames");
        let frames = vec![Frame {
            image: RgbaImage::new(4, 2),
            geometry: LogicalRect::new(-2, 0, 2, 1),
            scale_factor: 2.0,
            name: "DP-1".to_string(),
            index: 0,
        }];

        let path = write_frames(&dir, &frames, CaptureStrategy::Portal, Utc::now()).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(manifest["strategy"], "portal");
        assert_eq!(manifest["frames"][0]["file"], "frame-0.png");
        assert_eq!(manifest["frames"][0]["physical_width"], 4);
        assert_eq!(manifest["frames"][0]["geometry"]["x"], -2);
        assert!(dir.join("frame-0.png").exists());
    }
}
