//! Portal-strategy verification against synthetic desktops

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use lasso_capture_engine::portal::capture_via_portal;
use lasso_capture_engine::{CaptureOptions, FilePortal, Frame, StaticScreens};
use serde::{Deserialize, Serialize};

use crate::synthetic::{render_desktop, Preset, SyntheticDesktop};

/// Allowed deviation of a frame's size from the expected size, in pixels.
const SIZE_TOLERANCE_PX: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct TestReport {
    pub presets: Vec<PresetReport>,
    pub overall_status: TestStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PresetReport {
    pub preset: Preset,
    pub expected_scale: f64,
    pub frames: Vec<FrameCheck>,
    pub ordered_left_to_right: bool,
    pub temp_files_removed: bool,
    pub failures: Vec<String>,
    pub status: TestStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FrameCheck {
    pub name: String,
    pub index: usize,
    pub scale_factor: f64,
    pub expected_size: (u32, u32),
    pub actual_size: (u32, u32),
    pub center_color_ok: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TestStatus {
    Pass,
    Fail,
}

/// Run the portal strategy over one preset's synthetic desktop.
///
/// `work_dir` receives the portal's temporary file and must end up empty.
pub async fn verify_preset(preset: Preset, work_dir: &Path) -> Result<(PresetReport, Vec<Frame>)> {
    tracing::info!(preset = preset.name(), "Verifying preset");

    let desktop = render_desktop(preset.layout());
    let screens = StaticScreens::new(desktop.layout.screens.clone());
    let portal = FilePortal::serving(work_dir, desktop.image.clone());
    let options = CaptureOptions {
        interactive: false,
        timeout: Some(Duration::from_secs(10)),
        ..Default::default()
    };

    let mut failures = Vec::new();
    let frames = match capture_via_portal(&screens, &portal, &options).await {
        Ok(frames) => frames,
        Err(e) => {
            failures.push(format!("capture failed: {e}"));
            Vec::new()
        }
    };

    let written = portal.written_files();
    let temp_files_removed = !written.is_empty() && written.iter().all(|path| !path.exists());
    if !temp_files_removed {
        failures.push(format!("portal files not cleaned up: {written:?}"));
    }
    if portal.requests().iter().any(|request| request.interactive) {
        failures.push("request asked for the interactive dialog".to_string());
    }

    let checks = check_frames(&desktop, &frames, &mut failures);
    let ordered_left_to_right = is_ordered(&frames);
    if !ordered_left_to_right {
        failures.push("frames are not ordered left to right".to_string());
    }

    let status = if failures.is_empty() {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    };
    for failure in &failures {
        tracing::warn!(preset = preset.name(), "{failure}");
    }

    let report = PresetReport {
        preset,
        expected_scale: desktop.layout.backing_scale,
        frames: checks,
        ordered_left_to_right,
        temp_files_removed,
        failures,
        status,
    };
    Ok((report, frames))
}

fn check_frames(
    desktop: &SyntheticDesktop,
    frames: &[Frame],
    failures: &mut Vec<String>,
) -> Vec<FrameCheck> {
    let expected_count = desktop.layout.screens.len();
    if frames.len() != expected_count {
        failures.push(format!(
            "expected {expected_count} frames, got {}",
            frames.len()
        ));
    }

    let mut checks = Vec::with_capacity(frames.len());
    for frame in frames {
        let Some(screen) = desktop.layout.screens.iter().find(|s| s.name == frame.name) else {
            failures.push(format!("unexpected frame {}", frame.name));
            continue;
        };

        let expected_size = desktop.expected_size(screen);
        let actual_size = frame.physical_size();
        let within = |a: u32, b: u32| (a as i64 - b as i64).abs() <= SIZE_TOLERANCE_PX;
        if !within(actual_size.0, expected_size.0) || !within(actual_size.1, expected_size.1) {
            failures.push(format!(
                "{}: size {actual_size:?}, expected {expected_size:?}",
                frame.name
            ));
        }

        if (frame.scale_factor - desktop.layout.backing_scale).abs() > 1e-9 {
            failures.push(format!(
                "{}: scale {}, expected {}",
                frame.name, frame.scale_factor, desktop.layout.backing_scale
            ));
        }

        let center = frame
            .image
            .get_pixel_checked(actual_size.0 / 2, actual_size.1 / 2)
            .copied();
        let center_color_ok = center.is_some() && center == desktop.color_of(&frame.name);
        if !center_color_ok {
            failures.push(format!("{}: center pixel {center:?} has the wrong color", frame.name));
        }

        checks.push(FrameCheck {
            name: frame.name.clone(),
            index: frame.index,
            scale_factor: frame.scale_factor,
            expected_size,
            actual_size,
            center_color_ok,
        });
    }
    checks
}

fn is_ordered(frames: &[Frame]) -> bool {
    frames
        .iter()
        .enumerate()
        .all(|(position, frame)| frame.index == position)
        && frames
            .windows(2)
            .all(|pair| pair[0].geometry.x <= pair[1].geometry.x)
}

/// Write the report and fail when any preset failed.
pub fn generate_report(report_path: &Path, presets: Vec<PresetReport>) -> Result<TestReport> {
    tracing::info!("Generating test report...");

    let overall_status = if presets.iter().all(|p| p.status == TestStatus::Pass) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    };
    let report = TestReport {
        presets,
        overall_status,
    };

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(report_path, json)?;

    tracing::info!("Test report written to: {}", report_path.display());
    tracing::info!("Overall status: {:?}", report.overall_status);
    Ok(report)
}
