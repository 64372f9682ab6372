//! Check session type and capture capabilities.

use lasso_capture_engine::CaptureStrategy;
use lasso_platform_core::{virtual_desktop_bounds, SessionType};
use lasso_platform_linux::{detect_session_type, rendering_backend_hint, XcapDisplay};

pub fn run() -> anyhow::Result<()> {
    println!("Lasso System Check");
    println!("{}", "=".repeat(50));

    let session = detect_session_type();
    match session {
        SessionType::Wayland => println!("[OK] Session type: Wayland"),
        SessionType::X11 => println!("[OK] Session type: X11"),
        SessionType::Tty => println!("[WARN] Session type: tty"),
        SessionType::Unknown => println!("[WARN] Session type: unknown"),
    }

    if let Some((var, value)) = rendering_backend_hint() {
        println!("     Rendering backend forced: {var}={value} (does not affect capture)");
    }

    let strategy = CaptureStrategy::for_session(session);
    println!("[OK] Capture strategy: {strategy}");

    match XcapDisplay::connect().map(|display| display.screens()) {
        Ok(screens) => {
            println!("[OK] Screens detected: {}", screens.len());
            for screen in &screens {
                println!(
                    "     {} {}x{} at ({}, {}) (scale: {}x)",
                    screen.name,
                    screen.geometry.width,
                    screen.geometry.height,
                    screen.geometry.x,
                    screen.geometry.y,
                    screen.scale_factor
                );
            }
            if let Some(bounds) = virtual_desktop_bounds(&screens) {
                println!(
                    "     Virtual desktop: {}x{} at ({}, {})",
                    bounds.width, bounds.height, bounds.x, bounds.y
                );
            }
        }
        Err(e) => println!("[WARN] Screens: {e}"),
    }

    let capabilities = lasso_platform_linux::permissions::check_capabilities();
    println!();
    lasso_platform_linux::permissions::print_capability_report(&capabilities);

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);

    println!();
    if all_required_ok {
        println!("All required capabilities are available. Lasso is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
