//! Capability detection and guidance for Linux.
//!
//! Which capabilities matter depends on the session: Wayland needs the
//! screenshot portal, X11 needs direct access to the display.

use lasso_platform_core::SessionType;

use crate::display::{detect_session_type, XcapDisplay};
use crate::portal::is_portal_available;

/// A system capability that Lasso may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
pub fn check_capabilities() -> Vec<Capability> {
    let session = detect_session_type();
    vec![
        check_session_type(session),
        check_portal_access(session),
        check_screen_enumeration(),
        check_temp_dir(),
    ]
}

fn check_session_type(session: SessionType) -> Capability {
    let available = session != SessionType::Unknown;

    Capability {
        name: "Session Type".to_string(),
        description: format!("XDG_SESSION_TYPE selects the capture path (detected: {session:?})"),
        available,
        required: false, // unknown falls back to direct capture
        fix_instructions: if available {
            None
        } else {
            Some("Run from a graphical login so XDG_SESSION_TYPE is set".to_string())
        },
    }
}

/// Check if the XDG screenshot portal is reachable.
fn check_portal_access(session: SessionType) -> Capability {
    let available = is_portal_available();

    Capability {
        name: "Screenshot Portal".to_string(),
        description: "org.freedesktop.portal.Screenshot over the session bus".to_string(),
        available,
        required: session.forbids_direct_capture(),
        fix_instructions: if available {
            None
        } else {
            Some(
                "Install xdg-desktop-portal plus a backend for your desktop \
                 (xdg-desktop-portal-gnome, -kde, -wlr, ...)"
                    .to_string(),
            )
        },
    }
}

fn check_screen_enumeration() -> Capability {
    let (available, detail) = match XcapDisplay::connect() {
        Ok(display) => {
            let count = display.screens().len();
            (count > 0, format!("{count} screen(s) reported"))
        }
        Err(e) => (false, e.to_string()),
    };

    Capability {
        name: "Screen Enumeration".to_string(),
        description: format!("Monitor layout from the windowing system ({detail})"),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Ensure DISPLAY or WAYLAND_DISPLAY points at a running session".to_string())
        },
    }
}

fn check_temp_dir() -> Capability {
    let dir = std::env::temp_dir();
    let available = std::fs::metadata(&dir)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false);

    Capability {
        name: "Temporary Directory".to_string(),
        description: format!("Saved selections are written to {}", dir.display()),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Set TMPDIR to a writable directory".to_string())
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("Lasso System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_is_required_only_on_wayland() {
        assert!(check_portal_access(SessionType::Wayland).required);
        assert!(!check_portal_access(SessionType::X11).required);
    }

    #[test]
    fn unknown_session_is_reported_with_a_fix() {
        let cap = check_session_type(SessionType::Unknown);
        assert!(!cap.available);
        assert!(cap.fix_instructions.is_some());
    }
}
