//! Synthetic virtual desktops

use clap::ValueEnum;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use lasso_platform_core::{virtual_desktop_bounds, LogicalRect, ScreenInfo};
use serde::{Deserialize, Serialize};

const BACKGROUND: Rgba<u8> = Rgba([20, 20, 24, 255]);
const MARKER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Distinct fill per screen, in enumeration order.
const PALETTE: [Rgba<u8>; 4] = [
    Rgba([220, 60, 60, 255]),
    Rgba([60, 180, 90, 255]),
    Rgba([60, 100, 220, 255]),
    Rgba([230, 200, 60, 255]),
];

/// Monitor arrangements exercised by the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// One 1080p screen.
    Single,
    /// Two 1080p screens in a row, enumerated right first.
    SideBySide,
    /// A 1080p screen left of the origin next to a 1440p screen.
    NegativeOrigin,
    /// Two screens backed at twice their logical size.
    Hidpi,
    /// Two 1080p screens on top of each other.
    Stacked,
    /// Backed at 2x, but the screens report 1x and 2x.
    MixedMisreported,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[
            Preset::Single,
            Preset::SideBySide,
            Preset::NegativeOrigin,
            Preset::Hidpi,
            Preset::Stacked,
            Preset::MixedMisreported,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Single => "single",
            Preset::SideBySide => "side-by-side",
            Preset::NegativeOrigin => "negative-origin",
            Preset::Hidpi => "hidpi",
            Preset::Stacked => "stacked",
            Preset::MixedMisreported => "mixed-misreported",
        }
    }

    pub fn layout(&self) -> Layout {
        let screen = |name: &str, x, y, w, h, scale| {
            ScreenInfo::new(name, LogicalRect::new(x, y, w, h), scale)
        };

        match self {
            Preset::Single => Layout {
                screens: vec![screen("HDMI-1", 0, 0, 1920, 1080, 1.0)],
                backing_scale: 1.0,
            },
            Preset::SideBySide => Layout {
                screens: vec![
                    screen("DP-2", 1920, 0, 1920, 1080, 1.0),
                    screen("DP-1", 0, 0, 1920, 1080, 1.0),
                ],
                backing_scale: 1.0,
            },
            Preset::NegativeOrigin => Layout {
                screens: vec![
                    screen("eDP-1", 0, 0, 2560, 1440, 1.0),
                    screen("HDMI-1", -1920, 0, 1920, 1080, 1.0),
                ],
                backing_scale: 1.0,
            },
            Preset::Hidpi => Layout {
                screens: vec![
                    screen("eDP-1", 0, 0, 1280, 800, 2.0),
                    screen("DP-1", 1280, 0, 1280, 800, 2.0),
                ],
                backing_scale: 2.0,
            },
            Preset::Stacked => Layout {
                screens: vec![
                    screen("top", 0, 0, 1920, 1080, 1.0),
                    screen("bottom", 0, 1080, 1920, 1080, 1.0),
                ],
                backing_scale: 1.0,
            },
            Preset::MixedMisreported => Layout {
                screens: vec![
                    screen("eDP-1", 0, 0, 1440, 900, 1.0),
                    screen("DP-1", 1440, 0, 1440, 900, 2.0),
                ],
                backing_scale: 2.0,
            },
        }
    }
}

/// Screens plus the compositor's true physical/logical ratio.
#[derive(Debug, Clone)]
pub struct Layout {
    pub screens: Vec<ScreenInfo>,
    pub backing_scale: f64,
}

/// A rendered combined desktop image and what each screen should look like.
#[derive(Debug, Clone)]
pub struct SyntheticDesktop {
    pub layout: Layout,
    pub image: RgbaImage,
    pub colors: Vec<Rgba<u8>>,
}

impl SyntheticDesktop {
    /// Fill color expected at the center of `screen`'s frame.
    pub fn color_of(&self, name: &str) -> Option<Rgba<u8>> {
        self.layout
            .screens
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.colors[i])
    }

    /// Physical size `screen` should come out at.
    pub fn expected_size(&self, screen: &ScreenInfo) -> (u32, u32) {
        let scale = self.layout.backing_scale;
        (
            (screen.geometry.width as f64 * scale).round() as u32,
            (screen.geometry.height as f64 * scale).round() as u32,
        )
    }
}

/// Render the combined image a screenshot portal would return for `layout`.
pub fn render_desktop(layout: Layout) -> SyntheticDesktop {
    let bounds = virtual_desktop_bounds(&layout.screens).unwrap_or(LogicalRect::new(0, 0, 1, 1));
    let scale = layout.backing_scale;
    let width = (bounds.width as f64 * scale).round() as u32;
    let height = (bounds.height as f64 * scale).round() as u32;

    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);
    let mut colors = Vec::with_capacity(layout.screens.len());

    for (i, screen) in layout.screens.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        colors.push(color);

        let x = ((screen.geometry.x - bounds.x) as f64 * scale).round() as i32;
        let y = ((screen.geometry.y - bounds.y) as f64 * scale).round() as i32;
        let w = (screen.geometry.width as f64 * scale).round() as u32;
        let h = (screen.geometry.height as f64 * scale).round() as u32;
        if w == 0 || h == 0 {
            continue;
        }
        draw_filled_rect_mut(&mut image, Rect::at(x, y).of_size(w, h), color);

        // Corner markers show misplaced slices when frames are inspected.
        let radius = (w.min(h) / 40).max(2) as i32;
        let inset = radius * 2;
        for (cx, cy) in [
            (x + inset, y + inset),
            (x + w as i32 - inset, y + inset),
            (x + inset, y + h as i32 - inset),
            (x + w as i32 - inset, y + h as i32 - inset),
        ] {
            draw_filled_circle_mut(&mut image, (cx, cy), radius, MARKER);
        }
    }

    SyntheticDesktop {
        layout,
        image,
        colors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_image_matches_backing_scale() {
        let desktop = render_desktop(Preset::Hidpi.layout());
        assert_eq!(desktop.image.dimensions(), (5120, 1600));

        let desktop = render_desktop(Preset::NegativeOrigin.layout());
        assert_eq!(desktop.image.dimensions(), (4480, 1440));
    }

    #[test]
    fn screens_are_filled_with_their_color() {
        let desktop = render_desktop(Preset::NegativeOrigin.layout());
        // HDMI-1 sits at the left edge of the combined image.
        assert_eq!(
            Some(*desktop.image.get_pixel(960, 540)),
            desktop.color_of("HDMI-1")
        );
        assert_eq!(
            Some(*desktop.image.get_pixel(1920 + 1280, 720)),
            desktop.color_of("eDP-1")
        );
        // Below the shorter screen nothing is drawn.
        assert_eq!(*desktop.image.get_pixel(960, 1300), BACKGROUND);
    }

    #[test]
    fn every_preset_has_screens() {
        for preset in Preset::all() {
            assert!(!preset.layout().screens.is_empty(), "{}", preset.name());
        }
    }
}
