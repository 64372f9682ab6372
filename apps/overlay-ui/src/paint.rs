//! Stroke and backdrop painting.

use std::time::Duration;

use eframe::egui::{self, Color32, Mesh, Pos2, Rect, Shape};
use lasso_selection::{BrushStyle, LogicalPoint, Stroke};

/// Glow passes drawn under the core line.
pub const GLOW_LAYERS: u32 = 5;

/// Radius of the translucent disc under the pointer while drawing.
pub const CURSOR_RADIUS: f32 = 28.0;

/// Time for the backdrop gradient to fade in.
pub const FADE_IN: Duration = Duration::from_millis(200);

/// Points per quadratic segment when flattening the stroke.
const CURVE_STEPS: usize = 8;

/// One glow pass: line width and white alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowLayer {
    pub width: f32,
    pub alpha: u8,
}

/// Glow passes from widest and faintest to narrowest and brightest.
pub fn glow_layers(style: &BrushStyle) -> Vec<GlowLayer> {
    let layers = GLOW_LAYERS as f64;
    (0..=GLOW_LAYERS)
        .rev()
        .map(|i| {
            let i = i as f64;
            GlowLayer {
                width: (style.size + style.glow * 2.0 * i / layers) as f32,
                alpha: (50.0 + 150.0 * (layers - i) / layers) as u8,
            }
        })
        .collect()
}

/// Backdrop gradient opacity after `elapsed`, in `[0, 1]`.
pub fn fade_progress(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / FADE_IN.as_secs_f32()).clamp(0.0, 1.0)
}

/// Alpha of the gradient's top edge at `progress`.
pub fn gradient_top_alpha(progress: f32) -> u8 {
    (128.0 * progress.clamp(0.0, 1.0)) as u8
}

/// Where a frame's pixels are drawn: one logical point per `scale` physical
/// pixels, anchored at `origin`. Stroke points map back into the image with
/// the same factor.
pub fn frame_rect(origin: Pos2, physical: (u32, u32), scale: f64) -> Rect {
    let (width, height) = physical;
    Rect::from_min_size(
        origin,
        egui::vec2((width as f64 / scale) as f32, (height as f64 / scale) as f32),
    )
}

pub fn to_screen(origin: Pos2, point: LogicalPoint) -> Pos2 {
    Pos2::new(origin.x + point.x as f32, origin.y + point.y as f32)
}

/// Top-to-bottom dark gradient over `rect`.
pub fn backdrop_gradient(rect: Rect, progress: f32) -> Shape {
    let top = Color32::from_black_alpha(gradient_top_alpha(progress));
    let bottom = Color32::TRANSPARENT;

    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), top);
    mesh.colored_vertex(rect.right_top(), top);
    mesh.colored_vertex(rect.left_bottom(), bottom);
    mesh.colored_vertex(rect.right_bottom(), bottom);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(1, 3, 2);
    Shape::mesh(mesh)
}

/// Glow passes plus the white core line.
pub fn stroke_shapes(stroke: &Stroke, origin: Pos2) -> Vec<Shape> {
    let points: Vec<Pos2> = stroke
        .flatten(CURVE_STEPS)
        .into_iter()
        .map(|p| to_screen(origin, p))
        .collect();
    if points.len() < 2 {
        return Vec::new();
    }

    let style = stroke.style();
    let mut shapes: Vec<Shape> = glow_layers(style)
        .into_iter()
        .map(|layer| {
            Shape::line(
                points.clone(),
                egui::Stroke::new(layer.width, Color32::from_white_alpha(layer.alpha)),
            )
        })
        .collect();
    shapes.push(Shape::line(
        points,
        egui::Stroke::new(style.size as f32, Color32::WHITE),
    ));
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_drawn_at_its_own_scale_not_the_viewport() {
        // 3840x2160 at scale 2 inside a 2560x1440 viewport still covers 1920x1080.
        let rect = frame_rect(Pos2::new(0.0, 0.0), (3840, 2160), 2.0);
        assert_eq!(rect, Rect::from_min_size(Pos2::ZERO, egui::vec2(1920.0, 1080.0)));

        // A point circled at (1000, 500) lands on image pixel (2000, 1000).
        let scale = 3840.0 / rect.width();
        assert_eq!((1000.0 * scale, 500.0 * scale), (2000.0, 1000.0));
    }

    #[test]
    fn frame_rect_follows_fractional_scale_and_origin() {
        let rect = frame_rect(Pos2::new(10.0, 20.0), (2400, 1500), 1.25);
        assert_eq!(rect.min, Pos2::new(10.0, 20.0));
        assert_eq!(rect.size(), egui::vec2(1920.0, 1200.0));
    }

    #[test]
    fn glow_widens_and_fades_outward() {
        let layers = glow_layers(&BrushStyle::new(5.0, 10.0, 0.35));
        assert_eq!(layers.len(), GLOW_LAYERS as usize + 1);
        assert_eq!(layers[0], GlowLayer { width: 25.0, alpha: 50 });
        assert_eq!(layers[5], GlowLayer { width: 5.0, alpha: 200 });
        for pair in layers.windows(2) {
            assert!(pair[0].width >= pair[1].width);
            assert!(pair[0].alpha <= pair[1].alpha);
        }
    }

    #[test]
    fn gradient_fades_in() {
        assert_eq!(fade_progress(Duration::ZERO), 0.0);
        assert_eq!(fade_progress(Duration::from_millis(100)), 0.5);
        assert_eq!(fade_progress(Duration::from_secs(3)), 1.0);
        assert_eq!(gradient_top_alpha(1.0), 128);
        assert_eq!(gradient_top_alpha(0.0), 0);
    }

    #[test]
    fn single_point_stroke_paints_nothing() {
        let stroke = Stroke::begin(LogicalPoint::new(1.0, 1.0), BrushStyle::default());
        assert!(stroke_shapes(&stroke, Pos2::ZERO).is_empty());
    }

    #[test]
    fn drawn_stroke_paints_glow_and_core() {
        let mut stroke = Stroke::begin(LogicalPoint::new(1.0, 1.0), BrushStyle::default());
        stroke.extend(LogicalPoint::new(20.0, 20.0));
        assert_eq!(stroke_shapes(&stroke, Pos2::ZERO).len(), GLOW_LAYERS as usize + 2);
    }
}
