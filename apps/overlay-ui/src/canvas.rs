//! One fullscreen canvas per captured frame.

use std::time::Instant;

use eframe::egui::{self, Color32, ColorImage, CursorIcon, Key, Pos2, Rect, TextureHandle};
use lasso_capture_engine::Frame;
use lasso_selection::{BrushStyle, LogicalPoint, Stroke};

use crate::paint;

/// What a canvas reports back to the overlay after handling input.
pub enum CanvasEvent {
    /// A new stroke began here; strokes on other canvases are dropped.
    Started,
    /// The pointer was released.
    Finished(Stroke),
    /// Escape, `Q`, or the window was closed.
    Dismissed,
}

/// Primary-button state for one egui frame.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub pressed: bool,
    pub released: bool,
    pub moved: bool,
    /// Pointer position relative to the canvas origin.
    pub at: Option<LogicalPoint>,
}

/// Apply one frame of pointer input to the pending stroke.
///
/// Press and release can arrive in the same frame; the stroke is then
/// started and finished at once.
pub fn advance_stroke(
    stroke: &mut Option<Stroke>,
    input: PointerInput,
    brush: BrushStyle,
) -> Option<CanvasEvent> {
    let mut started = false;
    if input.pressed {
        if let Some(point) = input.at {
            *stroke = Some(Stroke::begin(point, brush));
            started = true;
        }
    } else if input.moved {
        if let (Some(stroke), Some(point)) = (stroke.as_mut(), input.at) {
            stroke.extend(point);
        }
    }

    if input.released {
        if let Some(stroke) = stroke.take() {
            return Some(CanvasEvent::Finished(stroke));
        }
    }
    started.then_some(CanvasEvent::Started)
}

pub struct FrameCanvas {
    pub frame: Frame,
    texture: Option<TextureHandle>,
    stroke: Option<Stroke>,
    pointer: Option<Pos2>,
    shown_at: Option<Instant>,
}

impl FrameCanvas {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            texture: None,
            stroke: None,
            pointer: None,
            shown_at: None,
        }
    }

    /// Viewport covering this frame's logical geometry.
    pub fn viewport_builder(&self) -> egui::ViewportBuilder {
        let geometry = self.frame.geometry;
        egui::ViewportBuilder::default()
            .with_title(format!("Lasso - {}", self.frame.name))
            .with_position([geometry.x as f32, geometry.y as f32])
            .with_inner_size([geometry.width as f32, geometry.height as f32])
            .with_decorations(false)
            .with_always_on_top()
            .with_fullscreen(true)
    }

    pub fn clear_stroke(&mut self) {
        self.stroke = None;
    }

    /// Handle this viewport's input, then paint it.
    pub fn show(&mut self, ctx: &egui::Context, brush: BrushStyle) -> Option<CanvasEvent> {
        let event = self.handle_input(ctx, brush);
        self.paint(ctx);
        event
    }

    fn handle_input(&mut self, ctx: &egui::Context, brush: BrushStyle) -> Option<CanvasEvent> {
        let (pressed, released, latest, dismissed) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                i.key_pressed(Key::Escape)
                    || i.key_pressed(Key::Q)
                    || i.viewport().close_requested(),
            )
        });

        if dismissed {
            return Some(CanvasEvent::Dismissed);
        }

        let origin = ctx.screen_rect().min;
        let pointer = PointerInput {
            pressed,
            released,
            moved: latest.is_some() && latest != self.pointer,
            at: latest.map(|pos| {
                LogicalPoint::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
            }),
        };
        self.pointer = latest;

        advance_stroke(&mut self.stroke, pointer, brush)
    }

    fn paint(&mut self, ctx: &egui::Context) {
        ctx.set_cursor_icon(CursorIcon::Crosshair);

        let rect = ctx.screen_rect();
        let image_rect = paint::frame_rect(
            rect.min,
            self.frame.physical_size(),
            self.frame.scale_factor,
        );
        let texture = self.texture(ctx).id();
        let shown_at = *self.shown_at.get_or_insert_with(Instant::now);
        let progress = paint::fade_progress(shown_at.elapsed());

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let painter = ui.painter();
                painter.image(
                    texture,
                    image_rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
                painter.add(paint::backdrop_gradient(rect, progress));

                if let Some(stroke) = self.stroke.as_ref() {
                    painter.extend(paint::stroke_shapes(stroke, rect.min));
                    if let Some(pointer) = self.pointer {
                        painter.circle_filled(
                            pointer,
                            paint::CURSOR_RADIUS,
                            Color32::from_white_alpha(50),
                        );
                    }
                }
            });

        if progress < 1.0 || self.stroke.is_some() {
            ctx.request_repaint();
        }
    }

    fn texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let frame = &self.frame;
        self.texture.get_or_insert_with(|| {
            let (width, height) = frame.physical_size();
            let image = ColorImage::from_rgba_unmultiplied(
                [width as usize, height as usize],
                frame.image.as_raw(),
            );
            ctx.load_texture(
                format!("lasso-frame-{}", frame.index),
                image,
                egui::TextureOptions::LINEAR,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pressed: bool, released: bool, at: (f64, f64)) -> PointerInput {
        PointerInput {
            pressed,
            released,
            moved: true,
            at: Some(LogicalPoint::new(at.0, at.1)),
        }
    }

    fn brush() -> BrushStyle {
        BrushStyle::new(5.0, 10.0, 0.35)
    }

    #[test]
    fn click_in_one_frame_finishes_without_a_selection() {
        let mut stroke = None;
        let event = advance_stroke(&mut stroke, input(true, true, (40.0, 40.0)), brush());

        let Some(CanvasEvent::Finished(clicked)) = event else {
            panic!("click must finish the stroke");
        };
        assert!(stroke.is_none());
        assert!(clicked.finish().is_none());
    }

    #[test]
    fn press_drag_release_yields_bounds() {
        let mut stroke = None;
        assert!(matches!(
            advance_stroke(&mut stroke, input(true, false, (0.0, 0.0)), brush()),
            Some(CanvasEvent::Started)
        ));
        for x in [50.0, 100.0, 150.0] {
            assert!(advance_stroke(&mut stroke, input(false, false, (x, x)), brush()).is_none());
        }

        let event = advance_stroke(&mut stroke, input(false, true, (150.0, 150.0)), brush());
        let Some(CanvasEvent::Finished(done)) = event else {
            panic!("release must finish the stroke");
        };
        let bounds = done.finish().unwrap();
        assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    }

    #[test]
    fn release_without_a_stroke_is_ignored() {
        let mut stroke = None;
        assert!(advance_stroke(&mut stroke, input(false, true, (5.0, 5.0)), brush()).is_none());
    }
}
