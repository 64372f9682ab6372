//! The overlay application: one viewport per frame, one stroke at a time.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use eframe::egui;
use lasso_capture_engine::Frame;
use lasso_selection::BrushStyle;

use crate::canvas::{CanvasEvent, FrameCanvas};
use crate::outcome::{finish_selection, Outcome};

/// Where the session's outcome is handed back to `main`.
pub type OutcomeSlot = Arc<Mutex<Option<Outcome>>>;

pub struct LassoOverlayApp {
    canvases: Vec<FrameCanvas>,
    brush: BrushStyle,
    output_path: PathBuf,
    outcome: OutcomeSlot,
}

impl LassoOverlayApp {
    pub fn new(
        frames: Vec<Frame>,
        brush: BrushStyle,
        output_path: PathBuf,
        outcome: OutcomeSlot,
    ) -> Self {
        Self {
            canvases: frames.into_iter().map(FrameCanvas::new).collect(),
            brush,
            output_path,
            outcome,
        }
    }

    /// Viewport for the first frame; the others are opened from `update`.
    pub fn root_viewport(&self) -> egui::ViewportBuilder {
        self.canvases
            .first()
            .map(FrameCanvas::viewport_builder)
            .unwrap_or_default()
    }

    fn decided(&self) -> bool {
        self.outcome
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(true)
    }

    fn decide(&self, outcome: Outcome) {
        tracing::info!(?outcome, "Overlay finished");
        if let Ok(mut slot) = self.outcome.lock() {
            slot.get_or_insert(outcome);
        }
    }

    fn on_event(&mut self, source: usize, event: CanvasEvent) {
        match event {
            CanvasEvent::Started => {
                for (position, canvas) in self.canvases.iter_mut().enumerate() {
                    if position != source {
                        canvas.clear_stroke();
                    }
                }
            }
            CanvasEvent::Finished(stroke) => {
                let frame = &self.canvases[source].frame;
                let outcome = finish_selection(frame, stroke, &self.output_path);
                self.decide(outcome);
            }
            CanvasEvent::Dismissed => self.decide(Outcome::Aborted),
        }
    }
}

impl eframe::App for LassoOverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.decided() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let brush = self.brush;
        let mut events = Vec::new();

        if self.canvases.is_empty() {
            self.decide(Outcome::Failed);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        let Some((root, others)) = self.canvases.split_first_mut() else {
            return;
        };

        if let Some(event) = root.show(ctx, brush) {
            events.push((0, event));
        }

        for (offset, canvas) in others.iter_mut().enumerate() {
            let position = offset + 1;
            let builder = canvas.viewport_builder();
            let id = egui::ViewportId::from_hash_of(("lasso-frame", position));
            let event =
                ctx.show_viewport_immediate(id, builder, |ctx, _class| canvas.show(ctx, brush));
            if let Some(event) = event {
                events.push((position, event));
            }
        }

        for (source, event) in events {
            self.on_event(source, event);
        }

        if self.decided() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}
