//! Freehand stroke accumulation in logical coordinates.
//!
//! A [`Stroke`] lives from pointer press to pointer release. Pointer samples
//! are smoothed with an exponential moving average and joined with
//! quadratic segments through the midpoints, which keeps the ink free of
//! the jitter of raw pointer motion. The stroke's [`StrokeBounds`] grow with
//! every smoothed point, widened by the visible ink radius so the crop never
//! clips the glow.

use lasso_common::config::BrushSettings;
use serde::{Deserialize, Serialize};

/// A point in a frame's logical coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: LogicalPoint, t: f64) -> LogicalPoint {
        LogicalPoint {
            x: self.x * (1.0 - t) + other.x * t,
            y: self.y * (1.0 - t) + other.y * t,
        }
    }

    fn midpoint(self, other: LogicalPoint) -> LogicalPoint {
        self.lerp(other, 0.5)
    }
}

/// Brush parameters that shape both the painted ink and the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushStyle {
    /// Core line width.
    pub size: f64,
    /// Extra width of the outermost glow layer.
    pub glow: f64,
    /// Weight of the newest pointer sample, in `(0.0, 1.0]`.
    pub smoothing: f64,
}

impl BrushStyle {
    pub fn new(size: f64, glow: f64, smoothing: f64) -> Self {
        let smoothing = if smoothing.is_finite() && smoothing > 0.0 {
            smoothing.min(1.0)
        } else {
            1.0
        };
        Self {
            size: size.max(0.0),
            glow: glow.max(0.0),
            smoothing,
        }
    }

    /// How far visible ink extends from the stroke's centerline.
    pub fn ink_radius(&self) -> f64 {
        self.size / 2.0 + self.glow / 2.0
    }
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self::from(&BrushSettings::default())
    }
}

impl From<&BrushSettings> for BrushStyle {
    fn from(settings: &BrushSettings) -> Self {
        Self::new(settings.size, settings.glow, settings.smoothing)
    }
}

/// Axis-aligned box around a stroke's ink, in logical coordinates.
///
/// Starts inverted (min above max) so the first included point defines it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl StrokeBounds {
    /// Bounds containing nothing.
    pub fn reset() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Bounds from explicit edges, e.g. when replaying a saved selection.
    pub fn from_edges(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Grow to cover a disc of `radius` around `point`.
    pub fn include(&mut self, point: LogicalPoint, radius: f64) {
        self.min_x = self.min_x.min(point.x - radius);
        self.min_y = self.min_y.min(point.y - radius);
        self.max_x = self.max_x.max(point.x + radius);
        self.max_y = self.max_y.max(point.y + radius);
    }

    pub fn is_empty(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }

    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }
}

impl Default for StrokeBounds {
    fn default() -> Self {
        Self::reset()
    }
}

/// One piece of the stroke's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(LogicalPoint),
    QuadTo {
        ctrl: LogicalPoint,
        to: LogicalPoint,
    },
    LineTo(LogicalPoint),
}

/// Accumulates one freehand stroke.
#[derive(Debug, Clone)]
pub struct Stroke {
    style: BrushStyle,
    smoothed: LogicalPoint,
    segments: Vec<PathSegment>,
    bounds: StrokeBounds,
    moved: bool,
}

impl Stroke {
    /// Start a stroke at the press position.
    pub fn begin(start: LogicalPoint, style: BrushStyle) -> Self {
        let mut bounds = StrokeBounds::reset();
        bounds.include(start, style.ink_radius());
        Self {
            style,
            smoothed: start,
            segments: vec![PathSegment::MoveTo(start)],
            bounds,
            moved: false,
        }
    }

    /// Feed a pointer sample.
    pub fn extend(&mut self, pointer: LogicalPoint) {
        let next = self.smoothed.lerp(pointer, self.style.smoothing);
        self.segments.push(PathSegment::QuadTo {
            ctrl: self.smoothed,
            to: self.smoothed.midpoint(next),
        });
        self.smoothed = next;
        self.bounds.include(next, self.style.ink_radius());
        self.moved = true;
    }

    pub fn style(&self) -> &BrushStyle {
        &self.style
    }

    pub fn bounds(&self) -> StrokeBounds {
        self.bounds
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Last smoothed position.
    pub fn head(&self) -> LogicalPoint {
        self.smoothed
    }

    /// Polyline approximation, `steps` points per quadratic segment.
    pub fn flatten(&self, steps: usize) -> Vec<LogicalPoint> {
        let steps = steps.max(1);
        let mut points = Vec::with_capacity(self.segments.len() * steps + 1);
        let mut cursor = self.smoothed;

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    points.push(p);
                    cursor = p;
                }
                PathSegment::QuadTo { ctrl, to } => {
                    for step in 1..=steps {
                        let t = step as f64 / steps as f64;
                        let a = cursor.lerp(ctrl, t);
                        let b = ctrl.lerp(to, t);
                        points.push(a.lerp(b, t));
                    }
                    cursor = to;
                }
                PathSegment::LineTo(p) => {
                    points.push(p);
                    cursor = p;
                }
            }
        }
        points
    }

    /// Close the stroke at release.
    ///
    /// Returns the final bounds, or `None` when the pointer never moved
    /// between press and release.
    pub fn finish(mut self) -> Option<StrokeBounds> {
        self.segments.push(PathSegment::LineTo(self.smoothed));
        if !self.moved {
            tracing::debug!("Stroke released without movement");
            return None;
        }
        Some(self.bounds)
    }
}
