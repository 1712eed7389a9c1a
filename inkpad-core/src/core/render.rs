//! The painting seam between the core and the canvas widget.
//!
//! The core decides *what* to draw and in which order; the shell implements
//! [`Painter`] on top of whatever graphics stack it uses. Tests drive the
//! same contract through a recording implementation.

use crate::core::color::Color;
use crate::core::drawing::{Brush, Pen};
use crate::core::geometry::{Point, Rect};

/// Pixel compositing rule for ink strokes.
///
/// Integer codes are fixed by the stored format: highlighter strokes darken
/// where they overlap, eraser strokes punch transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    #[default]
    Normal = 0,
    Multiply = 1,
    Clear = 2,
}

/// Drawing surface implemented by the canvas widget.
///
/// Implementations must treat `set_clip(None)` and
/// `set_composite(CompositeMode::Normal)` as restoring their default state;
/// the core always restores both after any object that changes them.
pub trait Painter {
    fn set_clip(&mut self, clip: Option<Rect>);
    fn set_composite(&mut self, mode: CompositeMode);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_rect_outline(&mut self, rect: Rect, pen: &Pen);
    fn draw_path(&mut self, points: &[Point], pen: &Pen, brush: &Brush);
    /// Draws laid-out rich text (HTML produced by the core) inside `rect`.
    fn draw_text(&mut self, rect: Rect, html: &str, color: Color);
}

/// One recorded [`Painter`] call.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PaintOp {
    SetClip(Option<Rect>),
    SetComposite(CompositeMode),
    FillRect(Rect, Color),
    RectOutline(Rect),
    Path { points: usize, composite: CompositeMode },
    Text(Rect, String),
}

/// Painter that records the calls it receives, for asserting paint order
/// and composite-mode discipline in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub ops: Vec<PaintOp>,
    composite: CompositeMode,
}

#[cfg(test)]
impl Painter for RecordingPainter {
    fn set_clip(&mut self, clip: Option<Rect>) {
        self.ops.push(PaintOp::SetClip(clip));
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.composite = mode;
        self.ops.push(PaintOp::SetComposite(mode));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(PaintOp::FillRect(rect, color));
    }

    fn draw_rect_outline(&mut self, rect: Rect, _pen: &Pen) {
        self.ops.push(PaintOp::RectOutline(rect));
    }

    fn draw_path(&mut self, points: &[Point], _pen: &Pen, _brush: &Brush) {
        self.ops.push(PaintOp::Path {
            points: points.len(),
            composite: self.composite,
        });
    }

    fn draw_text(&mut self, rect: Rect, html: &str, _color: Color) {
        self.ops.push(PaintOp::Text(rect, html.to_string()));
    }
}
