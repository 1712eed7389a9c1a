//! Core library for Inkpad — a freeform note-taking application mixing
//! rich text and ink on page canvases.
//!
//! The primary entry point is [`Note`], which owns the storage connection
//! and the currently open [`Document`]. Shells drive it through commands
//! and drain [`ChangeEvent`]s to find out what to repaint.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    color::Color,
    document::Document,
    drawing::{
        Brush, CapStyle, DrawingMode, DrawingPayload, JoinStyle, Pen, PenStyle, Stroke,
        StrokePath, MAX_PEN_WIDTH, MIN_PEN_WIDTH,
    },
    error::{InkpadError, Result},
    event::{ChangeEvent, EventQueue},
    geometry::{Point, Rect, Size},
    note::Note,
    object::{ObjectKind, ObjectType, PageObject},
    page::Page,
    render::{CompositeMode, Painter},
    storage::{DocumentSummary, Storage},
    text::{Alignment, Font, TextPayload},
};
