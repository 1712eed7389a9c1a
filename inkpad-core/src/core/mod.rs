//! Internal domain modules for the Inkpad core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod color;
pub mod document;
pub mod drawing;
pub mod error;
pub mod event;
pub mod geometry;
pub mod note;
pub mod object;
pub mod page;
pub mod render;
pub mod storage;
pub mod text;

#[doc(inline)]
pub use color::Color;
#[doc(inline)]
pub use document::Document;
#[doc(inline)]
pub use drawing::{
    Brush, CapStyle, DrawingMode, DrawingPayload, JoinStyle, Pen, PenStyle, Stroke, StrokePath,
    MAX_PEN_WIDTH, MIN_PEN_WIDTH,
};
#[doc(inline)]
pub use error::{InkpadError, Result};
#[doc(inline)]
pub use event::{ChangeEvent, EventQueue};
#[doc(inline)]
pub use geometry::{Point, Rect, Size};
#[doc(inline)]
pub use note::Note;
#[doc(inline)]
pub use object::{ObjectKind, ObjectType, PageObject};
#[doc(inline)]
pub use page::Page;
#[doc(inline)]
pub use render::{CompositeMode, Painter};
#[doc(inline)]
pub use storage::{DocumentSummary, Storage};
#[doc(inline)]
pub use text::{Alignment, Font, TextPayload};
