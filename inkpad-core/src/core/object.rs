//! Objects that can be placed, moved, resized, and layered on a page.
//!
//! The object model is a closed tagged variant rather than a class
//! hierarchy: every object carries the same base attributes (id, bounds,
//! layer, visibility, selection) plus a kind-specific payload. Dispatch for
//! painting, serialization, and cloning is a `match` over the kind, so there
//! is no way to end up with a declared-but-unimplemented subtype at runtime
//! — the reserved Image and PDF type codes exist only in the wire format.

use crate::core::color::Color;
use crate::core::drawing::{DrawingMode, DrawingPayload, Pen, PenStyle};
use crate::core::geometry::{Point, Rect, Size};
use crate::core::render::{CompositeMode, Painter};
use crate::core::text::TextPayload;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Side length of the square resize handles drawn on selected objects.
const HANDLE_SIZE: i32 = 8;

/// Integer type tags fixed by the stored JSON format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Text = 0,
    Drawing = 1,
    /// Reserved; pages containing image objects load with them skipped.
    Image = 2,
    /// Reserved; pages containing PDF objects load with them skipped.
    Pdf = 3,
}

impl ObjectType {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ObjectType::Text),
            1 => Some(ObjectType::Drawing),
            2 => Some(ObjectType::Image),
            3 => Some(ObjectType::Pdf),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Text => "Text",
            ObjectType::Drawing => "Drawing",
            ObjectType::Image => "Image",
            ObjectType::Pdf => "PDF",
        }
    }
}

/// Kind-specific payload of a page object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Text(TextPayload),
    Drawing(DrawingPayload),
}

/// A positioned, sized, selectable, layered element on a page.
///
/// Owned by exactly one [`crate::Page`]; collaborators refer to objects by
/// id, never by holding a second handle. Setters suppress duplicate writes
/// and report whether the value actually changed, so the owning page can
/// emit exactly one notification per real change.
#[derive(Debug, Clone, PartialEq)]
pub struct PageObject {
    id: String,
    bounds: Rect,
    selected: bool,
    layer: i32,
    visible: bool,
    kind: ObjectKind,
}

impl PageObject {
    fn with_kind(kind: ObjectKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bounds: Rect::new(0, 0, 100, 100),
            selected: false,
            layer: 0,
            visible: true,
            kind,
        }
    }

    pub fn new_text() -> Self {
        Self::with_kind(ObjectKind::Text(TextPayload::default()))
    }

    pub fn new_drawing() -> Self {
        Self::with_kind(ObjectKind::Drawing(DrawingPayload::new()))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn object_type(&self) -> ObjectType {
        match self.kind {
            ObjectKind::Text(_) => ObjectType::Text,
            ObjectKind::Drawing(_) => ObjectType::Drawing,
        }
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn as_text(&self) -> Option<&TextPayload> {
        match &self.kind {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextPayload> {
        match &mut self.kind {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_drawing(&self) -> Option<&DrawingPayload> {
        match &self.kind {
            ObjectKind::Drawing(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_drawing_mut(&mut self) -> Option<&mut DrawingPayload> {
        match &mut self.kind {
            ObjectKind::Drawing(d) => Some(d),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn position(&self) -> Point {
        self.bounds.position()
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true when the value changed.
    pub fn set_bounds(&mut self, bounds: Rect) -> bool {
        if self.bounds == bounds {
            return false;
        }
        self.bounds = bounds;
        true
    }

    pub fn set_position(&mut self, position: Point) -> bool {
        self.set_bounds(Rect::from_position_size(position, self.bounds.size()))
    }

    pub fn set_size(&mut self, size: Size) -> bool {
        self.set_bounds(Rect::from_position_size(self.bounds.position(), size))
    }

    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        true
    }

    pub fn set_layer(&mut self, layer: i32) -> bool {
        if self.layer == layer {
            return false;
        }
        self.layer = layer;
        true
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    pub fn intersects(&self, rect: &Rect) -> bool {
        self.bounds.intersects(rect)
    }

    pub fn move_by(&mut self, delta: Point) -> bool {
        self.set_bounds(self.bounds.translated(delta))
    }

    /// Resizes around the bounds center. Non-positive factors are rejected.
    pub fn scale(&mut self, factor: f64) -> bool {
        if factor <= 0.0 {
            return false;
        }
        let center = self.bounds.center();
        let width = (self.bounds.width as f64 * factor) as i32;
        let height = (self.bounds.height as f64 * factor) as i32;
        self.set_bounds(Rect::new(
            center.x - width / 2,
            center.y - height / 2,
            width,
            height,
        ))
    }

    /// Replaces the text content and grows the bounds height to fit it at
    /// the current width. No-op on non-text objects.
    pub fn set_text_content(&mut self, content: &str) -> bool {
        let width = self.bounds.width;
        let Some(text) = self.as_text_mut() else {
            return false;
        };
        if text.content == content {
            return false;
        }
        text.content = content.to_string();
        let height = text.fitted_height(width);
        self.set_size(Size::new(width, height));
        true
    }

    /// Deep, detached copy with a fresh identity.
    ///
    /// The copy round-trips through the serialized form, so exactly the
    /// persisted state is carried over: the clone starts deselected and
    /// belongs to no page.
    pub fn duplicate(&self) -> PageObject {
        let mut copy = match Self::from_json(&self.to_json()) {
            Some(obj) => obj,
            // Own serialization always yields a known type tag.
            None => self.clone(),
        };
        copy.id = Uuid::new_v4().to_string();
        copy.selected = false;
        copy
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("type".to_string(), Value::from(self.object_type().code()));
        map.insert(
            "bounds".to_string(),
            serde_json::json!({
                "x": self.bounds.x,
                "y": self.bounds.y,
                "width": self.bounds.width,
                "height": self.bounds.height,
            }),
        );
        map.insert("layer".to_string(), Value::from(self.layer));
        map.insert("visible".to_string(), Value::from(self.visible));
        match &self.kind {
            ObjectKind::Text(t) => t.write_json(&mut map),
            ObjectKind::Drawing(d) => d.write_json(&mut map),
        }
        Value::Object(map)
    }

    /// Reconstructs an object from its serialized form.
    ///
    /// Missing fields take type-appropriate defaults rather than failing.
    /// Returns `None` only for an unknown or unimplemented type tag, which
    /// callers treat as "skip this object".
    pub fn from_json(json: &Value) -> Option<PageObject> {
        let code = json.get("type").and_then(Value::as_i64).unwrap_or(-1);
        let kind = match ObjectType::from_code(code)? {
            ObjectType::Text => ObjectKind::Text(TextPayload::read_json(json)),
            ObjectType::Drawing => ObjectKind::Drawing(DrawingPayload::read_json(json)),
            ObjectType::Image | ObjectType::Pdf => return None,
        };
        Some(PageObject {
            id: json
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            bounds: Rect::from_json(json.get("bounds")),
            selected: false,
            layer: json.get("layer").and_then(Value::as_i64).unwrap_or(0) as i32,
            visible: json.get("visible").and_then(Value::as_bool).unwrap_or(false),
            kind,
        })
    }

    /// Paints this object clipped to the intersection of its bounds and the
    /// viewport, then its selection adornments. Invisible objects and
    /// objects entirely outside the viewport draw nothing.
    pub fn paint(&self, painter: &mut dyn Painter, viewport: Rect) {
        if !self.visible {
            return;
        }
        let clip = self.bounds.intersected(&viewport);
        if clip.is_empty() {
            return;
        }
        painter.set_clip(Some(clip));
        match &self.kind {
            ObjectKind::Text(t) => self.paint_text(painter, t),
            ObjectKind::Drawing(d) => self.paint_drawing(painter, d),
        }
        painter.set_clip(None);
        self.paint_selection(painter);
    }

    fn paint_text(&self, painter: &mut dyn Painter, text: &TextPayload) {
        if text.background_color.a > 0 {
            painter.fill_rect(self.bounds, text.background_color);
        }
        painter.draw_text(self.bounds, &text.render_html(), text.text_color);
    }

    fn paint_drawing(&self, painter: &mut dyn Painter, drawing: &DrawingPayload) {
        for (index, stroke) in drawing.strokes().iter().enumerate() {
            match stroke.mode {
                DrawingMode::Pen => {
                    painter.draw_path(stroke.path.points(), &stroke.pen, &stroke.brush);
                }
                DrawingMode::Highlighter => {
                    painter.set_composite(CompositeMode::Multiply);
                    painter.draw_path(stroke.path.points(), &stroke.pen, &stroke.brush);
                    painter.set_composite(CompositeMode::Normal);
                }
                DrawingMode::Eraser => {
                    painter.set_composite(CompositeMode::Clear);
                    painter.draw_path(stroke.path.points(), &stroke.pen, &stroke.brush);
                    painter.set_composite(CompositeMode::Normal);
                }
            }
            if drawing.selected_strokes().contains(&index) {
                painter.draw_rect_outline(stroke.path.bounding_rect(), &dashed_selection_pen());
            }
        }
        // Live feedback for the stroke still being captured.
        if let Some(active) = drawing.active_stroke() {
            if !active.path.is_empty() {
                painter.draw_path(active.path.points(), &active.pen, &active.brush);
            }
        }
    }

    fn paint_selection(&self, painter: &mut dyn Painter) {
        if !self.selected {
            return;
        }
        painter.draw_rect_outline(self.bounds, &dashed_selection_pen());
        let corners = [
            self.bounds.position(),
            Point::new(self.bounds.right(), self.bounds.y),
            Point::new(self.bounds.x, self.bounds.bottom()),
            Point::new(self.bounds.right(), self.bounds.bottom()),
        ];
        let outline = Pen::new(Color::SELECTION_BLUE, 1.0);
        for corner in corners {
            let handle = Rect::new(
                corner.x - HANDLE_SIZE / 2,
                corner.y - HANDLE_SIZE / 2,
                HANDLE_SIZE,
                HANDLE_SIZE,
            );
            painter.fill_rect(handle, Color::WHITE);
            painter.draw_rect_outline(handle, &outline);
        }
    }
}

fn dashed_selection_pen() -> Pen {
    let mut pen = Pen::new(Color::SELECTION_BLUE, 2.0);
    pen.style = PenStyle::Dash;
    pen
}
