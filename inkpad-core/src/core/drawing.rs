//! Ink strokes carried by a drawing page object.
//!
//! A stroke is one pen-down-to-pen-up path with the tool state that was
//! active when it started. The payload also holds the tool state for the
//! *next* stroke and a per-stroke selection that is independent of the
//! object-level selection flag.

use crate::core::color::Color;
use crate::core::geometry::{Point, Rect};
use serde_json::{Map, Value};

pub const MIN_PEN_WIDTH: f64 = 1.0;
pub const MAX_PEN_WIDTH: f64 = 50.0;

/// Window of recent input points averaged to take pointer jitter out.
const SMOOTH_WINDOW: usize = 3;

/// How the ink of a stroke composites onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    #[default]
    Pen = 0,
    Highlighter = 1,
    Eraser = 2,
}

impl DrawingMode {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => DrawingMode::Highlighter,
            2 => DrawingMode::Eraser,
            _ => DrawingMode::Pen,
        }
    }
}

/// Dash pattern of a pen. Codes are the legacy integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenStyle {
    #[default]
    Solid = 1,
    Dash = 2,
    Dot = 3,
    DashDot = 4,
}

impl PenStyle {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            2 => PenStyle::Dash,
            3 => PenStyle::Dot,
            4 => PenStyle::DashDot,
            _ => PenStyle::Solid,
        }
    }
}

/// Line-end cap. Codes are the legacy integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapStyle {
    #[default]
    Flat = 0,
    Square = 16,
    Round = 32,
}

impl CapStyle {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            16 => CapStyle::Square,
            32 => CapStyle::Round,
            _ => CapStyle::Flat,
        }
    }
}

/// Corner join between path segments. Codes are the legacy integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    #[default]
    Miter = 0,
    Bevel = 64,
    Round = 128,
}

impl JoinStyle {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            64 => JoinStyle::Bevel,
            128 => JoinStyle::Round,
            _ => JoinStyle::Miter,
        }
    }
}

/// Outline style used to stroke an ink path.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    pub style: PenStyle,
    pub cap: CapStyle,
    pub join: JoinStyle,
}

impl Pen {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width: width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
            style: PenStyle::Solid,
            cap: CapStyle::Round,
            join: JoinStyle::Round,
        }
    }

    /// The default ink for each drawing mode.
    pub fn default_for(mode: DrawingMode) -> Self {
        match mode {
            DrawingMode::Pen => Pen::new(Color::BLACK, 2.0),
            DrawingMode::Highlighter => Pen::new(Color::HIGHLIGHTER_YELLOW, 10.0),
            DrawingMode::Eraser => Pen::new(Color::WHITE, 20.0),
        }
    }

    /// Width setter; out-of-range values are clamped into [1, 50].
    pub fn set_width(&mut self, width: f64) {
        self.width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }

    pub(crate) fn write_json(&self) -> Value {
        serde_json::json!({
            "color": self.color.to_hex(),
            "width": self.width,
            "style": self.style.code(),
            "capStyle": self.cap.code(),
            "joinStyle": self.join.code(),
        })
    }

    pub(crate) fn read_json(json: Option<&Value>) -> Self {
        let get_i64 = |key: &str, default: i64| {
            json.and_then(|v| v.get(key))
                .and_then(Value::as_i64)
                .unwrap_or(default)
        };
        Self {
            color: json
                .and_then(|v| v.get("color"))
                .and_then(Value::as_str)
                .map(Color::from_hex_lossy)
                .unwrap_or(Color::BLACK),
            width: json
                .and_then(|v| v.get("width"))
                .and_then(Value::as_f64)
                .unwrap_or(2.0)
                .clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
            style: PenStyle::from_code(get_i64("style", PenStyle::Solid.code())),
            cap: CapStyle::from_code(get_i64("capStyle", CapStyle::Round.code())),
            join: JoinStyle::from_code(get_i64("joinStyle", JoinStyle::Round.code())),
        }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Pen::default_for(DrawingMode::Pen)
    }
}

/// Fill applied inside a stroked path. Runtime-only tool state; the stored
/// format never carried a brush, so it is not serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Brush {
    #[default]
    None,
    Solid(Color),
}

/// A polyline ink path, serialized as an SVG-style path string
/// (`M x,y L x,y …`) for compatibility with existing stored pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StrokePath {
    points: Vec<Point>,
}

impl StrokePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the path over at `point`.
    pub fn move_to(&mut self, point: Point) {
        self.points.clear();
        self.points.push(point);
    }

    pub fn line_to(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of line segments. A bare move-to has zero segments.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn translate(&mut self, delta: Point) {
        for p in &mut self.points {
            p.x += delta.x;
            p.y += delta.y;
        }
    }

    /// Axis-aligned bounding box of the path, at least 1x1 so single-point
    /// paths remain hit-testable.
    pub fn bounding_rect(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::default();
        };
        let mut min = *first;
        let mut max = *first;
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect::new(
            min.x,
            min.y,
            (max.x - min.x).max(1),
            (max.y - min.y).max(1),
        )
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.points.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("M{},{}", p.x, p.y));
            } else {
                out.push_str(&format!(" L{},{}", p.x, p.y));
            }
        }
        out
    }

    /// Parses an SVG-style path. Only move-to and line-to are meaningful for
    /// polyline ink; unrecognized tokens are skipped, so malformed input
    /// degrades to a shorter (possibly empty) path instead of failing.
    pub fn from_svg(s: &str) -> Self {
        let mut numbers: Vec<i32> = Vec::new();
        for token in s.split(|c: char| {
            c == 'M' || c == 'L' || c == 'm' || c == 'l' || c == ',' || c.is_whitespace()
        }) {
            if token.is_empty() {
                continue;
            }
            if let Ok(n) = token.parse::<f64>() {
                numbers.push(n.round() as i32);
            }
        }
        let points = numbers
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        Self { points }
    }
}

/// One committed ink stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub path: StrokePath,
    pub pen: Pen,
    pub brush: Brush,
    pub mode: DrawingMode,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Stroke {
    pub(crate) fn write_json(&self) -> Value {
        serde_json::json!({
            "mode": self.mode.code(),
            "timestamp": self.timestamp,
            "path": self.path.to_svg(),
            "pen": self.pen.write_json(),
        })
    }

    pub(crate) fn read_json(json: &Value) -> Self {
        Self {
            path: StrokePath::from_svg(
                json.get("path").and_then(Value::as_str).unwrap_or(""),
            ),
            pen: Pen::read_json(json.get("pen")),
            brush: Brush::None,
            mode: DrawingMode::from_code(
                json.get("mode").and_then(Value::as_i64).unwrap_or(0),
            ),
            timestamp: json.get("timestamp").and_then(Value::as_i64).unwrap_or(0),
        }
    }
}

/// In-flight stroke between `start_stroke` and `finish_stroke`.
#[derive(Debug, Clone, PartialEq)]
struct StrokeCapture {
    stroke: Stroke,
    /// Raw input points feeding the smoothing window.
    window: Vec<Point>,
}

/// Type-specific state of a drawing object.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingPayload {
    strokes: Vec<Stroke>,
    current_mode: DrawingMode,
    current_pen: Pen,
    current_brush: Brush,
    selected_strokes: Vec<usize>,
    capture: Option<StrokeCapture>,
}

impl Default for DrawingPayload {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            current_mode: DrawingMode::Pen,
            current_pen: Pen::default_for(DrawingMode::Pen),
            current_brush: Brush::None,
            selected_strokes: Vec::new(),
            capture: None,
        }
    }
}

impl DrawingPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn current_mode(&self) -> DrawingMode {
        self.current_mode
    }

    /// Switches tool mode. The current pen is reset to the mode's default.
    pub fn set_current_mode(&mut self, mode: DrawingMode) -> bool {
        if self.current_mode == mode {
            return false;
        }
        self.current_mode = mode;
        self.current_pen = Pen::default_for(mode);
        true
    }

    pub fn current_pen(&self) -> &Pen {
        &self.current_pen
    }

    pub fn set_current_pen(&mut self, pen: Pen) {
        self.current_pen = pen;
    }

    /// Clamped pen-width setter for the next stroke.
    pub fn set_pen_width(&mut self, width: f64) {
        self.current_pen.set_width(width);
    }

    pub fn current_brush(&self) -> Brush {
        self.current_brush
    }

    pub fn set_current_brush(&mut self, brush: Brush) {
        self.current_brush = brush;
    }

    pub fn is_drawing(&self) -> bool {
        self.capture.is_some()
    }

    /// The stroke currently being captured, if any. The canvas paints it as
    /// live feedback before it is committed.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.capture.as_ref().map(|c| &c.stroke)
    }

    /// Begins capturing a stroke at `point` with a snapshot of the current
    /// tool state. No-op when a stroke is already in progress.
    pub fn start_stroke(&mut self, point: Point) {
        if self.capture.is_some() {
            return;
        }
        let mut path = StrokePath::new();
        path.move_to(point);
        self.capture = Some(StrokeCapture {
            stroke: Stroke {
                path,
                pen: self.current_pen.clone(),
                brush: self.current_brush,
                mode: self.current_mode,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
            window: vec![point],
        });
    }

    /// Extends the in-progress stroke with a smoothed point.
    ///
    /// The point appended to the path is the moving average of the last
    /// [`SMOOTH_WINDOW`] raw input points. Eraser strokes keep feeding the
    /// window but do not extend the path; erasing is handled by the clear
    /// composite at paint time, matching the stored format's behavior.
    pub fn add_point_to_stroke(&mut self, point: Point) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        capture.window.push(point);
        if capture.window.len() > SMOOTH_WINDOW {
            capture.window.remove(0);
        }
        let n = capture.window.len() as i32;
        let sum = capture
            .window
            .iter()
            .fold(Point::default(), |acc, p| Point::new(acc.x + p.x, acc.y + p.y));
        let smoothed = Point::new(sum.x / n, sum.y / n);

        if capture.stroke.mode == DrawingMode::Eraser {
            return;
        }
        capture.stroke.path.line_to(smoothed);
    }

    /// Commits the in-progress stroke. A stroke whose path never grew past
    /// its starting point (an accidental click) is discarded.
    ///
    /// Returns true when a stroke was appended to the stroke list.
    pub fn finish_stroke(&mut self) -> bool {
        let Some(capture) = self.capture.take() else {
            return false;
        };
        if capture.stroke.path.segment_count() == 0 {
            return false;
        }
        self.strokes.push(capture.stroke);
        true
    }

    /// Discards the in-progress stroke without committing it.
    pub fn cancel_stroke(&mut self) {
        self.capture = None;
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn remove_stroke(&mut self, index: usize) {
        if index < self.strokes.len() {
            self.strokes.remove(index);
            self.selected_strokes.retain(|&i| i != index);
            // Selected indices above the removed stroke shift down by one.
            for i in &mut self.selected_strokes {
                if *i > index {
                    *i -= 1;
                }
            }
        }
    }

    pub fn clear_strokes(&mut self) {
        self.strokes.clear();
        self.selected_strokes.clear();
    }

    /// Index of the topmost stroke whose bounding box contains `point`.
    ///
    /// Bounding-box testing is deliberate: strokes are thin, and exact path
    /// geometry would make them nearly impossible to pick.
    pub fn stroke_at(&self, point: Point) -> Option<usize> {
        (0..self.strokes.len())
            .rev()
            .find(|&i| self.strokes[i].path.bounding_rect().contains(point))
    }

    pub fn selected_strokes(&self) -> &[usize] {
        &self.selected_strokes
    }

    pub fn select_stroke(&mut self, index: usize) -> bool {
        if index < self.strokes.len() && !self.selected_strokes.contains(&index) {
            self.selected_strokes.push(index);
            true
        } else {
            false
        }
    }

    pub fn deselect_stroke(&mut self, index: usize) -> bool {
        let before = self.selected_strokes.len();
        self.selected_strokes.retain(|&i| i != index);
        self.selected_strokes.len() != before
    }

    pub fn clear_stroke_selection(&mut self) -> bool {
        if self.selected_strokes.is_empty() {
            return false;
        }
        self.selected_strokes.clear();
        true
    }

    pub fn move_selected_strokes(&mut self, delta: Point) {
        for &index in &self.selected_strokes {
            if let Some(stroke) = self.strokes.get_mut(index) {
                stroke.path.translate(delta);
            }
        }
    }

    /// Removes every selected stroke. Indices are processed in descending
    /// order so earlier removals cannot shift the ones still pending.
    pub fn delete_selected_strokes(&mut self) {
        let mut indices = self.selected_strokes.clone();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for index in indices {
            if index < self.strokes.len() {
                self.strokes.remove(index);
            }
        }
        self.selected_strokes.clear();
    }

    /// Appends a copy of every selected stroke.
    pub fn duplicate_selected_strokes(&mut self) {
        let copies: Vec<Stroke> = self
            .selected_strokes
            .iter()
            .filter_map(|&i| self.strokes.get(i).cloned())
            .collect();
        self.strokes.extend(copies);
    }

    pub(crate) fn write_json(&self, map: &mut Map<String, Value>) {
        let strokes: Vec<Value> = self.strokes.iter().map(Stroke::write_json).collect();
        map.insert("strokes".to_string(), Value::Array(strokes));
        map.insert(
            "currentMode".to_string(),
            Value::from(self.current_mode.code()),
        );
        map.insert("currentPen".to_string(), self.current_pen.write_json());
    }

    pub(crate) fn read_json(json: &Value) -> Self {
        let strokes = json
            .get("strokes")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(Stroke::read_json).collect())
            .unwrap_or_default();
        Self {
            strokes,
            current_mode: DrawingMode::from_code(
                json.get("currentMode").and_then(Value::as_i64).unwrap_or(0),
            ),
            current_pen: Pen::read_json(json.get("currentPen")),
            current_brush: Brush::None,
            selected_strokes: Vec::new(),
            capture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_without_movement_commits_nothing() {
        let mut d = DrawingPayload::new();
        d.start_stroke(Point::new(0, 0));
        assert!(!d.finish_stroke());
        assert!(d.strokes().is_empty());
    }

    #[test]
    fn test_stroke_with_points_commits() {
        let mut d = DrawingPayload::new();
        d.start_stroke(Point::new(0, 0));
        d.add_point_to_stroke(Point::new(5, 5));
        d.add_point_to_stroke(Point::new(10, 10));
        assert!(d.finish_stroke());
        assert_eq!(d.strokes().len(), 1);
        assert!(d.strokes()[0].path.segment_count() >= 1);
    }

    #[test]
    fn test_start_while_drawing_is_ignored() {
        let mut d = DrawingPayload::new();
        d.start_stroke(Point::new(0, 0));
        d.add_point_to_stroke(Point::new(10, 0));
        // A second pen-down must not restart the capture.
        d.start_stroke(Point::new(100, 100));
        d.add_point_to_stroke(Point::new(20, 0));
        assert!(d.finish_stroke());
        assert_eq!(d.strokes()[0].path.points()[0], Point::new(0, 0));
    }

    #[test]
    fn test_cancel_discards() {
        let mut d = DrawingPayload::new();
        d.start_stroke(Point::new(0, 0));
        d.add_point_to_stroke(Point::new(5, 5));
        d.cancel_stroke();
        assert!(!d.is_drawing());
        assert!(!d.finish_stroke());
        assert!(d.strokes().is_empty());
    }

    #[test]
    fn test_smoothing_averages_recent_points() {
        let mut d = DrawingPayload::new();
        d.start_stroke(Point::new(0, 0));
        d.add_point_to_stroke(Point::new(6, 0));
        // Window is now [(0,0), (6,0)]; the appended point is their average.
        let last = *d.active_stroke().unwrap().path.points().last().unwrap();
        assert_eq!(last, Point::new(3, 0));

        d.add_point_to_stroke(Point::new(12, 0));
        // Window [(0,0), (6,0), (12,0)] averages to (6,0).
        let last = *d.active_stroke().unwrap().path.points().last().unwrap();
        assert_eq!(last, Point::new(6, 0));
    }

    #[test]
    fn test_eraser_points_do_not_extend_path() {
        let mut d = DrawingPayload::new();
        d.set_current_mode(DrawingMode::Eraser);
        d.start_stroke(Point::new(0, 0));
        d.add_point_to_stroke(Point::new(5, 5));
        d.add_point_to_stroke(Point::new(10, 10));
        assert_eq!(d.active_stroke().unwrap().path.points().len(), 1);
        assert!(!d.finish_stroke());
    }

    #[test]
    fn test_mode_change_resets_pen() {
        let mut d = DrawingPayload::new();
        assert!(d.set_current_mode(DrawingMode::Highlighter));
        assert_eq!(d.current_pen().color, Color::HIGHLIGHTER_YELLOW);
        assert_eq!(d.current_pen().width, 10.0);
        assert!(!d.set_current_mode(DrawingMode::Highlighter));
    }

    #[test]
    fn test_pen_width_clamps() {
        let mut d = DrawingPayload::new();
        d.set_pen_width(-5.0);
        assert_eq!(d.current_pen().width, MIN_PEN_WIDTH);
        d.set_pen_width(500.0);
        assert_eq!(d.current_pen().width, MAX_PEN_WIDTH);
        d.set_pen_width(7.5);
        assert_eq!(d.current_pen().width, 7.5);
    }

    fn stroke_at(x: i32, y: i32, w: i32, h: i32) -> Stroke {
        let mut path = StrokePath::new();
        path.move_to(Point::new(x, y));
        path.line_to(Point::new(x + w, y + h));
        Stroke {
            path,
            pen: Pen::default(),
            brush: Brush::None,
            mode: DrawingMode::Pen,
            timestamp: 0,
        }
    }

    #[test]
    fn test_stroke_at_returns_topmost() {
        let mut d = DrawingPayload::new();
        d.add_stroke(stroke_at(0, 0, 50, 50));
        d.add_stroke(stroke_at(25, 25, 50, 50));
        assert_eq!(d.stroke_at(Point::new(30, 30)), Some(1));
        assert_eq!(d.stroke_at(Point::new(5, 5)), Some(0));
        assert_eq!(d.stroke_at(Point::new(200, 200)), None);
    }

    #[test]
    fn test_delete_selected_strokes_descending() {
        let mut d = DrawingPayload::new();
        for i in 0..4 {
            d.add_stroke(stroke_at(i * 100, 0, 10, 10));
        }
        d.select_stroke(0);
        d.select_stroke(2);
        d.delete_selected_strokes();
        assert_eq!(d.strokes().len(), 2);
        assert_eq!(d.strokes()[0].path.points()[0], Point::new(100, 0));
        assert_eq!(d.strokes()[1].path.points()[0], Point::new(300, 0));
        assert!(d.selected_strokes().is_empty());
    }

    #[test]
    fn test_duplicate_selected_strokes() {
        let mut d = DrawingPayload::new();
        d.add_stroke(stroke_at(0, 0, 10, 10));
        d.select_stroke(0);
        d.duplicate_selected_strokes();
        assert_eq!(d.strokes().len(), 2);
        assert_eq!(d.strokes()[0].path, d.strokes()[1].path);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut d = DrawingPayload::new();
        d.add_stroke(stroke_at(0, 0, 10, 10));
        assert!(d.select_stroke(0));
        assert!(!d.select_stroke(0));
        assert!(!d.select_stroke(7));
        assert_eq!(d.selected_strokes(), &[0]);
        assert!(d.deselect_stroke(0));
        assert!(!d.deselect_stroke(0));
    }

    #[test]
    fn test_move_selected_strokes() {
        let mut d = DrawingPayload::new();
        d.add_stroke(stroke_at(0, 0, 10, 10));
        d.add_stroke(stroke_at(100, 0, 10, 10));
        d.select_stroke(1);
        d.move_selected_strokes(Point::new(-10, 5));
        assert_eq!(d.strokes()[0].path.points()[0], Point::new(0, 0));
        assert_eq!(d.strokes()[1].path.points()[0], Point::new(90, 5));
    }

    #[test]
    fn test_svg_path_round_trip() {
        let mut path = StrokePath::new();
        path.move_to(Point::new(-3, 7));
        path.line_to(Point::new(10, 20));
        path.line_to(Point::new(0, 0));
        let svg = path.to_svg();
        assert_eq!(svg, "M-3,7 L10,20 L0,0");
        assert_eq!(StrokePath::from_svg(&svg), path);
    }

    #[test]
    fn test_malformed_svg_degrades_to_empty() {
        assert!(StrokePath::from_svg("").is_empty());
        assert!(StrokePath::from_svg("garbage").is_empty());
        // An odd trailing number is dropped, the rest survives.
        assert_eq!(StrokePath::from_svg("M1,2 L3").points().len(), 1);
    }

    #[test]
    fn test_stroke_json_round_trip() {
        let mut d = DrawingPayload::new();
        d.set_current_mode(DrawingMode::Highlighter);
        d.start_stroke(Point::new(1, 1));
        d.add_point_to_stroke(Point::new(21, 1));
        d.finish_stroke();

        let mut map = Map::new();
        d.write_json(&mut map);
        let back = DrawingPayload::read_json(&Value::Object(map));
        assert_eq!(back.strokes(), d.strokes());
        assert_eq!(back.current_mode(), DrawingMode::Highlighter);
        assert_eq!(back.current_pen(), d.current_pen());
    }

    #[test]
    fn test_bounding_rect_of_single_point_is_hit_testable() {
        let mut path = StrokePath::new();
        path.move_to(Point::new(5, 5));
        assert!(path.bounding_rect().contains(Point::new(5, 5)));
    }
}
