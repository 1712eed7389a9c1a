//! Text content carried by a text page object.

use crate::core::color::Color;
use pulldown_cmark::{html, Parser};
use serde_json::{Map, Value};

/// Font description for a text object. The shell resolves the family name
/// against whatever is installed; the core only round-trips it.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Sans Serif".to_string(),
            size: 11,
            bold: false,
            italic: false,
        }
    }
}

/// Horizontal text alignment.
///
/// Stored as the legacy bitmask codes (left 0x1, right 0x2, centered 0x4);
/// decoding tolerates vertical-alignment bits older files OR into the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn code(self) -> i64 {
        match self {
            Alignment::Left => 0x1,
            Alignment::Right => 0x2,
            Alignment::Center => 0x4,
        }
    }

    pub fn from_code(code: i64) -> Self {
        if code & 0x4 != 0 {
            Alignment::Center
        } else if code & 0x2 != 0 {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }
}

/// Type-specific state of a text object.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPayload {
    pub content: String,
    /// When set, `content` is Markdown; otherwise it is laid out verbatim.
    pub markdown_mode: bool,
    pub font: Font,
    pub text_color: Color,
    pub background_color: Color,
    pub alignment: Alignment,
    pub line_spacing: i32,
}

impl Default for TextPayload {
    fn default() -> Self {
        Self {
            content: String::new(),
            markdown_mode: true,
            font: Font::default(),
            text_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            alignment: Alignment::Left,
            line_spacing: 0,
        }
    }
}

impl TextPayload {
    /// Renders the content to HTML for the canvas's rich-text layout.
    pub fn render_html(&self) -> String {
        if self.markdown_mode {
            let mut out = String::new();
            html::push_html(&mut out, Parser::new(&self.content));
            out
        } else {
            escape_html(&self.content).replace('\n', "<br>")
        }
    }

    /// Case-insensitive content match used by page and document search.
    pub fn matches(&self, query: &str) -> bool {
        !query.is_empty()
            && self
                .content
                .to_lowercase()
                .contains(&query.to_lowercase())
    }

    /// Estimated rendered height at the given wrap width.
    ///
    /// The canvas performs exact layout; this estimate exists so the object
    /// model can keep the "height grows to fit content" invariant without a
    /// font rasterizer. It assumes an average glyph advance of 0.6em.
    pub fn fitted_height(&self, width: i32) -> i32 {
        let line_height = (self.font.size * 3) / 2 + self.line_spacing;
        if self.content.is_empty() {
            return line_height;
        }
        let glyph_width = ((self.font.size as f64) * 0.6).max(1.0);
        let chars_per_line = ((width as f64 / glyph_width) as usize).max(1);
        let mut lines = 0usize;
        for line in self.content.lines() {
            lines += 1 + line.chars().count().saturating_sub(1) / chars_per_line;
        }
        (lines.max(1) as i32) * line_height
    }

    pub(crate) fn write_json(&self, map: &mut Map<String, Value>) {
        map.insert("content".to_string(), Value::from(self.content.clone()));
        map.insert("markdownMode".to_string(), Value::from(self.markdown_mode));
        map.insert(
            "font".to_string(),
            serde_json::json!({
                "family": self.font.family,
                "size": self.font.size,
                "bold": self.font.bold,
                "italic": self.font.italic,
            }),
        );
        map.insert("textColor".to_string(), Value::from(self.text_color.to_hex()));
        map.insert(
            "backgroundColor".to_string(),
            Value::from(self.background_color.to_hex()),
        );
        map.insert("alignment".to_string(), Value::from(self.alignment.code()));
        map.insert("lineSpacing".to_string(), Value::from(self.line_spacing));
    }

    pub(crate) fn read_json(json: &Value) -> Self {
        let defaults = Self::default();
        let font_obj = json.get("font");
        let font = Font {
            family: font_obj
                .and_then(|f| f.get("family"))
                .and_then(Value::as_str)
                .unwrap_or(&defaults.font.family)
                .to_string(),
            size: font_obj
                .and_then(|f| f.get("size"))
                .and_then(Value::as_i64)
                .unwrap_or(defaults.font.size as i64) as i32,
            bold: font_obj
                .and_then(|f| f.get("bold"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            italic: font_obj
                .and_then(|f| f.get("italic"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        };
        Self {
            content: json
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            markdown_mode: json
                .get("markdownMode")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            font,
            text_color: json
                .get("textColor")
                .and_then(Value::as_str)
                .map(Color::from_hex_lossy)
                .unwrap_or(Color::BLACK),
            background_color: json
                .get("backgroundColor")
                .and_then(Value::as_str)
                .and_then(Color::from_hex)
                .unwrap_or(Color::TRANSPARENT),
            alignment: Alignment::from_code(
                json.get("alignment").and_then(Value::as_i64).unwrap_or(0x1),
            ),
            line_spacing: json
                .get("lineSpacing")
                .and_then(Value::as_i64)
                .unwrap_or(0) as i32,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_codes_round_trip() {
        for a in [Alignment::Left, Alignment::Center, Alignment::Right] {
            assert_eq!(Alignment::from_code(a.code()), a);
        }
        // Legacy files OR vertical bits into the mask (AlignTop = 0x20).
        assert_eq!(Alignment::from_code(0x21), Alignment::Left);
        assert_eq!(Alignment::from_code(0x24), Alignment::Center);
        assert_eq!(Alignment::from_code(0), Alignment::Left);
    }

    #[test]
    fn test_render_markdown() {
        let t = TextPayload {
            content: "# Title\n\nsome **bold** text".to_string(),
            ..TextPayload::default()
        };
        let html = t.render_html();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_plain_text_is_escaped() {
        let t = TextPayload {
            content: "a < b\nc & d".to_string(),
            markdown_mode: false,
            ..TextPayload::default()
        };
        assert_eq!(t.render_html(), "a &lt; b<br>c &amp; d");
    }

    #[test]
    fn test_fitted_height_grows_with_content() {
        let mut t = TextPayload::default();
        let empty = t.fitted_height(200);
        t.content = "one line".to_string();
        let one = t.fitted_height(200);
        t.content = "x".repeat(500);
        let wrapped = t.fitted_height(200);
        assert_eq!(empty, one);
        assert!(wrapped > one);
    }

    #[test]
    fn test_read_json_defaults_missing_fields() {
        let t = TextPayload::read_json(&serde_json::json!({}));
        assert_eq!(t.content, "");
        assert!(!t.markdown_mode);
        assert_eq!(t.text_color, Color::BLACK);
        assert_eq!(t.alignment, Alignment::Left);
        assert_eq!(t.font.family, "Sans Serif");
    }

    #[test]
    fn test_json_round_trip() {
        let t = TextPayload {
            content: "Hello".to_string(),
            markdown_mode: true,
            font: Font {
                family: "Serif".to_string(),
                size: 14,
                bold: true,
                italic: false,
            },
            text_color: Color::rgb(10, 20, 30),
            background_color: Color::HIGHLIGHTER_YELLOW,
            alignment: Alignment::Right,
            line_spacing: 2,
        };
        let mut map = Map::new();
        t.write_json(&mut map);
        let back = TextPayload::read_json(&Value::Object(map));
        assert_eq!(back, t);
    }
}
