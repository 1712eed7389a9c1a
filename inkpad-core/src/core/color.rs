//! RGBA color stored the way the on-disk format writes it: hex strings.

/// An 8-bit RGBA color.
///
/// Serialized as `#rrggbb`, or `#aarrggbb` when the alpha channel carries
/// information, so fully opaque colors keep the compact form older files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Translucent yellow used as the default highlighter ink.
    pub const HIGHLIGHTER_YELLOW: Color = Color::rgba(255, 255, 0, 128);
    /// Selection outlines and handles.
    pub const SELECTION_BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#aarrggbb`. Returns `None` for anything else.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }

    /// Parses a hex string, falling back to opaque black on malformed input.
    pub fn from_hex_lossy(s: &str) -> Color {
        Self::from_hex(s).unwrap_or(Color::BLACK)
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
        }
    }
}
