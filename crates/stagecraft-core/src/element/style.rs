//! Visual style properties for elements.

use peniko::Color;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Format as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Parse a CSS color string as produced by the color picker.
///
/// Accepts `transparent`, `#rgb`, `#rrggbb` and `#rrggbbaa`. Returns `None`
/// for anything else so callers can keep the previous value.
pub fn parse_hex_color(color: &str) -> Option<SerializableColor> {
    let color = color.trim();
    if color.eq_ignore_ascii_case("transparent") {
        return Some(SerializableColor::transparent());
    }

    let hex = color.strip_prefix('#')?;
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(SerializableColor::new(r, g, b, 255))
        }
        6 => Some(SerializableColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Some(SerializableColor::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

/// Style properties for elements.
///
/// Properties the engine never interprets (shadows, borders, font families)
/// are kept verbatim in `extra` so they survive a save/load cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    /// Fill color (None = no fill).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<SerializableColor>,
    /// Stroke color (None = no stroke).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<SerializableColor>,
    /// Stroke width.
    #[serde(default)]
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Font size for text elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Free-form properties passed through to the view layer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            fill_color: None,
            stroke_color: None,
            stroke_width: 0.0,
            opacity: 1.0,
            font_size: None,
            extra: Map::new(),
        }
    }
}

impl ElementStyle {
    /// Default style for filled shapes.
    pub fn shape() -> Self {
        Self {
            fill_color: Some(SerializableColor::new(204, 204, 204, 255)),
            stroke_color: Some(SerializableColor::black()),
            stroke_width: 1.0,
            ..Self::default()
        }
    }

    /// Default style for lines.
    pub fn line() -> Self {
        Self {
            stroke_color: Some(SerializableColor::black()),
            stroke_width: 2.0,
            ..Self::default()
        }
    }

    /// Default style for text at the given font size.
    pub fn text(font_size: f64) -> Self {
        Self {
            stroke_color: Some(SerializableColor::black()),
            font_size: Some(font_size),
            ..Self::default()
        }
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|c| self.apply_opacity(c))
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Option<Color> {
        self.stroke_color.map(|c| self.apply_opacity(c))
    }

    fn apply_opacity(&self, color: SerializableColor) -> Color {
        let alpha = (f64::from(color.a) * self.opacity.clamp(0.0, 1.0)) as u8;
        Color::from_rgba8(color.r, color.g, color.b, alpha)
    }
}
