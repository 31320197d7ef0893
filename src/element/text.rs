use egui::Color32;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

/// Horizontal anchoring of a text line, canvas `textAlign` style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn label(&self) -> &'static str {
        match self {
            TextAlign::Left => "Left",
            TextAlign::Center => "Center",
            TextAlign::Right => "Right",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TextAlign::Left => "⬅",
            TextAlign::Center => "↔",
            TextAlign::Right => "➡",
        }
    }
}

/// Appearance attributes carried by text elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: String,
    #[serde(with = "super::common::hex_color")]
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            color: Color32::BLACK,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Center,
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f32, color: Color32, font_family: impl Into<String>) -> Self {
        Self {
            font_size: font_size.max(super::common::MIN_FONT_SIZE),
            font_family: font_family.into(),
            color,
            ..Default::default()
        }
    }

    /// Pixel size after applying the element scale
    pub fn scaled_size(&self, scale: f32) -> f32 {
        self.font_size * scale
    }

    /// CSS-like font shorthand, e.g. `"bold italic 36px Arial, sans-serif"`
    pub fn font_string(&self, scale: f32) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if self.bold {
            parts.push("bold".to_owned());
        }
        if self.italic {
            parts.push("italic".to_owned());
        }
        parts.push(format!("{}px", self.scaled_size(scale)));
        parts.push(self.font_family.clone());
        parts.join(" ")
    }

    /// Family names in preference order, quotes stripped
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.font_family
            .split(',')
            .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|name| !name.is_empty())
    }
}
