use serde::{Deserialize, Serialize};

/// Horizontal alignment of text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE_PT: f64 = 16.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}
fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE_PT
}
fn default_font_weight() -> u16 {
    DEFAULT_FONT_WEIGHT
}
fn default_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

/// Text variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_weight", deserialize_with = "font_weight::deserialize")]
    pub font_weight: u16,
    #[serde(default = "default_color")]
    pub color: String,
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            color: default_color(),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}

/// Stored documents carry the weight either as a number or as a CSS keyword.
mod font_weight {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Keyword(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u16, D::Error> {
        Ok(match Raw::deserialize(d)? {
            Raw::Number(n) => n,
            Raw::Keyword(k) => match k.trim().to_ascii_lowercase().as_str() {
                "bold" | "bolder" => 700,
                "lighter" => 300,
                other => other.parse().unwrap_or(super::DEFAULT_FONT_WEIGHT),
            },
        })
    }
}
