use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Corner radius used for rounded rectangles when the element does not set one (px).
pub const DEFAULT_CORNER_RADIUS: f64 = 8.0;
pub const DEFAULT_FILL_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    RoundedRectangle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Rectangle => write!(f, "rectangle"),
            ShapeKind::Circle => write!(f, "circle"),
            ShapeKind::Triangle => write!(f, "triangle"),
            ShapeKind::RoundedRectangle => write!(f, "rounded-rectangle"),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            "circle" => Ok(ShapeKind::Circle),
            "triangle" => Ok(ShapeKind::Triangle),
            "rounded-rectangle" | "rounded_rectangle" | "roundedrectangle" => {
                Ok(ShapeKind::RoundedRectangle)
            }
            _ => Err(format!("Unknown shape type: {}", s)),
        }
    }
}

fn default_fill() -> String {
    DEFAULT_FILL_COLOR.to_string()
}

/// Shape variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    #[serde(default)]
    pub shape_type: ShapeKind,
    #[serde(default = "default_fill")]
    pub fill_color: String,
}

impl ShapeContent {
    pub fn new(shape_type: ShapeKind, fill_color: impl Into<String>) -> Self {
        Self {
            shape_type,
            fill_color: fill_color.into(),
        }
    }
}
