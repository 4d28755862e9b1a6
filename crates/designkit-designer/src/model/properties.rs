use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::text::TextAlign;

fn default_true() -> bool {
    true
}
fn default_opacity() -> f64 {
    1.0
}

/// Free-form properties bag. Known keys are typed; anything else is kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperties {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ElementProperties {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
            text_align: None,
            line_height: None,
            border_width: None,
            border_color: None,
            corner_radius: None,
            locked: false,
            extra: Map::new(),
        }
    }
}

impl ElementProperties {
    /// Opacity clamped to [0, 1].
    pub fn effective_opacity(&self) -> f64 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// A border is drawn only with a positive width.
    pub fn border(&self) -> Option<(f64, &str)> {
        match self.border_width {
            Some(w) if w > 0.0 => Some((w, self.border_color.as_deref().unwrap_or("#000000"))),
            _ => None,
        }
    }
}
