use serde::{Deserialize, Serialize};

/// How a bitmap fills its element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

impl ImageFit {
    /// SVG `preserveAspectRatio` value for this fit.
    pub fn preserve_aspect_ratio(&self) -> &'static str {
        match self {
            ImageFit::Contain => "xMidYMid meet",
            ImageFit::Cover => "xMidYMid slice",
            ImageFit::Fill => "none",
        }
    }
}

/// Image variant payload. The media itself is referenced by the element's
/// `media_id`/`url`, which stay empty until the upload completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}
