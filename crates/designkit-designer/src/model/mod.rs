//! Canvas element model.
//!
//! An element is a tagged variant (text, image, shape) sharing a common frame:
//! position, size, rotation, paint order, a properties bag and an optional
//! media reference. Coordinates are canvas-local pixels, top-left origin.

use designkit_core::units::Bounds;
use serde::{Deserialize, Serialize};
use std::fmt;

mod image;
mod properties;
mod shape;
mod text;

pub use image::{ImageContent, ImageFit};
pub use properties::ElementProperties;
pub use shape::{ShapeContent, ShapeKind, DEFAULT_CORNER_RADIUS, DEFAULT_FILL_COLOR};
pub use text::{
    TextAlign, TextContent, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT, DEFAULT_FONT_WEIGHT,
    DEFAULT_TEXT_COLOR,
};

/// Discriminant of an element variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Shape,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Text => write!(f, "text"),
            ElementType::Image => write!(f, "image"),
            ElementType::Shape => write!(f, "shape"),
        }
    }
}

/// Variant-specific payload, tagged by `type` in the persisted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextContent),
    Image(ImageContent),
    Shape(ShapeContent),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Shape(_) => ElementType::Shape,
        }
    }
}

/// One placed object on the canvas.
///
/// Identity is the `id`; two elements with the same id are the same element
/// even if their fields differ (see [`CanvasElement::same_identity`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, stored as given.
    #[serde(default)]
    pub rotation: f64,
    /// Paint order; `None` paints in insertion order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub properties: ElementProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CanvasElement {
    fn with_kind(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: None,
            properties: ElementProperties::default(),
            media_id: None,
            url: None,
            kind,
        }
    }

    /// Creates a text element.
    pub fn text(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        content: TextContent,
    ) -> Self {
        Self::with_kind(id, x, y, width, height, ElementKind::Text(content))
    }

    /// Creates an image element. The media reference starts empty.
    pub fn image(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        content: ImageContent,
    ) -> Self {
        Self::with_kind(id, x, y, width, height, ElementKind::Image(content))
    }

    /// Creates a shape element.
    pub fn shape(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        content: ShapeContent,
    ) -> Self {
        Self::with_kind(id, x, y, width, height, ElementKind::Shape(content))
    }

    /// Sets the media reference.
    pub fn with_media(mut self, media_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.media_id = Some(media_id.into());
        self.url = Some(url.into());
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_properties(mut self, properties: ElementProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn same_identity(&self, other: &CanvasElement) -> bool {
        self.id == other.id
    }

    /// Unrotated frame.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Axis-aligned bounds including rotation.
    pub fn visual_bounds(&self) -> Bounds {
        self.bounds().rotated(self.rotation)
    }

    pub fn is_visible(&self) -> bool {
        self.properties.visible
    }

    pub fn is_locked(&self) -> bool {
        self.properties.locked
    }

    /// Paint order used for sorting: the explicit z-index, or the element's
    /// position in the array when none was set.
    pub fn effective_z_index(&self, index: usize) -> i64 {
        self.z_index
            .map(i64::from)
            .unwrap_or_else(|| i64::try_from(index).unwrap_or(i64::MAX))
    }

    /// True for image elements that still wait for their upload.
    pub fn is_pending_media(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
            && self.url.as_deref().map_or(true, str::is_empty)
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeContent> {
        match &self.kind {
            ElementKind::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.kind {
            ElementKind::Image(i) => Some(i),
            _ => None,
        }
    }

    /// Merge a partial update into this element.
    ///
    /// Negative sizes are clamped to zero. Variant fields that do not belong
    /// to this element's variant are skipped and reported back by name.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> Vec<&'static str> {
        let mut ignored = Vec::new();

        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w.max(0.0);
        }
        if let Some(h) = patch.height {
            self.height = h.max(0.0);
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(z) = patch.z_index {
            self.z_index = Some(z);
        }
        if let Some(props) = &patch.properties {
            self.properties = props.clone();
        }
        if let Some(media_id) = &patch.media_id {
            self.media_id = Some(media_id.clone());
        }
        if let Some(url) = &patch.url {
            self.url = Some(url.clone());
        }

        match &mut self.kind {
            ElementKind::Text(t) => {
                if let Some(v) = &patch.content {
                    t.content = v.clone();
                }
                if let Some(v) = &patch.font_family {
                    t.font_family = v.clone();
                }
                if let Some(v) = patch.font_size {
                    t.font_size = v;
                }
                if let Some(v) = patch.font_weight {
                    t.font_weight = v;
                }
                if let Some(v) = &patch.color {
                    t.color = v.clone();
                }
                if patch.fill_color.is_some() {
                    ignored.push("fill_color");
                }
                if patch.shape_type.is_some() {
                    ignored.push("shape_type");
                }
                if patch.fit.is_some() {
                    ignored.push("fit");
                }
            }
            ElementKind::Image(i) => {
                if let Some(v) = patch.fit {
                    i.fit = v;
                }
                ignored.extend(patch.text_fields_set());
                if patch.fill_color.is_some() {
                    ignored.push("fill_color");
                }
                if patch.shape_type.is_some() {
                    ignored.push("shape_type");
                }
            }
            ElementKind::Shape(s) => {
                if let Some(v) = patch.shape_type {
                    s.shape_type = v;
                }
                if let Some(v) = &patch.fill_color {
                    s.fill_color = v.clone();
                }
                ignored.extend(patch.text_fields_set());
                if patch.fit.is_some() {
                    ignored.push("fit");
                }
            }
        }

        ignored
    }
}

/// Partial update for an element. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ElementProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a new top-left corner.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Move and resize.
    pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    pub fn with_properties(mut self, properties: ElementProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_media(mut self, media_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.media_id = Some(media_id.into());
        self.url = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn text_fields_set(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.content.is_some() {
            set.push("content");
        }
        if self.font_family.is_some() {
            set.push("font_family");
        }
        if self.font_size.is_some() {
            set.push("font_size");
        }
        if self.font_weight.is_some() {
            set.push("font_weight");
        }
        if self.color.is_some() {
            set.push("color");
        }
        set
    }
}
