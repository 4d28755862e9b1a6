//! Export and print-preview projection.
//!
//! [`ExportLayout`] is the backend-facing description of a page: every
//! visible element with its concatenated affine transform, resolved colors
//! and fonts in output pixels. Backends turn a layout into bytes; this module
//! never rasterizes by itself.

mod fonts;
mod raster;
mod svg;
mod transform;

pub use fonts::{font_for, list_font_families};
pub use raster::RasterBackend;
pub use svg::SvgBackend;
pub use transform::Transform;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use designkit_core::{mm_to_px_at, AppEvent, ExportError, ExportEvent, ValidationError};

use crate::canvas::PreviewScales;
use crate::color::Rgba;
use crate::designer_state::DesignerState;
use crate::persistence::{DocumentApi, ExportRequest, RemoteExport};
use crate::renderer::{project, NodeContent, RenderContext, RenderTree};
use crate::store::EditorStore;

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 90;
/// Default print resolution for file exports.
pub const DEFAULT_DPI: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Svg,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn is_raster(&self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Svg => "SVG",
            ExportFormat::Pdf => "PDF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ValidationError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Scale at which a layout is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewScale {
    /// Live editor: mm × 96/25.4 × canvas zoom.
    Editor,
    /// Print-preview dialog: editor density times `factor`.
    PrintPreview { factor: f64 },
    /// File output at a print resolution.
    Dpi(f64),
}

impl PreviewScale {
    /// Output pixels per canvas pixel.
    pub fn factor(&self, state: &DesignerState, scales: &PreviewScales) -> f64 {
        match *self {
            PreviewScale::Editor => state.canvas().zoom,
            PreviewScale::PrintPreview { factor } => factor,
            PreviewScale::Dpi(dpi) => mm_to_px_at(1.0, dpi) / scales.editor_px_per_mm,
        }
    }
}

/// Options for a file export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// 1..=100, used by JPEG.
    pub quality: u8,
    pub dpi: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: DEFAULT_QUALITY,
            dpi: DEFAULT_DPI,
        }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }
}

/// One element placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportItem {
    pub element_id: String,
    /// Local box size; the box spans (0,0)..(width,height) before `transform`.
    pub width: f64,
    pub height: f64,
    /// Local box to page pixels: translation then rotation about the center.
    pub transform: Transform,
    pub opacity: f64,
    pub border: Option<(f64, Rgba)>,
    pub content: NodeContent,
}

/// Backend input: page size in pixels plus items in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLayout {
    pub width: f64,
    pub height: f64,
    pub background: Rgba,
    pub items: Vec<ExportItem>,
}

impl ExportLayout {
    pub fn from_tree(tree: &RenderTree) -> Self {
        let items = tree
            .nodes
            .iter()
            .map(|node| {
                let f = node.frame;
                let transform = Transform::translate(f.x, f.y).pre_rotate_about(
                    node.rotation,
                    f.width / 2.0,
                    f.height / 2.0,
                );
                ExportItem {
                    element_id: node.element_id.clone(),
                    width: f.width,
                    height: f.height,
                    transform,
                    opacity: node.opacity,
                    border: node.border,
                    content: node.content.clone(),
                }
            })
            .collect();

        Self {
            width: tree.width,
            height: tree.height,
            background: tree.background,
            items,
        }
    }

    /// Project `state` at `scale`. Editor overlays and handles never reach
    /// a layout.
    pub fn project(state: &DesignerState, scales: &PreviewScales, scale: PreviewScale) -> Self {
        let ctx = RenderContext::new(scales.editor_px_per_mm).with_zoom(scale.factor(state, scales));
        Self::project_with(state, &ctx)
    }

    pub fn project_with(state: &DesignerState, ctx: &RenderContext) -> Self {
        Self::from_tree(&project(state, ctx))
    }

    /// Whole-pixel page size.
    pub fn pixel_size(&self) -> Result<(u32, u32), ExportError> {
        let w = self.width.round();
        let h = self.height.round();
        if !(w >= 1.0 && h >= 1.0) || w > u32::MAX as f64 || h > u32::MAX as f64 {
            return Err(ExportError::EmptyCanvas {
                width: w.max(0.0) as u32,
                height: h.max(0.0) as u32,
            });
        }
        Ok((w as u32, h as u32))
    }
}

/// Encoded export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ExportOutput {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            mime: format.mime().to_string(),
        }
    }

    /// `data:` url for client-side downloads.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.format.extension())
    }
}

/// Turns a layout into file bytes.
pub trait ExportBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, format: ExportFormat) -> bool;

    fn render(
        &self,
        layout: &ExportLayout,
        options: &ExportOptions,
    ) -> Result<ExportOutput, ExportError>;
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportResult {
    Local(ExportOutput),
    Remote(RemoteExport),
}

/// Routes exports to the local backends or the server-side path.
pub struct Exporter {
    store: Arc<EditorStore>,
    scales: PreviewScales,
    backends: Vec<Box<dyn ExportBackend>>,
    api: Option<Arc<dyn DocumentApi>>,
}

impl Exporter {
    /// SVG and raster backends, no server-side path.
    pub fn new(store: Arc<EditorStore>, scales: PreviewScales) -> Self {
        Self {
            store,
            scales,
            backends: vec![Box::new(SvgBackend::new()), Box::new(RasterBackend::new())],
            api: None,
        }
    }

    /// Enable server-side export (PDF).
    pub fn with_api(mut self, api: Arc<dyn DocumentApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Backends registered later take precedence.
    pub fn with_backend(mut self, backend: Box<dyn ExportBackend>) -> Self {
        self.backends.insert(0, backend);
        self
    }

    pub fn layout(&self, scale: PreviewScale) -> ExportLayout {
        self.store
            .read(|s| ExportLayout::project(s, &self.scales, scale))
    }

    /// Print-preview layout at the configured preview factor.
    pub fn print_preview(&self) -> ExportLayout {
        self.layout(PreviewScale::PrintPreview {
            factor: self.scales.print_preview_factor,
        })
    }

    /// Export the current session.
    ///
    /// Raster and vector formats are produced locally at `options.dpi`; PDF
    /// goes through [`DocumentApi::export_document`] and needs a saved
    /// document.
    pub async fn export(&self, options: &ExportOptions) -> Result<ExportResult, ExportError> {
        let result = match self.backends.iter().find(|b| b.supports(options.format)) {
            Some(backend) => {
                let layout = self.layout(PreviewScale::Dpi(options.dpi));
                backend.render(&layout, options).map(ExportResult::Local)
            }
            None => self.export_remote(options).await,
        };

        let format = options.format.to_string();
        match &result {
            Ok(out) => {
                let bytes = match out {
                    ExportResult::Local(o) => o.bytes.len(),
                    ExportResult::Remote(RemoteExport::Blob { bytes, .. }) => bytes.len(),
                    ExportResult::Remote(RemoteExport::Url(_)) => 0,
                };
                tracing::info!("Exported {} ({} bytes)", format, bytes);
                self.publish(AppEvent::Export(ExportEvent::Completed { format, bytes }));
            }
            Err(e) => {
                tracing::error!("Export {} failed: {}", format, e);
                self.publish(AppEvent::Export(ExportEvent::Failed {
                    format,
                    message: e.to_string(),
                }));
                self.publish(AppEvent::error(format!("Export failed: {}", e)));
            }
        }
        result
    }

    async fn export_remote(&self, options: &ExportOptions) -> Result<ExportResult, ExportError> {
        let Some(api) = &self.api else {
            return Err(ExportError::UnsupportedFormat {
                format: options.format.to_string(),
                backend: "local".to_string(),
            });
        };
        let Some(id) = self.store.read(|s| s.document_id().map(str::to_string)) else {
            return Err(ExportError::RemoteFailed {
                reason: "design has not been saved".to_string(),
            });
        };

        let layout = self.layout(PreviewScale::Dpi(options.dpi));
        let request = ExportRequest {
            format: options.format,
            quality: options.quality,
            dims: layout.pixel_size().ok(),
        };
        api.export_document(&id, request)
            .await
            .map(ExportResult::Remote)
            .map_err(|e| ExportError::RemoteFailed {
                reason: e.to_string(),
            })
    }

    fn publish(&self, event: AppEvent) {
        self.store.events().publish(event).ok();
    }
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("Exporter")
            .field("backends", &names)
            .field("remote", &self.api.is_some())
            .finish()
    }
}

/// Escape text for XML attribute and element content.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
