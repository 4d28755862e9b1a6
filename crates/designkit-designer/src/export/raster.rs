//! Raster export backend (PNG/JPEG) on tiny-skia.
//!
//! Features:
//! - Anti-aliased shapes with rounded corners and borders
//! - Text glyphs through rusttype, rotated with their element
//! - Registered media drawn with contain/cover/fill; placeholders otherwise

use image::{codecs::jpeg::JpegEncoder, DynamicImage, ImageFormat, RgbImage, RgbaImage};
use parking_lot::RwLock;
use rusttype::{point as rt_point, Scale};
use std::collections::HashMap;
use std::io::Cursor;
use tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, Paint, Path, PathBuilder, Pattern, Pixmap,
    PixmapPaint, Rect, SpreadMode, Stroke,
};

use designkit_core::ExportError;

use super::fonts::font_for;
use super::{ExportBackend, ExportFormat, ExportItem, ExportLayout, ExportOptions, ExportOutput, Transform};
use crate::assets::AssetStatus;
use crate::color::Rgba;
use crate::model::{ImageFit, TextAlign};
use crate::renderer::{NodeContent, ShapeGeometry};

const PLACEHOLDER_FILL: Rgba = Rgba::rgb(243, 244, 246);
const PLACEHOLDER_STROKE: Rgba = Rgba::rgb(156, 163, 175);
const FAILED_STROKE: Rgba = Rgba::rgb(239, 68, 68);
// Cubic approximation of a quarter circle.
const KAPPA: f32 = 0.552_284_8;

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn solid(c: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(c));
    paint.anti_alias = true;
    paint
}

fn encoding_failed(e: impl std::fmt::Display) -> ExportError {
    ExportError::EncodingFailed {
        reason: e.to_string(),
    }
}

/// Rasterizes layouts. Media must be registered by url before export;
/// unregistered images render as placeholders.
#[derive(Default)]
pub struct RasterBackend {
    media: RwLock<HashMap<String, Pixmap>>,
}

impl RasterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and make them available for elements showing `url`.
    pub fn register_media(&self, url: impl Into<String>, bytes: &[u8]) -> Result<(), ExportError> {
        let decoded = image::load_from_memory(bytes).map_err(encoding_failed)?.to_rgba8();
        let (w, h) = decoded.dimensions();
        let size = IntSize::from_wh(w, h).ok_or(ExportError::EmptyCanvas { width: w, height: h })?;

        let mut data = decoded.into_raw();
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
        let pixmap = Pixmap::from_vec(data, size).ok_or_else(|| encoding_failed("bad media buffer"))?;
        self.media.write().insert(url.into(), pixmap);
        Ok(())
    }

    pub fn has_media(&self, url: &str) -> bool {
        self.media.read().contains_key(url)
    }

    /// Draw a layout into a new pixmap.
    pub fn render_pixmap(&self, layout: &ExportLayout) -> Result<Pixmap, ExportError> {
        let (width, height) = layout.pixel_size()?;
        let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::EmptyCanvas { width, height })?;
        pixmap.fill(to_color(layout.background));

        for item in &layout.items {
            self.draw_item(&mut pixmap, item);
        }
        Ok(pixmap)
    }

    fn draw_item(&self, pixmap: &mut Pixmap, item: &ExportItem) {
        let ts = item.transform.to_tiny_skia();
        let (w, h) = (item.width as f32, item.height as f32);
        let Some(frame) = Rect::from_xywh(0.0, 0.0, w, h) else {
            // Zero-area element
            return;
        };

        let outline = match &item.content {
            NodeContent::Shape { geometry, fill } => {
                let path = shape_path(geometry, w, h);
                if let Some(path) = &path {
                    let paint = solid(fill.with_opacity(item.opacity));
                    pixmap.fill_path(path, &paint, FillRule::Winding, ts, None);
                }
                path
            }
            NodeContent::Text { .. } => {
                draw_text(pixmap, item);
                Some(PathBuilder::from_rect(frame))
            }
            NodeContent::Image { url, fit, status, .. } => {
                let media = self.media.read();
                let source = match (status, url) {
                    (AssetStatus::Loaded, Some(url)) => media.get(url),
                    _ => None,
                };
                let rect = PathBuilder::from_rect(frame);
                match source {
                    Some(image) => draw_image(pixmap, image, *fit, item),
                    None => {
                        if *status == AssetStatus::Loaded {
                            tracing::debug!("No media registered for {}", item.element_id);
                        }
                        let stroke = if *status == AssetStatus::Failed {
                            FAILED_STROKE
                        } else {
                            PLACEHOLDER_STROKE
                        };
                        pixmap.fill_path(
                            &rect,
                            &solid(PLACEHOLDER_FILL.with_opacity(item.opacity)),
                            FillRule::Winding,
                            ts,
                            None,
                        );
                        pixmap.stroke_path(
                            &rect,
                            &solid(stroke.with_opacity(item.opacity)),
                            &Stroke::default(),
                            ts,
                            None,
                        );
                    }
                }
                Some(rect)
            }
        };

        if let (Some((width, color)), Some(path)) = (item.border, outline) {
            let stroke = Stroke {
                width: width as f32,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &solid(color.with_opacity(item.opacity)), &stroke, ts, None);
        }
    }

    fn encode(&self, pixmap: &Pixmap, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let flat = RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
            .ok_or_else(|| encoding_failed("pixel buffer size mismatch"))?;

        let mut bytes = Vec::new();
        match options.format {
            ExportFormat::Png => {
                DynamicImage::ImageRgba8(flat)
                    .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                    .map_err(encoding_failed)?;
            }
            ExportFormat::Jpeg => {
                // JPEG has no alpha: composite on white.
                let rgb = RgbImage::from_fn(flat.width(), flat.height(), |x, y| {
                    let p = flat.get_pixel(x, y).0;
                    let a = p[3] as u16;
                    let over = |c: u8| ((c as u16 * a + 255 * (255 - a) + 127) / 255) as u8;
                    image::Rgb([over(p[0]), over(p[1]), over(p[2])])
                });
                JpegEncoder::new_with_quality(&mut bytes, options.quality.clamp(1, 100))
                    .encode_image(&rgb)
                    .map_err(encoding_failed)?;
            }
            other => {
                return Err(ExportError::UnsupportedFormat {
                    format: other.to_string(),
                    backend: self.name().to_string(),
                })
            }
        }
        Ok(bytes)
    }
}

impl ExportBackend for RasterBackend {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn supports(&self, format: ExportFormat) -> bool {
        format.is_raster()
    }

    fn render(
        &self,
        layout: &ExportLayout,
        options: &ExportOptions,
    ) -> Result<ExportOutput, ExportError> {
        if !self.supports(options.format) {
            return Err(ExportError::UnsupportedFormat {
                format: options.format.to_string(),
                backend: self.name().to_string(),
            });
        }
        let pixmap = self.render_pixmap(layout)?;
        let bytes = self.encode(&pixmap, options)?;
        tracing::debug!(
            "Rasterized {}x{} {} ({} bytes)",
            pixmap.width(),
            pixmap.height(),
            options.format,
            bytes.len()
        );
        Ok(ExportOutput::new(options.format, bytes))
    }
}

impl std::fmt::Debug for RasterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBackend")
            .field("media", &self.media.read().len())
            .finish()
    }
}

fn shape_path(geometry: &ShapeGeometry, w: f32, h: f32) -> Option<Path> {
    match geometry {
        ShapeGeometry::Rect { corner_radius } if *corner_radius > 0.0 => {
            rounded_rect(w, h, (*corner_radius as f32).min(w / 2.0).min(h / 2.0))
        }
        ShapeGeometry::Rect { .. } => Rect::from_xywh(0.0, 0.0, w, h).map(PathBuilder::from_rect),
        ShapeGeometry::Ellipse => Rect::from_xywh(0.0, 0.0, w, h).and_then(PathBuilder::from_oval),
        ShapeGeometry::Polygon(points) => {
            let mut pb = PathBuilder::new();
            for (i, (x, y)) in points.iter().enumerate() {
                let (px, py) = (*x as f32 * w, *y as f32 * h);
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
            pb.finish()
        }
    }
}

fn rounded_rect(w: f32, h: f32, r: f32) -> Option<Path> {
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    pb.cubic_to(w - r + k, 0.0, w, r - k, w, r);
    pb.line_to(w, h - r);
    pb.cubic_to(w, h - r + k, w - r + k, h, w - r, h);
    pb.line_to(r, h);
    pb.cubic_to(r - k, h, 0.0, h - r + k, 0.0, h - r);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, r - k, r - k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

fn draw_image(pixmap: &mut Pixmap, image: &Pixmap, fit: ImageFit, item: &ExportItem) {
    let (iw, ih) = (image.width() as f64, image.height() as f64);
    let (sx, sy) = match fit {
        ImageFit::Contain => {
            let s = (item.width / iw).min(item.height / ih);
            (s, s)
        }
        ImageFit::Cover => {
            let s = (item.width / iw).max(item.height / ih);
            (s, s)
        }
        ImageFit::Fill => (item.width / iw, item.height / ih),
    };
    let ox = (item.width - iw * sx) / 2.0;
    let oy = (item.height - ih * sy) / 2.0;

    // Visible part: the scaled image clipped to the element box.
    let left = ox.max(0.0);
    let top = oy.max(0.0);
    let right = (ox + iw * sx).min(item.width);
    let bottom = (oy + ih * sy).min(item.height);
    let Some(visible) = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32) else {
        return;
    };

    let local = Transform::scale(sx, sy).then(&Transform::translate(ox, oy));
    let paint = Paint {
        shader: Pattern::new(
            image.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            item.opacity as f32,
            local.to_tiny_skia(),
        ),
        anti_alias: true,
        ..Default::default()
    };
    pixmap.fill_rect(visible, &paint, item.transform.to_tiny_skia(), None);
}

/// Glyphs are drawn into an element-sized layer, then composited with the
/// element transform so rotation applies to text too.
fn draw_text(pixmap: &mut Pixmap, item: &ExportItem) {
    let NodeContent::Text {
        text,
        font_family,
        font_size_px,
        font_weight,
        color,
        align,
        line_height,
    } = &item.content
    else {
        return;
    };
    let Some(font) = font_for(font_family, *font_weight) else {
        return;
    };
    let (lw, lh) = (item.width.ceil().max(1.0) as u32, item.height.ceil().max(1.0) as u32);
    let Some(mut layer) = Pixmap::new(lw, lh) else {
        return;
    };

    let scale = Scale::uniform(*font_size_px as f32);
    let ascent = font.v_metrics(scale).ascent;
    let step = (*font_size_px * *line_height) as f32;

    for (i, line) in text.split('\n').enumerate() {
        let baseline = ascent + i as f32 * step;
        let line_width = font
            .layout(line, scale, rt_point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let x = match align {
            TextAlign::Center => (item.width as f32 - line_width) / 2.0,
            TextAlign::Right => item.width as f32 - line_width,
            TextAlign::Left | TextAlign::Justify => 0.0,
        };

        for glyph in font.layout(line, scale, rt_point(x, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px >= lw as i32 || py >= lh as i32 {
                    return;
                }
                let idx = ((py as u32 * lw + px as u32) * 4) as usize;
                blend_pixel(&mut layer.data_mut()[idx..idx + 4], *color, coverage);
            });
        }
    }

    let paint = PixmapPaint {
        opacity: item.opacity as f32,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, item.transform.to_tiny_skia(), None);
}

/// Source-over of `color` at `coverage` onto a premultiplied RGBA pixel.
fn blend_pixel(dst: &mut [u8], color: Rgba, coverage: f32) {
    let a = (color.alpha_f32() * coverage.clamp(0.0, 1.0) * 255.0).round() as u16;
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    let src = [color.r, color.g, color.b];
    for (d, s) in dst[..3].iter_mut().zip(src) {
        *d = ((s as u16 * a + *d as u16 * inv + 127) / 255) as u8;
    }
    dst[3] = (a + (dst[3] as u16 * inv + 127) / 255).min(255) as u8;
}
