//! SVG export backend.

use std::fmt::Write as _;

use designkit_core::ExportError;

use super::transform::fmt_num;
use super::{xml_escape, ExportBackend, ExportFormat, ExportItem, ExportLayout, ExportOptions, ExportOutput};
use crate::assets::AssetStatus;
use crate::color::Rgba;
use crate::model::TextAlign;
use crate::renderer::{NodeContent, ShapeGeometry};

const PLACEHOLDER_FILL: &str = "#f3f4f6";
const PLACEHOLDER_STROKE: &str = "#9ca3af";
const FAILED_STROKE: &str = "#ef4444";

/// Writes a standalone SVG document. Images are referenced by url.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBackend;

impl SvgBackend {
    pub fn new() -> Self {
        Self
    }

    /// SVG markup for a layout.
    pub fn to_svg_string(&self, layout: &ExportLayout) -> String {
        let w = fmt_num(layout.width);
        let h = fmt_num(layout.height);
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = writeln!(
            out,
            r#"  <rect width="{w}" height="{h}" {}/>"#,
            paint_attr("fill", layout.background)
        );
        for item in &layout.items {
            write_item(&mut out, item);
        }
        out.push_str("</svg>\n");
        out
    }
}

impl ExportBackend for SvgBackend {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn supports(&self, format: ExportFormat) -> bool {
        format == ExportFormat::Svg
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
        layout.pixel_size()?;
        Ok(ExportOutput::new(
            ExportFormat::Svg,
            self.to_svg_string(layout).into_bytes(),
        ))
    }
}

/// `fill="#rrggbb"` plus an opacity attribute when translucent.
fn paint_attr(name: &str, color: Rgba) -> String {
    if color.is_opaque() {
        format!(r#"{}="{}""#, name, color.to_hex_rgb())
    } else {
        format!(
            r#"{}="{}" {}-opacity="{}""#,
            name,
            color.to_hex_rgb(),
            name,
            fmt_num(color.alpha_f32() as f64)
        )
    }
}

fn stroke_attr(border: Option<(f64, Rgba)>) -> String {
    match border {
        Some((width, color)) => format!(r#" {} stroke-width="{}""#, paint_attr("stroke", color), fmt_num(width)),
        None => String::new(),
    }
}

fn write_item(out: &mut String, item: &ExportItem) {
    let opacity = if item.opacity < 1.0 {
        format!(r#" opacity="{}""#, fmt_num(item.opacity))
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        r#"  <g id="{}" transform="{}"{}>"#,
        xml_escape(&item.element_id),
        item.transform.to_svg(),
        opacity
    );

    let w = fmt_num(item.width);
    let h = fmt_num(item.height);
    let mut outline = item.border.is_some();
    match &item.content {
        NodeContent::Shape { geometry, fill } => {
            outline = false;
            let stroke = stroke_attr(item.border);
            let fill = paint_attr("fill", *fill);
            match geometry {
                ShapeGeometry::Rect { corner_radius } if *corner_radius > 0.0 => {
                    let _ = writeln!(
                        out,
                        r#"    <rect width="{w}" height="{h}" rx="{}" {fill}{stroke}/>"#,
                        fmt_num(*corner_radius)
                    );
                }
                ShapeGeometry::Rect { .. } => {
                    let _ = writeln!(out, r#"    <rect width="{w}" height="{h}" {fill}{stroke}/>"#);
                }
                ShapeGeometry::Ellipse => {
                    let _ = writeln!(
                        out,
                        r#"    <ellipse cx="{}" cy="{}" rx="{}" ry="{}" {fill}{stroke}/>"#,
                        fmt_num(item.width / 2.0),
                        fmt_num(item.height / 2.0),
                        fmt_num(item.width / 2.0),
                        fmt_num(item.height / 2.0)
                    );
                }
                ShapeGeometry::Polygon(points) => {
                    let pts: Vec<String> = points
                        .iter()
                        .map(|(x, y)| format!("{},{}", fmt_num(x * item.width), fmt_num(y * item.height)))
                        .collect();
                    let _ = writeln!(
                        out,
                        r#"    <polygon points="{}" {fill}{stroke}/>"#,
                        pts.join(" ")
                    );
                }
            }
        }
        NodeContent::Text {
            text,
            font_family,
            font_size_px,
            font_weight,
            color,
            align,
            line_height,
        } => {
            let (x, anchor) = match align {
                TextAlign::Center => (item.width / 2.0, "middle"),
                TextAlign::Right => (item.width, "end"),
                TextAlign::Left | TextAlign::Justify => (0.0, "start"),
            };
            let _ = writeln!(
                out,
                r#"    <text font-family="{}" font-size="{}" font-weight="{}" text-anchor="{}" {}>"#,
                xml_escape(font_family),
                fmt_num(*font_size_px),
                font_weight,
                anchor,
                paint_attr("fill", *color)
            );
            for (i, line) in text.split('\n').enumerate() {
                let baseline = font_size_px + i as f64 * font_size_px * line_height;
                let _ = writeln!(
                    out,
                    r#"      <tspan x="{}" y="{}">{}</tspan>"#,
                    fmt_num(x),
                    fmt_num(baseline),
                    xml_escape(line)
                );
            }
            out.push_str("    </text>\n");
        }
        NodeContent::Image {
            url,
            fit,
            status,
            ..
        } => match (status, url) {
            (AssetStatus::Loaded, Some(url)) => {
                let _ = writeln!(
                    out,
                    r#"    <image href="{}" width="{w}" height="{h}" preserveAspectRatio="{}"/>"#,
                    xml_escape(url),
                    fit.preserve_aspect_ratio()
                );
            }
            (status, _) => {
                let stroke = if *status == AssetStatus::Failed {
                    FAILED_STROKE
                } else {
                    PLACEHOLDER_STROKE
                };
                let _ = writeln!(
                    out,
                    r#"    <rect width="{w}" height="{h}" fill="{PLACEHOLDER_FILL}" stroke="{stroke}" stroke-dasharray="4 4"/>"#
                );
            }
        },
    }

    if outline {
        let _ = writeln!(
            out,
            r#"    <rect width="{w}" height="{h}" fill="none"{}/>"#,
            stroke_attr(item.border)
        );
    }
    out.push_str("  </g>\n");
}
