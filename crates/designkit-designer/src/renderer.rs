//! Render projection of the designer state.
//!
//! [`project`] turns a [`DesignerState`] into a [`RenderTree`]: one absolutely
//! positioned node per visible element in paint order, plus editor overlays.
//! An [`InteractionStrategy`] decorates the tree (selection handles) and turns
//! pointer gestures into [`DesignerCommand`]s. Rendering never mutates state.
//!
//! Units: element frames are canvas pixels; tree coordinates are output
//! pixels, i.e. canvas pixels times `RenderContext::zoom`.

use std::sync::Arc;

use designkit_core::units::{clamp, normalize_rotation, pt_to_px, round_px, Bounds, PX_PER_MM};

use crate::assets::{AssetStatus, AssetStatusRegistry};
use crate::canvas::{OverlayOptions, PreviewScales};
use crate::color::Rgba;
use crate::commands::DesignerCommand;
use crate::designer_state::DesignerState;
use crate::model::{
    CanvasElement, ElementKind, ElementPatch, ImageFit, ShapeKind, TextAlign, DEFAULT_CORNER_RADIUS,
};

/// Line height used when an element does not set one.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;
/// Side of a resize handle, output pixels.
pub const HANDLE_SIZE: f64 = 8.0;
/// Smallest width/height an interactive resize may emit, canvas pixels.
pub const MIN_ELEMENT_SIZE: f64 = 1.0;
/// Most grid lines drawn along one axis; finer spacings are coarsened.
pub const MAX_GRID_LINES: usize = 1000;

/// Inputs of a projection besides the state itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Canvas pixels per millimeter.
    pub px_per_mm: f64,
    /// Output pixels per canvas pixel.
    pub zoom: f64,
    pub overlays: OverlayOptions,
    pub asset_status: Option<Arc<AssetStatusRegistry>>,
}

impl RenderContext {
    pub fn new(px_per_mm: f64) -> Self {
        Self {
            px_per_mm,
            zoom: 1.0,
            overlays: OverlayOptions::default(),
            asset_status: None,
        }
    }

    /// Live editor view: editor density and the canvas zoom.
    pub fn editor(state: &DesignerState, scales: &PreviewScales) -> Self {
        Self::new(scales.editor_px_per_mm).with_zoom(state.canvas().zoom)
    }

    /// Print-preview dialog: editor density scaled by the preview factor.
    pub fn print_preview(scales: &PreviewScales) -> Self {
        Self::new(scales.editor_px_per_mm).with_zoom(scales.print_preview_factor)
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_overlays(mut self, overlays: OverlayOptions) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn with_asset_status(mut self, registry: Arc<AssetStatusRegistry>) -> Self {
        self.asset_status = Some(registry);
        self
    }

    fn asset_status_of(&self, element: &CanvasElement) -> AssetStatus {
        match &self.asset_status {
            Some(registry) => registry.status_of(element),
            None if element.is_pending_media() => AssetStatus::Pending,
            None => AssetStatus::Loaded,
        }
    }

    /// Font size in output pixels for a size given in points.
    pub fn font_px(&self, pt: f64) -> f64 {
        pt_to_px(pt) * (self.px_per_mm / PX_PER_MM) * self.zoom
    }
}

/// Geometry of a shape node relative to its frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Rectangle with optional rounded corners (output pixels).
    Rect { corner_radius: f64 },
    /// Ellipse inscribed in the frame.
    Ellipse,
    /// Closed polygon, points as fractions of the frame (0..=1).
    Polygon(Vec<(f64, f64)>),
}

impl ShapeGeometry {
    fn for_kind(kind: ShapeKind, corner_radius: Option<f64>, zoom: f64) -> Self {
        match kind {
            ShapeKind::Rectangle => ShapeGeometry::Rect {
                corner_radius: corner_radius.unwrap_or(0.0).max(0.0) * zoom,
            },
            ShapeKind::RoundedRectangle => ShapeGeometry::Rect {
                corner_radius: corner_radius.unwrap_or(DEFAULT_CORNER_RADIUS).max(0.0) * zoom,
            },
            ShapeKind::Circle => ShapeGeometry::Ellipse,
            ShapeKind::Triangle => {
                ShapeGeometry::Polygon(vec![(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)])
            }
        }
    }

    /// CSS `border-radius` for DOM hosts.
    pub fn css_border_radius(&self) -> Option<String> {
        match self {
            ShapeGeometry::Rect { corner_radius } if *corner_radius > 0.0 => {
                Some(format!("{}px", corner_radius))
            }
            ShapeGeometry::Ellipse => Some("50%".to_string()),
            _ => None,
        }
    }

    /// CSS `clip-path` for DOM hosts.
    pub fn css_clip_path(&self) -> Option<String> {
        match self {
            ShapeGeometry::Polygon(points) => {
                let pts: Vec<String> = points
                    .iter()
                    .map(|(x, y)| format!("{}% {}%", x * 100.0, y * 100.0))
                    .collect();
                Some(format!("polygon({})", pts.join(", ")))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Text {
        text: String,
        font_family: String,
        font_size_px: f64,
        font_weight: u16,
        color: Rgba,
        align: TextAlign,
        line_height: f64,
    },
    Image {
        url: Option<String>,
        fit: ImageFit,
        alt: Option<String>,
        status: AssetStatus,
    },
    Shape {
        geometry: ShapeGeometry,
        fill: Rgba,
    },
}

/// One element, positioned in output pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub element_id: String,
    pub frame: Bounds,
    /// Degrees in (-180, 180], about the frame center.
    pub rotation: f64,
    pub opacity: f64,
    pub z: i64,
    pub selected: bool,
    pub locked: bool,
    pub border: Option<(f64, Rgba)>,
    pub content: NodeContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Grid line offsets in output pixels.
    Grid {
        vertical: Vec<f64>,
        horizontal: Vec<f64>,
    },
    SafeZone(Bounds),
    Bleed(Bounds),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandleKind {
    pub const ALL: [HandleKind; 4] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomRight,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub element_id: String,
    pub kind: HandleKind,
    pub bounds: Bounds,
}

/// Output of a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    pub width: f64,
    pub height: f64,
    pub background: Rgba,
    pub preview: bool,
    /// Bottom-most first.
    pub nodes: Vec<RenderNode>,
    pub overlays: Vec<Overlay>,
    pub handles: Vec<Handle>,
}

impl RenderTree {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.element_id == id)
    }

    /// Top-most node under an output-pixel point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&RenderNode> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.frame.rotated(n.rotation).contains_point(x, y))
    }

    pub fn handle_at(&self, x: f64, y: f64) -> Option<&Handle> {
        self.handles.iter().find(|h| h.bounds.contains_point(x, y))
    }
}

/// Indices of `elements` in paint order: ascending z-index, ties kept in
/// array order.
pub fn paint_order(elements: &[CanvasElement]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].effective_z_index(i));
    order
}

fn project_element(
    element: &CanvasElement,
    z: i64,
    selected: bool,
    ctx: &RenderContext,
) -> RenderNode {
    let props = &element.properties;
    let content = match &element.kind {
        ElementKind::Text(t) => NodeContent::Text {
            text: t.content.clone(),
            font_family: t.font_family.clone(),
            font_size_px: ctx.font_px(t.font_size),
            font_weight: t.font_weight,
            color: Rgba::resolve(&t.color, Rgba::BLACK),
            align: props.text_align.unwrap_or_default(),
            line_height: props.line_height.unwrap_or(DEFAULT_LINE_HEIGHT),
        },
        ElementKind::Image(i) => NodeContent::Image {
            url: element.url.clone().filter(|u| !u.is_empty()),
            fit: i.fit,
            alt: i.alt.clone(),
            status: ctx.asset_status_of(element),
        },
        ElementKind::Shape(s) => NodeContent::Shape {
            geometry: ShapeGeometry::for_kind(s.shape_type, props.corner_radius, ctx.zoom),
            fill: Rgba::resolve(&s.fill_color, Rgba::BLACK),
        },
    };

    RenderNode {
        element_id: element.id.clone(),
        frame: element.bounds().scaled(ctx.zoom),
        rotation: normalize_rotation(element.rotation),
        opacity: props.effective_opacity(),
        z,
        selected,
        locked: props.locked,
        border: props
            .border()
            .map(|(w, c)| (w * ctx.zoom, Rgba::resolve(c, Rgba::BLACK))),
        content,
    }
}

fn editor_overlays(state: &DesignerState, ctx: &RenderContext, width: f64, height: f64) -> Vec<Overlay> {
    let canvas = state.canvas();
    let scale = ctx.px_per_mm * ctx.zoom;
    let page = Bounds::new(0.0, 0.0, width, height);
    let mut overlays = Vec::new();

    let spacing = ctx.overlays.grid_spacing_mm * scale;
    if canvas.show_grid && spacing > 0.0 && spacing.is_finite() {
        let longest = width.max(height);
        let step = spacing * (longest / spacing / MAX_GRID_LINES as f64).ceil().max(1.0);
        let lines = |extent: f64| -> Vec<f64> {
            // Last line would sit on the page edge
            let count = ((extent - 1e-6) / step).floor().max(0.0) as usize;
            (1..=count).map(|i| i as f64 * step).collect()
        };
        overlays.push(Overlay::Grid {
            vertical: lines(width),
            horizontal: lines(height),
        });
    }
    if canvas.show_safe_zone {
        overlays.push(Overlay::SafeZone(page.inset(ctx.overlays.safe_zone_mm * scale)));
    }
    if canvas.show_bleed {
        overlays.push(Overlay::Bleed(page.outset(ctx.overlays.bleed_mm * scale)));
    }
    overlays
}

/// Project the state into a render tree (no interaction decoration).
pub fn project(state: &DesignerState, ctx: &RenderContext) -> RenderTree {
    let canvas = state.canvas();
    let (w, h) = canvas.size_px(ctx.px_per_mm);
    let width = w * ctx.zoom;
    let height = h * ctx.zoom;
    let elements = state.elements();
    let selected_id = state.selected_id();

    let nodes = paint_order(elements)
        .into_iter()
        .filter(|&i| elements[i].is_visible())
        .map(|i| {
            let e = &elements[i];
            project_element(e, e.effective_z_index(i), selected_id == Some(e.id.as_str()), ctx)
        })
        .collect();

    let overlays = if state.is_preview_mode() {
        Vec::new()
    } else {
        editor_overlays(state, ctx, width, height)
    };

    RenderTree {
        width,
        height,
        background: Rgba::resolve(&canvas.background_color, Rgba::WHITE),
        preview: state.is_preview_mode(),
        nodes,
        overlays,
        handles: Vec::new(),
    }
}

/// Corner-resize of `frame` by a pointer delta (canvas pixels).
pub fn resize_frame(frame: Bounds, handle: HandleKind, dx: f64, dy: f64) -> Bounds {
    let (mut left, mut top, mut right, mut bottom) = (frame.x, frame.y, frame.right(), frame.bottom());
    match handle {
        HandleKind::TopLeft => {
            left += dx;
            top += dy;
        }
        HandleKind::TopRight => {
            right += dx;
            top += dy;
        }
        HandleKind::BottomLeft => {
            left += dx;
            bottom += dy;
        }
        HandleKind::BottomRight => {
            right += dx;
            bottom += dy;
        }
    }
    Bounds::new(
        left.min(right),
        top.min(bottom),
        (right - left).abs(),
        (bottom - top).abs(),
    )
}

/// How a projection reacts to the pointer.
///
/// The static strategy ignores gestures; the interactive one adds handles and
/// emits commands. Neither touches the state.
pub trait InteractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Add interaction affordances to a projected tree.
    fn decorate(&self, _state: &DesignerState, _ctx: &RenderContext, _tree: &mut RenderTree) {}

    /// Pointer pressed at an output-pixel point.
    fn pointer_down(&self, _tree: &RenderTree, _x: f64, _y: f64) -> Option<DesignerCommand> {
        None
    }

    /// Drag released with the element's new top-left corner (canvas pixels).
    fn finish_move(
        &self,
        _state: &DesignerState,
        _ctx: &RenderContext,
        _id: &str,
        _x: f64,
        _y: f64,
    ) -> Option<DesignerCommand> {
        None
    }

    /// Resize released with the element's new frame (canvas pixels).
    fn finish_resize(
        &self,
        _state: &DesignerState,
        _ctx: &RenderContext,
        _id: &str,
        _frame: Bounds,
    ) -> Option<DesignerCommand> {
        None
    }
}

/// Embedded previews and print preview: no handles, no gestures.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticStrategy;

impl InteractionStrategy for StaticStrategy {
    fn name(&self) -> &'static str {
        "static"
    }
}

/// Editor canvas: selection handles, drag-to-move, corner-resize.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveStrategy;

impl InteractiveStrategy {
    /// Unlocked element and the canvas bounds it must stay inside.
    fn target<'a>(
        state: &'a DesignerState,
        ctx: &RenderContext,
        id: &str,
    ) -> Option<(&'a CanvasElement, Bounds)> {
        let Some(element) = state.element(id) else {
            tracing::debug!("Gesture on unknown element {}", id);
            return None;
        };
        if element.is_locked() {
            tracing::debug!("Gesture on locked element {}", id);
            return None;
        }
        let (w, h) = state.canvas().size_px(ctx.px_per_mm);
        Some((element, Bounds::new(0.0, 0.0, w, h)))
    }
}

impl InteractionStrategy for InteractiveStrategy {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn decorate(&self, state: &DesignerState, _ctx: &RenderContext, tree: &mut RenderTree) {
        if tree.preview {
            return;
        }
        let Some(node) = state.selected_id().and_then(|id| tree.node(id)) else {
            return;
        };
        if node.locked {
            return;
        }

        let f = node.frame;
        let half = HANDLE_SIZE / 2.0;
        let handles = HandleKind::ALL
            .iter()
            .map(|&kind| {
                let (cx, cy) = match kind {
                    HandleKind::TopLeft => (f.x, f.y),
                    HandleKind::TopRight => (f.right(), f.y),
                    HandleKind::BottomLeft => (f.x, f.bottom()),
                    HandleKind::BottomRight => (f.right(), f.bottom()),
                };
                Handle {
                    element_id: node.element_id.clone(),
                    kind,
                    bounds: Bounds::new(cx - half, cy - half, HANDLE_SIZE, HANDLE_SIZE),
                }
            })
            .collect();
        tree.handles = handles;
    }

    fn pointer_down(&self, tree: &RenderTree, x: f64, y: f64) -> Option<DesignerCommand> {
        if tree.preview {
            return None;
        }
        Some(DesignerCommand::SelectElement(
            tree.hit_test(x, y).map(|n| n.element_id.clone()),
        ))
    }

    fn finish_move(
        &self,
        state: &DesignerState,
        ctx: &RenderContext,
        id: &str,
        x: f64,
        y: f64,
    ) -> Option<DesignerCommand> {
        let (element, page) = Self::target(state, ctx, id)?;
        let nx = snap_inside(x, element.width, page.width);
        let ny = snap_inside(y, element.height, page.height);
        if nx == element.x && ny == element.y {
            return None;
        }
        Some(DesignerCommand::update(id, ElementPatch::position(nx, ny)))
    }

    fn finish_resize(
        &self,
        state: &DesignerState,
        ctx: &RenderContext,
        id: &str,
        frame: Bounds,
    ) -> Option<DesignerCommand> {
        let (element, page) = Self::target(state, ctx, id)?;
        let max_w = page.width.max(MIN_ELEMENT_SIZE);
        let max_h = page.height.max(MIN_ELEMENT_SIZE);
        let sized = Bounds::new(
            frame.x,
            frame.y,
            clamp(round_px(frame.width), MIN_ELEMENT_SIZE, max_w.floor()),
            clamp(round_px(frame.height), MIN_ELEMENT_SIZE, max_h.floor()),
        )
        .clamp_within(&page);
        let patch = ElementPatch::frame(
            snap_inside(sized.x, sized.width, page.width),
            snap_inside(sized.y, sized.height, page.height),
            sized.width,
            sized.height,
        );
        if (patch.x, patch.y, patch.width, patch.height)
            == (
                Some(element.x),
                Some(element.y),
                Some(element.width),
                Some(element.height),
            )
        {
            return None;
        }
        Some(DesignerCommand::update(id, patch))
    }
}

/// Round `origin` to a whole pixel that keeps `origin + size` within `0..=limit`.
fn snap_inside(origin: f64, size: f64, limit: f64) -> f64 {
    clamp(round_px(origin), 0.0, (limit - size).max(0.0).floor())
}

/// Projection plus an interaction strategy.
pub struct Renderer {
    strategy: Box<dyn InteractionStrategy>,
}

impl Renderer {
    pub fn new(strategy: Box<dyn InteractionStrategy>) -> Self {
        Self { strategy }
    }

    pub fn static_preview() -> Self {
        Self::new(Box::new(StaticStrategy))
    }

    pub fn interactive() -> Self {
        Self::new(Box::new(InteractiveStrategy))
    }

    pub fn strategy(&self) -> &dyn InteractionStrategy {
        self.strategy.as_ref()
    }

    pub fn render(&self, state: &DesignerState, ctx: &RenderContext) -> RenderTree {
        let mut tree = project(state, ctx);
        self.strategy.decorate(state, ctx, &mut tree);
        tree
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
