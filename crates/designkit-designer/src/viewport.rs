//! Viewport and coordinate transformation for the editor view.
//!
//! Converts between screen pixels (host widget space) and canvas pixels
//! (element space). Both have (0,0) at the top-left with +Y going down.
//! Canvas pixels relate to millimeters through `px_per_mm`.

use std::fmt;

use crate::canvas::CanvasSettings;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;

/// Zoom and pan of the editor view.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    px_per_mm: f64,
}

impl Viewport {
    /// Creates a viewport at 100% with no pan.
    pub fn new(px_per_mm: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            px_per_mm,
        }
    }

    pub fn px_per_mm(&self) -> f64 {
        self.px_per_mm
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to [`MIN_ZOOM`, `MAX_ZOOM`].
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Canvas pixels to screen pixels.
    ///
    /// ```text
    /// screen = canvas * zoom + pan
    /// ```
    pub fn canvas_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }

    /// Screen pixels to canvas pixels.
    pub fn screen_to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// A pointer delta measured on screen, in canvas pixels.
    pub fn screen_delta_to_canvas(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.zoom, dy / self.zoom)
    }

    pub fn mm_to_canvas(&self, mm: f64) -> f64 {
        mm * self.px_per_mm
    }

    pub fn canvas_to_mm(&self, px: f64) -> f64 {
        px / self.px_per_mm
    }

    /// Fits the print area into a `view_width` x `view_height` widget,
    /// reserving `padding` (0.0 - 0.5) of each side, and centers it.
    pub fn fit_canvas(
        &mut self,
        canvas: &CanvasSettings,
        view_width: f64,
        view_height: f64,
        padding: f64,
    ) {
        let (width, height) = canvas.size_px(self.px_per_mm);
        if width <= 0.0 || height <= 0.0 || view_width <= 0.0 || view_height <= 0.0 {
            return;
        }

        let padding_factor = 1.0 - padding.clamp(0.0, 0.49) * 2.0;
        let zoom_x = view_width * padding_factor / width;
        let zoom_y = view_height * padding_factor / height;
        self.zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        self.pan_x = (view_width - width * self.zoom) / 2.0;
        self.pan_y = (view_height - height * self.zoom) / 2.0;
    }

    /// Zooms while keeping the canvas point under `(screen_x, screen_y)` fixed.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, new_zoom: f64) {
        let (cx, cy) = self.screen_to_canvas(screen_x, screen_y);
        self.set_zoom(new_zoom);
        self.pan_x = screen_x - cx * self.zoom;
        self.pan_y = screen_y - cy * self.zoom;
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}
