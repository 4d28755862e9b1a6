//! Unit conversion and geometry utilities
//!
//! The print area is defined in millimeters; the editor draws in CSS pixels.
//! 1 inch = 25.4 mm = 96 CSS px = 72 pt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CSS reference pixels per inch
pub const CSS_PX_PER_INCH: f64 = 96.0;
/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;
/// Typographic points per inch
pub const PT_PER_INCH: f64 = 72.0;

/// Pixels per millimeter at the CSS reference density (≈ 3.7795)
pub const PX_PER_MM: f64 = CSS_PX_PER_INCH / MM_PER_INCH;

/// Convert millimeters to CSS pixels.
pub fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// Convert CSS pixels to millimeters.
pub fn px_to_mm(px: f64) -> f64 {
    px / PX_PER_MM
}

/// Convert millimeters to device pixels at an arbitrary density.
pub fn mm_to_px_at(mm: f64, dpi: f64) -> f64 {
    mm * dpi / MM_PER_INCH
}

/// Convert typographic points to CSS pixels.
pub fn pt_to_px(pt: f64) -> f64 {
    pt * CSS_PX_PER_INCH / PT_PER_INCH
}

/// Clamp `value` into `[lo, hi]`. If the range is inverted, `lo` wins.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if hi < lo {
        return lo;
    }
    value.max(lo).min(hi)
}

/// Round to a whole pixel, half away from zero.
pub fn round_px(value: f64) -> f64 {
    if value.is_finite() {
        value.round()
    } else {
        0.0
    }
}

/// Normalize an angle in degrees into (-180, 180].
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut r = degrees % 360.0;
    if r <= -180.0 {
        r += 360.0;
    } else if r > 180.0 {
        r -= 360.0;
    }
    r
}

/// Rotate a point around a pivot.
pub fn rotate_point(x: f64, y: f64, cx: f64, cy: f64, angle_deg: f64) -> (f64, f64) {
    if angle_deg.abs() < 1e-9 {
        return (x, y);
    }
    let angle_rad = angle_deg.to_radians();
    let (sin_a, cos_a) = angle_rad.sin_cos();
    let dx = x - cx;
    let dy = y - cy;
    (cx + dx * cos_a - dy * sin_a, cy + dx * sin_a + dy * cos_a)
}

/// Axis-aligned box, top-left origin, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Edges are inclusive.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Move the box so it lies inside `container`. A box larger than the
    /// container is shrunk to fit on that axis.
    pub fn clamp_within(&self, container: &Bounds) -> Bounds {
        let width = self.width.min(container.width).max(0.0);
        let height = self.height.min(container.height).max(0.0);
        let x = clamp(self.x, container.x, container.right() - width);
        let y = clamp(self.y, container.y, container.bottom() - height);
        Bounds::new(x, y, width, height)
    }

    /// Axis-aligned bounds of this box rotated about its center.
    pub fn rotated(&self, angle_deg: f64) -> Bounds {
        if angle_deg.abs() < 1e-9 {
            return *self;
        }
        let (cx, cy) = self.center();
        let corners = [
            (self.x, self.y),
            (self.right(), self.y),
            (self.right(), self.bottom()),
            (self.x, self.bottom()),
        ];
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (px, py) in corners {
            let (rx, ry) = rotate_point(px, py, cx, cy, angle_deg);
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }
        Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Shrink on every side.
    pub fn inset(&self, d: f64) -> Bounds {
        Bounds::new(
            self.x + d,
            self.y + d,
            (self.width - 2.0 * d).max(0.0),
            (self.height - 2.0 * d).max(0.0),
        )
    }

    /// Grow on every side.
    pub fn outset(&self, d: f64) -> Bounds {
        Bounds::new(
            self.x - d,
            self.y - d,
            self.width + 2.0 * d,
            self.height + 2.0 * d,
        )
    }

    pub fn scaled(&self, factor: f64) -> Bounds {
        Bounds::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

/// Measurement system used for dimension labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a length given in millimeters for display.
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.1}", value_mm),
        MeasurementSystem::Imperial => format!("{:.2}", value_mm / MM_PER_INCH),
    }
}

/// Parse a user-entered length into millimeters.
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }
    let value = input.parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() {
        return Err(format!("Not a finite number: {}", input));
    }
    Ok(match system {
        MeasurementSystem::Metric => value,
        MeasurementSystem::Imperial => value * MM_PER_INCH,
    })
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}
