//! 2-D affine transform in page pixels (y down).
//!
//! ```text
//! x' = sx * x + kx * y + tx
//! y' = ky * x + sy * y + ty
//! ```

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub ky: f64,
    pub kx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            sx: 1.0,
            ky: 0.0,
            kx: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            sx,
            sy,
            ..Self::identity()
        }
    }

    /// Clockwise on screen for positive degrees.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            sx: cos,
            ky: sin,
            kx: -sin,
            sy: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn rotate_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Transform::translate(-cx, -cy)
            .then(&Transform::rotate(degrees))
            .then(&Transform::translate(cx, cy))
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            sx: next.sx * self.sx + next.kx * self.ky,
            ky: next.ky * self.sx + next.sy * self.ky,
            kx: next.sx * self.kx + next.kx * self.sy,
            sy: next.ky * self.kx + next.sy * self.sy,
            tx: next.sx * self.tx + next.kx * self.ty + next.tx,
            ty: next.ky * self.tx + next.sy * self.ty + next.ty,
        }
    }

    /// Rotation about a local point applied before `self`.
    pub fn pre_rotate_about(&self, degrees: f64, cx: f64, cy: f64) -> Transform {
        if degrees == 0.0 {
            return *self;
        }
        Transform::rotate_about(degrees, cx, cy).then(self)
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.sx * x + self.kx * y + self.tx,
            self.ky * x + self.sy * y + self.ty,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "matrix({} {} {} {} {} {})",
            fmt_num(self.sx),
            fmt_num(self.ky),
            fmt_num(self.kx),
            fmt_num(self.sy),
            fmt_num(self.tx),
            fmt_num(self.ty)
        )
    }

    pub fn to_tiny_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.sx as f32,
            self.ky as f32,
            self.kx as f32,
            self.sy as f32,
            self.tx as f32,
            self.ty as f32,
        )
    }
}

/// Compact decimal for markup: at most 4 fractional digits, no trailing zeros.
pub(crate) fn fmt_num(v: f64) -> String {
    let v = if v.abs() < 1e-9 { 0.0 } else { v };
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
