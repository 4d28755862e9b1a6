//! Hex color parsing shared by the renderers and export backends.

use designkit_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidColor(input.to_string());
        let hex = input.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let nibble = |i: usize| -> Result<u8, ValidationError> {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        let byte = |i: usize| -> Result<u8, ValidationError> {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Lenient parse used while drawing: a bad value falls back and is logged.
    pub fn resolve(input: &str, fallback: Rgba) -> Rgba {
        match Rgba::from_hex(input) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("{}, using {}", e, fallback);
                fallback
            }
        }
    }

    /// Multiplies alpha by `opacity` (clamped to [0, 1]).
    pub fn with_opacity(self, opacity: f64) -> Rgba {
        let o = opacity.clamp(0.0, 1.0);
        Rgba {
            a: (self.a as f64 * o).round() as u8,
            ..self
        }
    }

    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.to_hex_rgb())
        } else {
            write!(f, "{}{:02x}", self.to_hex_rgb(), self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::from_hex(s)
    }
}
