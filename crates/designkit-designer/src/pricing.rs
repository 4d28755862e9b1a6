//! Cost estimate from print area and placed elements.

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasSettings;
use crate::model::{CanvasElement, ElementType};

/// Rates used to price a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRates {
    /// Flat price per design.
    pub base: f64,
    /// Price per square centimeter of print area.
    pub per_cm2: f64,
    pub per_text: f64,
    pub per_image: f64,
    pub per_shape: f64,
    /// ISO 4217 code.
    pub currency: String,
}

impl PricingRates {
    fn per_element(&self, kind: ElementType) -> f64 {
        match kind {
            ElementType::Text => self.per_text,
            ElementType::Image => self.per_image,
            ElementType::Shape => self.per_shape,
        }
    }
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            base: 0.0,
            per_cm2: 0.0,
            per_text: 0.0,
            per_image: 0.0,
            per_shape: 0.0,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Base price plus area charge.
    pub subtotal_area: f64,
    pub subtotal_elements: f64,
    pub total: f64,
    pub currency: String,
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Price a canvas. Hidden elements are free.
pub fn estimate_cost(
    canvas: &CanvasSettings,
    elements: &[CanvasElement],
    rates: &PricingRates,
) -> CostEstimate {
    let area_cm2 = (canvas.width_mm.max(0.0) / 10.0) * (canvas.height_mm.max(0.0) / 10.0);
    let subtotal_area = round_cents(rates.base + area_cm2 * rates.per_cm2);
    let subtotal_elements = round_cents(
        elements
            .iter()
            .filter(|e| e.is_visible())
            .map(|e| rates.per_element(e.element_type()))
            .sum(),
    );

    CostEstimate {
        subtotal_area,
        subtotal_elements,
        total: round_cents(subtotal_area + subtotal_elements),
        currency: rates.currency.clone(),
    }
}
