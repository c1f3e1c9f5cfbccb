use serde::{Deserialize, Serialize};

use crate::encoding::Attribute;
use crate::error::{PricingError, Result};

/// Attributes a user supplies for one diamond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub carat: f64,
    pub depth: f64,
    pub table: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub cut: String,
    pub color: String,
    pub clarity: String,
}

impl RawInput {
    pub fn label(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Cut => &self.cut,
            Attribute::Color => &self.color,
            Attribute::Clarity => &self.clarity,
        }
    }

    /// Each numeric field paired with the range it must fall in.
    fn numeric(&self, bounds: &InputBounds) -> [(&'static str, f64, Range); 6] {
        [
            ("carat", self.carat, bounds.carat),
            ("depth", self.depth, bounds.depth),
            ("table", self.table, bounds.table),
            ("x", self.x, bounds.x),
            ("y", self.y, bounds.y),
            ("z", self.z, bounds.z),
        ]
    }

    /// Reject non-finite values and values outside the form's slider bounds.
    pub fn validate(&self, bounds: &InputBounds) -> Result<()> {
        for (field, value, range) in self.numeric(bounds) {
            if !value.is_finite() {
                return Err(PricingError::InvalidInput(format!("{field} must be finite, got {value}")));
            }
            if !range.contains(value) {
                return Err(PricingError::OutOfRange {
                    field,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-field bounds enforced by the input form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    pub carat: Range,
    pub depth: Range,
    pub table: Range,
    pub x: Range,
    pub y: Range,
    pub z: Range,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            carat: Range::new(0.2, 5.01),
            depth: Range::new(43.0, 79.0),
            table: Range::new(43.0, 95.0),
            x: Range::new(0.0, 10.74),
            y: Range::new(0.0, 58.9),
            z: Range::new(0.0, 31.8),
        }
    }
}
