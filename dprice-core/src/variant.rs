//! Model variants: an encoding table and input bounds bound to one trained model.

use serde::Serialize;

use crate::encoding::{Attribute, EncodingTable, OneHotTable, OrdinalTable};
use crate::error::{PricingError, Result};
use crate::input::{InputBounds, Range, RawInput};

/// Names accepted by [`ModelVariant::by_name`].
pub const PRESETS: [&str; 3] = ["xgboost", "random_forest", "one_hot"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelVariant {
    pub name: String,
    pub table: EncodingTable,
    pub bounds: InputBounds,
}

impl ModelVariant {
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "xgboost" => Self::xgboost(),
            "random_forest" => Self::random_forest(),
            "one_hot" => Self::one_hot(),
            other => Err(PricingError::Configuration(format!(
                "unknown model variant '{other}' (expected one of {PRESETS:?})"
            ))),
        }
    }

    /// Ordinal ranks in ascending quality order.
    pub fn xgboost() -> Result<Self> {
        let table = EncodingTable::ordinal(
            OrdinalTable::new(
                Attribute::Cut,
                [("Fair", 1), ("Good", 2), ("Very Good", 3), ("Premium", 4), ("Ideal", 5)],
            )?,
            OrdinalTable::new(
                Attribute::Color,
                [("J", 1), ("I", 2), ("H", 3), ("G", 4), ("F", 5), ("E", 6), ("D", 7)],
            )?,
            OrdinalTable::new(
                Attribute::Clarity,
                [
                    ("I1", 1),
                    ("SI2", 2),
                    ("SI1", 3),
                    ("VS2", 4),
                    ("VS1", 5),
                    ("VVS2", 6),
                    ("VVS1", 7),
                    ("IF", 8),
                ],
            )?,
        );
        Ok(Self {
            name: "xgboost".into(),
            table,
            bounds: InputBounds {
                carat: Range::new(0.2, 3.65),
                ..InputBounds::default()
            },
        })
    }

    /// Ordinal ranks as assigned by the random forest's label encoder.
    pub fn random_forest() -> Result<Self> {
        let table = EncodingTable::ordinal(
            OrdinalTable::new(
                Attribute::Cut,
                [("Ideal", 3), ("Premium", 4), ("Good", 2), ("Very Good", 5), ("Fair", 1)],
            )?,
            OrdinalTable::new(
                Attribute::Color,
                [("E", 2), ("I", 6), ("J", 7), ("H", 5), ("F", 3), ("G", 4), ("D", 1)],
            )?,
            OrdinalTable::new(
                Attribute::Clarity,
                [
                    ("SI2", 4),
                    ("SI1", 3),
                    ("VS1", 5),
                    ("VS2", 6),
                    ("VVS2", 7),
                    ("VVS1", 8),
                    ("I1", 1),
                    ("IF", 2),
                ],
            )?,
        );
        Ok(Self {
            name: "random_forest".into(),
            table,
            bounds: InputBounds::default(),
        })
    }

    /// One-hot columns only; no derived geometry in this schema.
    pub fn one_hot() -> Result<Self> {
        let table = EncodingTable::one_hot(
            OneHotTable::new(Attribute::Cut, ["Ideal", "Premium", "Very Good", "Good", "Fair"])?,
            OneHotTable::new(Attribute::Color, ["D", "E", "F", "G", "H", "I", "J"])?,
            OneHotTable::new(
                Attribute::Clarity,
                ["IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "I1"],
            )?,
        );
        Ok(Self {
            name: "one_hot".into(),
            table,
            bounds: InputBounds::default(),
        })
    }

    /// Initial form state: slider defaults and the option at index 0 / 1 / 3.
    pub fn default_input(&self) -> RawInput {
        let option = |attr: Attribute, index: usize| {
            let options = self.table.options(attr);
            options
                .get(index)
                .or_else(|| options.first())
                .map(|s| s.to_string())
                .unwrap_or_default()
        };
        RawInput {
            carat: 0.7,
            depth: 61.8,
            table: 57.0,
            x: 5.7,
            y: 5.7,
            z: 3.5,
            cut: option(Attribute::Cut, 0),
            color: option(Attribute::Color, 1),
            clarity: option(Attribute::Clarity, 3),
        }
    }
}
