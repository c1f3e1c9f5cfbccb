//! Feature derivation and schema-ordered vector assembly.

use ndarray::Array2;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::encoding::{encode, Attribute, Encoded, EncodingMode, EncodingTable};
use crate::error::Result;
use crate::input::RawInput;

/// Geometric features derived from the millimetre dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub volume: f64,
    pub density: f64,
    pub xy_ratio: f64,
}

impl Geometry {
    /// Degenerate dimensions fall back to 0.0 instead of dividing by zero.
    pub fn derive(carat: f64, x: f64, y: f64, z: f64) -> Self {
        let volume = x * y * z;
        let density = if volume != 0.0 { carat / volume } else { 0.0 };
        let xy_ratio = if y != 0.0 { x / y } else { 0.0 };
        Self {
            volume,
            density,
            xy_ratio,
        }
    }
}

/// Ordered `name -> value` mapping matching the bound model's columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    columns: Vec<(String, f64)>,
}

impl FeatureVector {
    fn push(&mut self, name: impl Into<String>, value: f64) {
        self.columns.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.columns.iter().map(|(_, v)| *v)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Single-row `[1, n]` f32 matrix, the input layout of the ONNX backends.
    pub fn to_row(&self) -> Array2<f32> {
        Array2::from_shape_fn((1, self.columns.len()), |(_, j)| self.columns[j].1 as f32)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Encode, derive and assemble `raw` into the schema declared by `table`.
pub fn build_feature_vector(raw: &RawInput, table: &EncodingTable) -> Result<FeatureVector> {
    // 1) categorical encoding (fails before anything is assembled)
    let encoded = Attribute::ALL
        .iter()
        .map(|attr| encode(*attr, raw.label(*attr), table))
        .collect::<Result<Vec<_>>>()?;

    // 2) derived geometry
    let geo = Geometry::derive(raw.carat, raw.x, raw.y, raw.z);

    // 3) assemble in schema order
    let mut fv = FeatureVector::default();
    match &table.mode {
        EncodingMode::Ordinal { .. } => {
            let rank = |i: usize| match &encoded[i] {
                Encoded::Rank(r) => f64::from(*r),
                Encoded::OneHot(_) => unreachable!("ordinal table produced one-hot columns"),
            };
            fv.push("carat", raw.carat);
            fv.push("cut", rank(0));
            fv.push("color", rank(1));
            fv.push("clarity", rank(2));
            fv.push("depth", raw.depth);
            fv.push("table", raw.table);
            fv.push("x", raw.x);
            fv.push("y", raw.y);
            fv.push("z", raw.z);
        }
        EncodingMode::OneHot { .. } => {
            fv.push("carat", raw.carat);
            fv.push("depth", raw.depth);
            fv.push("table", raw.table);

            let indicators: Vec<&(String, f64)> = encoded
                .iter()
                .flat_map(|e| match e {
                    Encoded::OneHot(cols) => cols.as_slice(),
                    Encoded::Rank(_) => &[][..],
                })
                .collect();
            for column in table.one_hot_columns() {
                let value = indicators
                    .iter()
                    .find(|(name, _)| *name == column)
                    .map(|(_, v)| *v)
                    .unwrap_or(0.0);
                fv.push(column, value);
            }
        }
    }
    if table.derived_features {
        fv.push("volume", geo.volume);
        fv.push("density", geo.density);
        fv.push("xy_ratio", geo.xy_ratio);
    }

    debug_assert!(fv.names().eq(table.schema().iter().map(String::as_str)));
    Ok(fv)
}
