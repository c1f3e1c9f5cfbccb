//! Categorical encoding for cut, color and clarity.
//!
//! A model is trained against exactly one [`EncodingTable`]. Vectors built with
//! another table are silently wrong, so a table always travels with its model
//! (see [`crate::variant::ModelVariant`]).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// The three categorical diamond attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Cut,
    Color,
    Clarity,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Cut, Attribute::Color, Attribute::Clarity];

    /// Column name stem used by both schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Color => "color",
            Self::Clarity => "clarity",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label -> rank lookup. Declared order doubles as selector option order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdinalTable {
    entries: Vec<(String, u32)>,
}

impl OrdinalTable {
    /// Build a table, rejecting anything that is not a bijection onto positive ranks.
    pub fn new<I, S>(attribute: Attribute, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let entries: Vec<(String, u32)> = entries.into_iter().map(|(l, r)| (l.into(), r)).collect();
        let invalid = |reason: String| PricingError::InvalidTable { attribute, reason };

        if entries.is_empty() {
            return Err(invalid("no labels".into()));
        }
        {
            let mut labels = HashSet::new();
            let mut ranks = HashSet::new();
            for (label, rank) in &entries {
                if *rank == 0 {
                    return Err(invalid(format!("rank of '{label}' must be positive")));
                }
                if !labels.insert(label.as_str()) {
                    return Err(invalid(format!("duplicate label '{label}'")));
                }
                if !ranks.insert(*rank) {
                    return Err(invalid(format!("duplicate rank {rank}")));
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn rank(&self, label: &str) -> Option<u32> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, r)| *r)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }
}

/// Closed vocabulary expanded into one indicator column per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneHotTable {
    vocabulary: Vec<String>,
}

impl OneHotTable {
    pub fn new<I, S>(attribute: Attribute, vocabulary: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary: Vec<String> = vocabulary.into_iter().map(Into::into).collect();
        if vocabulary.is_empty() {
            return Err(PricingError::InvalidTable {
                attribute,
                reason: "no labels".into(),
            });
        }
        {
            let mut seen = HashSet::new();
            for label in &vocabulary {
                if !seen.insert(label.as_str()) {
                    return Err(PricingError::InvalidTable {
                        attribute,
                        reason: format!("duplicate label '{label}'"),
                    });
                }
            }
        }
        Ok(Self { vocabulary })
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn contains(&self, label: &str) -> bool {
        self.vocabulary.iter().any(|l| l == label)
    }
}

/// `{attribute}_{label}`, label kept verbatim.
pub fn one_hot_column(attribute: Attribute, label: &str) -> String {
    format!("{}_{}", attribute.as_str(), label)
}

/// Order in which one-hot columns are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// Lexicographic over every one-hot column name across all attributes.
    #[default]
    Sorted,
    /// cut, color, clarity blocks, each in vocabulary order.
    Declared,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EncodingMode {
    Ordinal {
        cut: OrdinalTable,
        color: OrdinalTable,
        clarity: OrdinalTable,
    },
    OneHot {
        cut: OneHotTable,
        color: OneHotTable,
        clarity: OneHotTable,
        order: ColumnOrder,
    },
}

/// Immutable encoding configuration bound to one trained model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingTable {
    pub mode: EncodingMode,
    /// Whether volume, density and xy_ratio are part of the schema.
    pub derived_features: bool,
}

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Rank(u32),
    /// `(column, 0.0 | 1.0)` for the whole vocabulary, in vocabulary order.
    OneHot(Vec<(String, f64)>),
}

impl EncodingTable {
    pub fn ordinal(cut: OrdinalTable, color: OrdinalTable, clarity: OrdinalTable) -> Self {
        Self {
            mode: EncodingMode::Ordinal { cut, color, clarity },
            derived_features: true,
        }
    }

    pub fn one_hot(cut: OneHotTable, color: OneHotTable, clarity: OneHotTable) -> Self {
        Self {
            mode: EncodingMode::OneHot {
                cut,
                color,
                clarity,
                order: ColumnOrder::Sorted,
            },
            derived_features: false,
        }
    }

    pub fn with_derived_features(mut self, derived: bool) -> Self {
        self.derived_features = derived;
        self
    }

    pub fn with_column_order(mut self, column_order: ColumnOrder) -> Self {
        if let EncodingMode::OneHot { order, .. } = &mut self.mode {
            *order = column_order;
        }
        self
    }

    pub fn is_one_hot(&self) -> bool {
        matches!(self.mode, EncodingMode::OneHot { .. })
    }

    /// Selector vocabulary for `attribute`, in declared order.
    pub fn options(&self, attribute: Attribute) -> Vec<&str> {
        match &self.mode {
            EncodingMode::Ordinal { cut, color, clarity } => {
                pick(attribute, cut, color, clarity).labels().collect()
            }
            EncodingMode::OneHot {
                cut, color, clarity, ..
            } => pick(attribute, cut, color, clarity)
                .vocabulary()
                .iter()
                .map(String::as_str)
                .collect(),
        }
    }

    /// All one-hot column names in emission order. Empty in ordinal mode.
    pub fn one_hot_columns(&self) -> Vec<String> {
        let EncodingMode::OneHot {
            cut,
            color,
            clarity,
            order,
        } = &self.mode
        else {
            return Vec::new();
        };

        let mut columns: Vec<String> = [(Attribute::Cut, cut), (Attribute::Color, color), (Attribute::Clarity, clarity)]
            .into_iter()
            .flat_map(|(attr, table)| table.vocabulary().iter().map(move |l| one_hot_column(attr, l)))
            .collect();
        if *order == ColumnOrder::Sorted {
            columns.sort();
        }
        columns
    }

    /// Exact ordered column list a model bound to this table expects.
    pub fn schema(&self) -> Vec<String> {
        let derived = ["volume", "density", "xy_ratio"];
        let mut schema: Vec<String> = match &self.mode {
            EncodingMode::Ordinal { .. } => [
                "carat", "cut", "color", "clarity", "depth", "table", "x", "y", "z",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            EncodingMode::OneHot { .. } => {
                let mut cols: Vec<String> = ["carat", "depth", "table"].iter().map(|s| s.to_string()).collect();
                cols.extend(self.one_hot_columns());
                cols
            }
        };
        if self.derived_features {
            schema.extend(derived.iter().map(|s| s.to_string()));
        }
        schema
    }
}

fn pick<'a, T>(attribute: Attribute, cut: &'a T, color: &'a T, clarity: &'a T) -> &'a T {
    match attribute {
        Attribute::Cut => cut,
        Attribute::Color => color,
        Attribute::Clarity => clarity,
    }
}

/// Encode one categorical label against `table`. Pure; no side effects.
pub fn encode(attribute: Attribute, label: &str, table: &EncodingTable) -> Result<Encoded> {
    let unknown = || PricingError::UnknownCategory {
        attribute,
        label: label.to_string(),
    };

    match &table.mode {
        EncodingMode::Ordinal { cut, color, clarity } => pick(attribute, cut, color, clarity)
            .rank(label)
            .map(Encoded::Rank)
            .ok_or_else(unknown),
        EncodingMode::OneHot {
            cut, color, clarity, ..
        } => {
            let vocab = pick(attribute, cut, color, clarity);
            if !vocab.contains(label) {
                return Err(unknown());
            }
            let columns = vocab
                .vocabulary()
                .iter()
                .map(|l| (one_hot_column(attribute, l), if l == label { 1.0 } else { 0.0 }))
                .collect();
            Ok(Encoded::OneHot(columns))
        }
    }
}
