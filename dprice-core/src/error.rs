//! Pricing pipeline error types

use std::path::PathBuf;

use crate::encoding::Attribute;

/// Boxed backend failure carried by [`PricingError::Prediction`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Pricing pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    // Input errors
    #[error("unknown {attribute} category: '{label}'")]
    UnknownCategory { attribute: Attribute, label: String },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Encoding table errors
    #[error("invalid {attribute} encoding table: {reason}")]
    InvalidTable { attribute: Attribute, reason: String },

    // Model artifact errors
    #[error("model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("model artifact {} is corrupt: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Inference failed. Never retried: a shape mismatch stays a shape mismatch.
    #[error("prediction failed ({model}): {source}")]
    Prediction {
        model: String,
        #[source]
        source: BoxError,
    },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PricingError {
    /// Errors caused by the request itself, rejected before any inference.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCategory { .. } | Self::OutOfRange { .. } | Self::InvalidInput(_)
        )
    }

    pub(crate) fn prediction(model: &str, source: impl Into<BoxError>) -> Self {
        Self::Prediction {
            model: model.to_string(),
            source: source.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PricingError>;
