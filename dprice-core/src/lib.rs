//! Diamond price prediction pipeline.
//!
//! Raw form input is validated, its categorical attributes are encoded with the
//! [`EncodingTable`] the model was trained against, derived geometry is added,
//! and the schema-ordered [`FeatureVector`] is handed to a [`Regressor`]. The
//! model predicts a log-price, which is exponentiated back into a price.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dprice_core::{FeatureVector, ModelVariant, Pricer};
//!
//! let variant = ModelVariant::xgboost()?;
//! let model = Arc::new(|_: &FeatureVector| -> anyhow::Result<f64> { Ok(8.0) });
//! let pricer = Pricer::new(variant.clone(), model);
//! let quote = pricer.quote(&variant.default_input())?;
//! println!("{}", quote.prediction.display_price());
//! # Ok::<(), dprice_core::PricingError>(())
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod features;
pub mod input;
pub mod pipeline;
pub mod predict;
pub mod server;
pub mod telemetry;
pub mod variant;

pub use config::Config;
pub use encoding::{encode, Attribute, ColumnOrder, Encoded, EncodingMode, EncodingTable, OneHotTable, OrdinalTable};
pub use error::{PricingError, Result};
pub use features::{build_feature_vector, FeatureVector, Geometry};
pub use input::{InputBounds, Range, RawInput};
pub use pipeline::{Pricer, Quote};
pub use predict::{format_usd, predict_price, DynModel, PredictionResult, Regressor};
pub use variant::ModelVariant;
