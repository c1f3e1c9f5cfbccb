use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::features::{build_feature_vector, FeatureVector};
use crate::input::RawInput;
use crate::predict::{predict_price, DynModel, PredictionResult};
use crate::variant::ModelVariant;

/// A priced diamond together with the features that were fed to the model.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub features: FeatureVector,
    #[serde(flatten)]
    pub prediction: PredictionResult,
}

/// Entry point of the pipeline. Holds only immutable shared state, so clones are cheap
/// and every call builds its own feature vector.
#[derive(Clone)]
pub struct Pricer {
    variant: Arc<ModelVariant>,
    model: DynModel,
}

impl Pricer {
    /// `model` must have been trained against `variant.table`.
    pub fn new(variant: ModelVariant, model: DynModel) -> Self {
        info!(variant = %variant.name, model = model.name(), columns = variant.table.schema().len(), "pricer ready");
        Self {
            variant: Arc::new(variant),
            model,
        }
    }

    pub fn variant(&self) -> &ModelVariant {
        &self.variant
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Validated feature vector without running inference.
    pub fn features(&self, raw: &RawInput) -> Result<FeatureVector> {
        raw.validate(&self.variant.bounds)?;
        build_feature_vector(raw, &self.variant.table)
    }

    pub fn quote(&self, raw: &RawInput) -> Result<Quote> {
        let features = self.features(raw).inspect_err(|e| warn!(error = %e, "rejected input"))?;
        let prediction = predict_price(&features, self.model.as_ref())?;
        Ok(Quote {
            features,
            prediction,
        })
    }
}
