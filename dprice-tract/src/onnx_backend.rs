use std::path::Path;

use anyhow::{anyhow, Context, Result};
use dprice_core::{FeatureVector, PricingError, Regressor};
use tract_onnx::prelude::*;
use tract_onnx::tract_hir::infer::Factoid;
use tract_onnx::tract_hir::internal::DimLike;

/// tract backend (holds the optimised runnable plan).
pub struct TractRegressor {
    name: String,
    model: TypedRunnableModel<TypedModel>,
    n_features: usize,
}

impl TractRegressor {
    /// Load an ONNX regressor whose single input is `f32[1, n_features]`.
    ///
    /// A file that parses but declares a different input width is a
    /// configuration error (wrong variant for this model), not a corrupt artifact.
    pub fn load(model_path: &Path, n_features: usize) -> dprice_core::Result<Self> {
        if !model_path.is_file() {
            return Err(PricingError::ArtifactNotFound(model_path.to_path_buf()));
        }
        let corrupt = |e: anyhow::Error| PricingError::ArtifactCorrupt {
            path: model_path.to_path_buf(),
            reason: format!("{e:#}"),
        };

        let model = parse(model_path).map_err(corrupt)?;
        let fact = model.input_fact(0).map_err(corrupt)?;
        check_width(fact, n_features).map_err(|e| {
            PricingError::Configuration(format!("{}: {e}", model_path.display()))
        })?;
        let model = compile(model, n_features).map_err(corrupt)?;

        let name = format!("tract:{}", stem(model_path));
        tracing::info!(model = %name, n_features, "onnx model loaded");
        Ok(Self {
            name,
            model,
            n_features,
        })
    }
}

fn parse(model_path: &Path) -> Result<InferenceModel> {
    tract_onnx::onnx()
        .model_for_path(model_path)
        .with_context(|| format!("failed to load onnx: {}", model_path.display()))
}

/// Compare the declared `[_, width]` of the input against the schema length.
/// Symbolic or undeclared widths are accepted and left to `compile`.
fn check_width(fact: &InferenceFact, n_features: usize) -> Result<()> {
    let declared = fact
        .shape
        .concretize()
        .and_then(|dims| dims.get(1).and_then(|d| d.to_usize().ok()));
    match declared {
        Some(width) if width != n_features => {
            anyhow::bail!("model input has {width} features, variant schema has {n_features}")
        }
        _ => Ok(()),
    }
}

fn compile(mut model: InferenceModel, n_features: usize) -> Result<TypedRunnableModel<TypedModel>> {
    // pin the input to f32 [1, n]
    model
        .set_input_fact(0, f32::fact([1, n_features]).into())
        .with_context(|| format!("model does not accept f32[1, {n_features}] input"))?;

    model
        .into_optimized()
        .context("optimize failed")?
        .into_runnable()
        .context("into_runnable failed")
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

impl Regressor for TractRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        anyhow::ensure!(
            features.len() == self.n_features,
            "model expects {} features, got {}",
            self.n_features,
            features.len()
        );

        // 1) [1, n] f32 tensor in schema order
        let values: Vec<f32> = features.values().map(|v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.n_features), values)?.into_tensor();

        // 2) run
        let mut outputs = self.model.run(tvec![input.into()]).context("tract run failed")?;
        anyhow::ensure!(!outputs.is_empty(), "no outputs from model");

        // 3) first element of the first output is the log-price ([1] or [1, 1])
        let out = outputs.remove(0);
        let out = out.cast_to::<f32>().context("output is not castable to f32")?;
        let log_price = out
            .to_array_view::<f32>()
            .context("output to f32 view failed")?
            .iter()
            .next()
            .copied()
            .ok_or_else(|| anyhow!("empty output tensor"))?;
        Ok(f64::from(log_price))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
