use std::path::Path;
use std::sync::Mutex;

use anyhow::anyhow;
use dprice_core::{FeatureVector, PricingError, Regressor};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::TensorRef;

/// ONNX backend implemented with the `ort` crate (v2 API).
pub struct OrtRegressor {
    name: String,
    // Session::run takes &mut self
    session: Mutex<Session>,
}

impl OrtRegressor {
    /// Load a model file; `intra_threads` of `None` uses every core.
    pub fn load(model_path: &Path, intra_threads: Option<usize>) -> dprice_core::Result<Self> {
        if !model_path.is_file() {
            return Err(PricingError::ArtifactNotFound(model_path.to_path_buf()));
        }
        let threads = intra_threads.unwrap_or_else(num_cpus::get);
        let session = open(model_path, threads).map_err(|e| PricingError::ArtifactCorrupt {
            path: model_path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

        let name = format!(
            "ort:{}",
            model_path.file_stem().and_then(|s| s.to_str()).unwrap_or("model")
        );
        tracing::info!(model = %name, threads, "onnx session ready");
        Ok(Self {
            name,
            session: Mutex::new(session),
        })
    }
}

fn open(model_path: &Path, threads: usize) -> anyhow::Result<Session> {
    Session::builder()
        .map_err(|e| anyhow!("failed to create session builder: {e}"))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| anyhow!("failed to set optimization level: {e}"))?
        .with_intra_threads(threads)
        .map_err(|e| anyhow!("failed to set intra threads: {e}"))?
        .commit_from_file(model_path)
        .map_err(|e| anyhow!("failed to load ONNX model: {e}"))
}

impl Regressor for OrtRegressor {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
        // 1) [1, n] f32 row in schema order
        let row = features.to_row();
        let input = TensorRef::from_array_view(row.view()).map_err(|e| anyhow!("input tensor: {e}"))?;

        // 2) run (lock held only for the call)
        let mut session = self.session.lock().map_err(|_| anyhow!("session lock poisoned"))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| anyhow!("onnx session run failed: {e}"))?;

        // 3) [1] or [1, 1]: first element is the log-price
        let view = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| anyhow!("failed to extract f32 array: {e}"))?;
        let log_price = *view.iter().next().ok_or_else(|| anyhow!("empty output tensor"))?;
        Ok(f64::from(log_price))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
