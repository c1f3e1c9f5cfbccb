//! Model seam and log-price inverse transform.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{PricingError, Result};
use crate::features::FeatureVector;

/// A pre-fitted regressor that maps a feature vector to a log-price.
///
/// Implementations are read-only after construction and may be shared across
/// requests without locking on the caller side.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64>;

    fn name(&self) -> &str {
        "regressor"
    }
}

impl<F> Regressor for F
where
    F: Fn(&FeatureVector) -> anyhow::Result<f64> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
        self(features)
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Shared, immutable model handle.
pub type DynModel = Arc<dyn Regressor>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub log_price: f64,
    pub price: f64,
}

impl PredictionResult {
    pub fn from_log_price(log_price: f64) -> Self {
        Self {
            log_price,
            price: log_price.exp(),
        }
    }

    /// `$12,345.67`
    pub fn display_price(&self) -> String {
        format_usd(self.price)
    }
}

/// Run the model and undo the log transform. No clamping of the result.
pub fn predict_price<R: Regressor + ?Sized>(features: &FeatureVector, model: &R) -> Result<PredictionResult> {
    let log_price = model
        .predict(features)
        .map_err(|e| PricingError::prediction(model.name(), e))?;
    if !log_price.is_finite() {
        return Err(PricingError::prediction(
            model.name(),
            format!("model returned non-finite log-price {log_price}"),
        ));
    }

    let result = PredictionResult::from_log_price(log_price);
    if !result.price.is_finite() {
        return Err(PricingError::prediction(
            model.name(),
            format!("log-price {log_price} overflows the price range"),
        ));
    }
    debug!(model = model.name(), log_price, price = result.price, "predicted");
    Ok(result)
}

/// Dollar amount with thousands separators and two decimals.
///
/// Non-finite amounts render as `n/a`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (digits, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}
