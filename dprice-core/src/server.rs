//! HTTP presentation layer: the price form as a JSON API.

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::encoding::Attribute;
use crate::error::PricingError;
use crate::features::FeatureVector;
use crate::input::{InputBounds, RawInput};
use crate::pipeline::Pricer;

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: String,
    pub variant: String,
    pub model: String,
}

/// Everything the form needs to render its selectors and sliders.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub variant: String,
    pub cut: Vec<String>,
    pub color: Vec<String>,
    pub clarity: Vec<String>,
    pub bounds: InputBounds,
    pub schema: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResp {
    pub features: FeatureVector,
    pub log_price: f64,
    pub price: f64,
    pub display: String,
}

/// Error body: `{"error": "..."}`. 422 for rejected input, 500 otherwise.
#[derive(Debug)]
pub struct ApiError(pub PricingError);

impl From<PricingError> for ApiError {
    fn from(e: PricingError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            error!(error = ?self.0, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn router(pricer: Pricer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/options", get(options))
        .route("/defaults", get(defaults))
        .route("/features", post(features))
        .route("/predict", post(predict))
        .with_state(pricer)
}

pub async fn root(State(pricer): State<Pricer>) -> Json<Banner> {
    Json(Banner {
        message: "Diamond price prediction".to_string(),
        variant: pricer.variant().name.clone(),
        model: pricer.model_name().to_string(),
    })
}

pub async fn options(State(pricer): State<Pricer>) -> Json<FormOptions> {
    let variant = pricer.variant();
    let labels = |attr: Attribute| -> Vec<String> {
        variant.table.options(attr).into_iter().map(String::from).collect()
    };
    Json(FormOptions {
        variant: variant.name.clone(),
        cut: labels(Attribute::Cut),
        color: labels(Attribute::Color),
        clarity: labels(Attribute::Clarity),
        bounds: variant.bounds.clone(),
        schema: variant.table.schema(),
    })
}

pub async fn defaults(State(pricer): State<Pricer>) -> Json<RawInput> {
    Json(pricer.variant().default_input())
}

pub async fn features(
    State(pricer): State<Pricer>,
    Json(input): Json<RawInput>,
) -> Result<Json<FeatureVector>, ApiError> {
    Ok(Json(pricer.features(&input)?))
}

pub async fn predict(
    State(pricer): State<Pricer>,
    Json(input): Json<RawInput>,
) -> Result<Json<PredictResp>, ApiError> {
    let quote = pricer.quote(&input)?;
    Ok(Json(PredictResp {
        display: quote.prediction.display_price(),
        log_price: quote.prediction.log_price,
        price: quote.prediction.price,
        features: quote.features,
    }))
}

/// Bind and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, pricer: Pricer) -> anyhow::Result<()> {
    let app = router(pricer);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    tokio::select! {
        r = axum::serve(listener, app.into_make_service()) => { r?; }
        _ = tokio::signal::ctrl_c() => { info!("shutdown"); }
    }
    Ok(())
}
