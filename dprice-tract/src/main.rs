use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use dprice_core::{server, telemetry, Config, Pricer};
use tracing::{error, info};

mod onnx_backend;

use onnx_backend::TractRegressor;

/// Diamond price prediction service (tract backend).
#[derive(Parser)]
#[command(version)]
struct Args {
    /// TOML configuration file.
    #[arg(long, env = "DPRICE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let variant = config.variant()?;
    let model_path = config.model_path();
    info!(variant = %variant.name, path = %model_path.display(), "starting");

    // no model, no predictions: refuse to bind
    let model = TractRegressor::load(&model_path, variant.table.schema().len()).inspect_err(|e| {
        error!(error = %e, "failed to load model");
    })?;

    let pricer = Pricer::new(variant, Arc::new(model));
    server::serve(config.socket_addr()?, pricer).await
}
