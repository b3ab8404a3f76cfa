//! Predict Gateway
//!
//! # Architecture Overview
//!
//! ```text
//!   client                    gateway                       downstream
//!   ──────                    ───────                       ──────────
//!   POST /predict        ─▶   http (multipart intake)
//!   POST /predict_batch       → forward (Gateway)
//!                             → downstream client     ─▶    /predict
//!                               (one call, one deadline)    /predict_batch
//!   JSON / error         ◀─   error translation       ◀─    JSON
//!
//!   GET /debug/downstream-status → probe              ─▶    /debug/routes
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use predict_gateway::config::load_config;
use predict_gateway::lifecycle::startup;
use predict_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "predict-gateway")]
#[command(version, about = "Forwards image uploads to a downstream prediction service", long_about = None)]
struct Args {
    /// Path to a TOML config file. GATEWAY_* environment variables override it.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("predict-gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("predict-gateway: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        downstream = %config.downstream.base_url,
        bind_address = %config.listener.bind_address,
        predict_timeout_secs = config.downstream.predict.timeout_secs,
        batch_timeout_secs = config.downstream.batch.timeout_secs,
        "Configuration loaded"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed");
            ExitCode::FAILURE
        }
    }
}
