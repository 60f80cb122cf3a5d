//! corsgate gateway
//!
//! - Loads `corsgate.yaml` (or the path given as the first argument)
//! - Compiles the CORS policy before binding; a bad pattern aborts startup
//! - Serves `/healthz` and `/metrics` behind the CORS filter

use std::process::ExitCode;

use axum::Router;
use tracing_subscriber::{fmt, EnvFilter};

use corsgate_core::error::{CorsGateError, Result};
use corsgate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "corsgate-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());

    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state, Router::new());

    tracing::info!(%listen, config = %path, "corsgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CorsGateError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| CorsGateError::Internal(format!("server failed: {e}")))
}
