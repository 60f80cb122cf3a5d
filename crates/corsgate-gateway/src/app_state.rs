//! Shared application state for the corsgate gateway.
//!
//! The CORS policy is compiled here, once, before the router is built. A bad
//! pattern stops startup instead of surfacing on the first request.

use std::sync::Arc;

use corsgate_core::error::Result;
use corsgate_core::DecisionEngine;

use crate::config::GatewayConfig;
use crate::obs::metrics::CorsMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    engine: DecisionEngine,
    metrics: CorsMetrics,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let policy = cfg.cors.to_policy().map_err(|e| {
            tracing::error!(code = e.code().as_str(), error = %e, "cors policy compile failed");
            e
        })?;

        tracing::info!(
            uri_patterns = policy.xhr_allowed_uris().len(),
            origin_patterns = policy.xhr_allowed_origins().len(),
            max_age_secs = policy.max_age_secs(),
            "cors policy ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                engine: DecisionEngine::new(policy),
                metrics: CorsMetrics::default(),
            }),
        })
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.inner.engine
    }

    pub fn metrics(&self) -> &CorsMetrics {
        &self.inner.metrics
    }
}
