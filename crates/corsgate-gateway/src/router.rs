//! Axum router wiring.
//!
//! Wraps the host application's routes, adds the operational endpoints, and
//! puts the CORS filter in front of all of them.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState, app: Router) -> Router {
    let ops = Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state.clone());

    app.merge(ops)
        .layer(middleware::from_fn_with_state(state, transport::cors::cors_filter))
}
