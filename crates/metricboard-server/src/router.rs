//! Axum router wiring.
//!
//! Any origin may call any route; no credentials are involved, so the CORS
//! layer answers preflights with wildcards.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        .route("/api/register", post(api::register))
        .route("/api/results", post(api::submit_result))
        .route("/api/stats/users", get(api::list_users))
        .route("/api/stats/averages", get(api::averages))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
