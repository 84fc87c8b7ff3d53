//! `axum` router mapping orchestrator operations 1:1 onto the HTTP surface.

mod auth;
mod error;
mod handlers;
mod state;

pub use state::AppState;

use crate::orchestrator::Orchestrator;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = AppState { orchestrator };

    let internal = Router::new()
        .route("/health", get(handlers::health))
        .route("/optimizations", post(handlers::create_job).get(handlers::list_jobs))
        .route("/optimizations/dequeue", post(handlers::dequeue))
        .route("/optimizations/{id}", get(handlers::get_snapshot))
        .route("/optimizations/{id}/status", get(handlers::get_status))
        .route("/optimizations/{id}/cancel", post(handlers::cancel_job))
        .route("/optimizations/{id}/export", post(handlers::export_bundle))
        .route(
            "/optimizations/{id}/tasks/{taskId}/succeeded",
            post(handlers::report_succeeded),
        )
        .route(
            "/optimizations/{id}/tasks/{taskId}/failed",
            post(handlers::report_failed),
        );

    Router::new()
        .nest("/internal", internal)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_shared_secret))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
