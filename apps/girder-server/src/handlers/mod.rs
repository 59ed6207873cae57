//! HTTP handlers and router assembly.

pub mod dto;
pub mod plans;
pub mod subscriptions;
pub mod usage;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/plans", get(plans::list_plans))
        .route("/api/subscription", get(subscriptions::get_subscription))
        .route("/api/subscription/change", post(subscriptions::change_plan))
        .route("/api/subscription/history", get(subscriptions::tier_history))
        .route("/api/quota/:metric", get(usage::check_quota))
        .route("/api/quota/:metric/consume", post(usage::consume_quota))
        .route("/api/usage", get(usage::current_usage))
        .route("/api/usage/:metric", post(usage::track_usage))
        .route("/healthz", get(health_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Liveness probe; always OK while the process runs.
async fn health_handler() -> &'static str {
    "ok"
}

/// Readiness probe. The router is only built after migrations and the plan
/// seed have completed, so reachable means ready.
async fn readiness_handler() -> &'static str {
    "ok"
}

/// Prometheus metrics in text exposition format.
async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
