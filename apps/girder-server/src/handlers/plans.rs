//! Plan catalog handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::handlers::dto::ApiPlan;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<ApiPlan>,
}

/// `GET /api/plans`: all plans, cheapest first.
pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<PlansResponse>> {
    let plans = state.billing.all_plans().await?;
    Ok(Json(PlansResponse {
        plans: plans.into_iter().map(ApiPlan::from).collect(),
    }))
}
