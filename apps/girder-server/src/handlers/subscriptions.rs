//! Subscription handlers: retrieval, plan changes, tier history.

use axum::extract::{Query, State};
use axum::Json;
use girder_storage::{CompanyId, PlanId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::handlers::dto::{ApiPlan, ApiSubscription, ApiTierChange, ApiUsage, Identity};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: ApiSubscription,
    pub plan: ApiPlan,
    pub usage: ApiUsage,
}

/// `GET /api/subscription`: the caller's active subscription with its plan
/// and current-period usage. Creates the free subscription on first sight.
pub async fn get_subscription(
    State(state): State<AppState>,
    Query(identity): Query<Identity>,
) -> ApiResult<Json<SubscriptionResponse>> {
    let (user_id, company_id) = identity.ids();

    let subscription = state
        .billing
        .ensure_subscription(&user_id, &company_id)
        .await?;
    let plan = state.billing.plan_by_id(&subscription.plan_id).await?;
    let usage = state.billing.current_usage(&user_id, &company_id).await?;

    Ok(Json(SubscriptionResponse {
        subscription: subscription.into(),
        plan: plan.into(),
        usage: usage.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub plan_id: String,
    pub reason: Option<String>,
    pub changed_by: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// `POST /api/subscription/change`: switch to a different plan. The prior
/// row is canceled, a fresh row inserted, and the change appended to the
/// tier history.
pub async fn change_plan(
    State(state): State<AppState>,
    Json(req): Json<ChangePlanRequest>,
) -> ApiResult<Json<ApiSubscription>> {
    let subscription = state
        .billing
        .change_plan(
            &UserId(req.user_id),
            &CompanyId(req.company_id),
            &PlanId(req.plan_id),
            req.reason.as_deref().unwrap_or("plan_change"),
            req.changed_by.as_deref().unwrap_or("system"),
            req.metadata,
        )
        .await?;
    Ok(Json(subscription.into()))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub changes: Vec<ApiTierChange>,
}

/// `GET /api/subscription/history`: tier changes for a user, newest first.
pub async fn tier_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let changes = state.billing.tier_history(&UserId(query.user_id)).await?;
    Ok(Json(HistoryResponse {
        changes: changes.into_iter().map(ApiTierChange::from).collect(),
    }))
}
