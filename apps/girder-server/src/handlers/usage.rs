//! Quota and usage handlers.
//!
//! Two quota paths are exposed. `GET /api/quota/{metric}` +
//! `POST /api/usage/{metric}` form the advisory check/track pair the route
//! handlers of the surrounding application call around a metered action.
//! `POST /api/quota/{metric}/consume` is the atomic path for callers that
//! need the limit enforced exactly.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use girder_billing::QuotaDecision;
use girder_storage::{CompanyId, UsageMetric, UserId};

use crate::error::{ApiError, ApiResult};
use crate::handlers::dto::{ApiUsage, Identity};
use crate::metrics;
use crate::state::AppState;

fn parse_metric(raw: &str) -> Result<UsageMetric, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidRequest(format!("unknown usage metric: {}", raw)))
}

/// After a metered action, look for a crossing of the warning band and
/// record the notification metric if one fired.
async fn fire_usage_warning(
    state: &AppState,
    user_id: &UserId,
    company_id: &CompanyId,
    metric: UsageMetric,
) -> ApiResult<()> {
    if let Some(warning) = state
        .billing
        .check_usage_warning(user_id, company_id, metric)
        .await?
    {
        metrics::record_usage_warning(metric.as_str());
        tracing::debug!(
            notification_id = %warning.id.0,
            usage_percent = warning.usage_percent,
            "usage warning recorded"
        );
    }
    Ok(())
}

/// `GET /api/quota/{metric}`: advisory quota check; read-only.
pub async fn check_quota(
    State(state): State<AppState>,
    Path(raw_metric): Path<String>,
    Query(identity): Query<Identity>,
) -> ApiResult<Json<QuotaDecision>> {
    let metric = parse_metric(&raw_metric)?;
    let (user_id, company_id) = identity.ids();

    let decision = state
        .billing
        .check_quota(&user_id, &company_id, metric)
        .await?;
    metrics::record_quota_decision(metric.as_str(), decision.allowed);
    Ok(Json(decision))
}

/// `POST /api/quota/{metric}/consume`: atomic check-and-increment.
pub async fn consume_quota(
    State(state): State<AppState>,
    Path(raw_metric): Path<String>,
    Json(identity): Json<Identity>,
) -> ApiResult<Json<QuotaDecision>> {
    let metric = parse_metric(&raw_metric)?;
    let (user_id, company_id) = identity.ids();

    let decision = state.billing.consume(&user_id, &company_id, metric).await?;
    metrics::record_quota_decision(metric.as_str(), decision.allowed);
    if decision.allowed {
        fire_usage_warning(&state, &user_id, &company_id, metric).await?;
    }
    Ok(Json(decision))
}

/// `POST /api/usage/{metric}`: fire-and-forget usage accounting.
pub async fn track_usage(
    State(state): State<AppState>,
    Path(raw_metric): Path<String>,
    Json(identity): Json<Identity>,
) -> ApiResult<StatusCode> {
    let metric = parse_metric(&raw_metric)?;
    let (user_id, company_id) = identity.ids();

    state
        .billing
        .track_usage(&user_id, &company_id, metric)
        .await?;
    metrics::record_usage_tracked(metric.as_str());
    fire_usage_warning(&state, &user_id, &company_id, metric).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/usage`: the caller's current-period counters.
pub async fn current_usage(
    State(state): State<AppState>,
    Query(identity): Query<Identity>,
) -> ApiResult<Json<ApiUsage>> {
    let (user_id, company_id) = identity.ids();
    let usage = state
        .billing
        .current_usage(&user_id, &company_id)
        .await?;
    Ok(Json(usage.into()))
}
