//! Request/response bodies for the JSON API.

use chrono::{DateTime, Utc};
use girder_storage::{CompanyId, Plan, Subscription, TierChange, UsageMetrics, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the (already authenticated) caller. Authentication itself
/// happens upstream; this subsystem only consumes the resulting ids.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub company_id: Uuid,
}

impl Identity {
    pub fn ids(&self) -> (UserId, CompanyId) {
        (UserId(self.user_id), CompanyId(self.company_id))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiPlanLimits {
    pub max_flows: i64,
    pub max_runs: i64,
    pub max_sandbox_runs: i64,
    pub max_ai_queries: i64,
    pub max_api_calls_per_minute: i64,
    pub max_team_members: i64,
    pub max_storage_gb: i64,
}

#[derive(Debug, Serialize)]
pub struct ApiPlanFeatures {
    pub custom_domain: bool,
    pub white_label: bool,
    pub priority_support: bool,
    pub advanced_analytics: bool,
    pub custom_integrations: bool,
    pub sso_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiPlan {
    pub id: String,
    pub name: String,
    pub tier: String,
    pub price_monthly: f64,
    pub limits: ApiPlanLimits,
    pub features: ApiPlanFeatures,
}

impl From<Plan> for ApiPlan {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.0,
            name: plan.name,
            tier: plan.tier.as_str().to_string(),
            price_monthly: plan.price_monthly,
            limits: ApiPlanLimits {
                max_flows: plan.limits.max_flows,
                max_runs: plan.limits.max_runs,
                max_sandbox_runs: plan.limits.max_sandbox_runs,
                max_ai_queries: plan.limits.max_ai_queries,
                max_api_calls_per_minute: plan.limits.max_api_calls_per_minute,
                max_team_members: plan.limits.max_team_members,
                max_storage_gb: plan.limits.max_storage_gb,
            },
            features: ApiPlanFeatures {
                custom_domain: plan.features.custom_domain,
                white_label: plan.features.white_label,
                priority_support: plan.features.priority_support,
                advanced_analytics: plan.features.advanced_analytics,
                custom_integrations: plan.features.custom_integrations,
                sso_enabled: plan.features.sso_enabled,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiSubscription {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub plan_id: String,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    pub stripe_subscription_id: Option<String>,
}

impl From<Subscription> for ApiSubscription {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id.0.to_string(),
            user_id: sub.user_id.0.to_string(),
            company_id: sub.company_id.0.to_string(),
            plan_id: sub.plan_id.0,
            status: sub.status.as_str().to_string(),
            current_period_start: sub.current_period_start,
            current_period_end: sub.current_period_end,
            cancel_at_period_end: sub.cancel_at_period_end,
            stripe_subscription_id: sub.stripe_subscription_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiUsage {
    pub period: String,
    pub flow_runs: i64,
    pub sandbox_runs: i64,
    pub ai_queries: i64,
    pub api_calls: i64,
    pub storage_gb: f64,
}

impl From<UsageMetrics> for ApiUsage {
    fn from(usage: UsageMetrics) -> Self {
        Self {
            period: usage.period.to_string(),
            flow_runs: usage.flow_runs,
            sandbox_runs: usage.sandbox_runs,
            ai_queries: usage.ai_queries,
            api_calls: usage.api_calls,
            storage_gb: usage.storage_gb,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiTierChange {
    pub id: String,
    pub old_tier: String,
    pub new_tier: String,
    pub reason: String,
    pub changed_by: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<TierChange> for ApiTierChange {
    fn from(change: TierChange) -> Self {
        Self {
            id: change.id.0.to_string(),
            old_tier: change.old_tier.as_str().to_string(),
            new_tier: change.new_tier.as_str().to_string(),
            reason: change.reason,
            changed_by: change.changed_by,
            metadata: change.metadata,
            created_at: change.created_at,
        }
    }
}
