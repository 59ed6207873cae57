//! Subscription plan reference data.

use super::{PlanId, PlanTier, UsageMetric};

/// Sentinel meaning "no limit" for a plan limit value.
pub const UNLIMITED: i64 = -1;

/// Numeric limits attached to a plan. `-1` means unlimited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanLimits {
    pub max_flows: i64,
    pub max_runs: i64,
    pub max_sandbox_runs: i64,
    pub max_ai_queries: i64,
    pub max_api_calls_per_minute: i64,
    pub max_team_members: i64,
    pub max_storage_gb: i64,
}

impl PlanLimits {
    /// Map a countable metric to the limit that governs it.
    ///
    /// Flow runs are capped by `max_runs` (not `max_flows`, which counts
    /// flow definitions rather than executions).
    pub fn limit_for(&self, metric: UsageMetric) -> i64 {
        match metric {
            UsageMetric::FlowRuns => self.max_runs,
            UsageMetric::SandboxRuns => self.max_sandbox_runs,
            UsageMetric::AiQueries => self.max_ai_queries,
            UsageMetric::ApiCalls => self.max_api_calls_per_minute,
        }
    }
}

/// Boolean feature flags attached to a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanFeatures {
    pub custom_domain: bool,
    pub white_label: bool,
    pub priority_support: bool,
    pub advanced_analytics: bool,
    pub custom_integrations: bool,
    pub sso_enabled: bool,
}

/// Plan record. Immutable reference data seeded once; a "plan change" for a
/// user switches `Subscription::plan_id`, never edits plan rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub tier: PlanTier,
    pub price_monthly: f64,
    pub limits: PlanLimits,
    pub features: PlanFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> PlanLimits {
        PlanLimits {
            max_flows: 3,
            max_runs: 100,
            max_sandbox_runs: 10,
            max_ai_queries: 50,
            max_api_calls_per_minute: 10,
            max_team_members: 1,
            max_storage_gb: 1,
        }
    }

    #[test]
    fn test_limit_for_maps_each_metric() {
        let l = limits();
        assert_eq!(l.limit_for(UsageMetric::FlowRuns), 100);
        assert_eq!(l.limit_for(UsageMetric::SandboxRuns), 10);
        assert_eq!(l.limit_for(UsageMetric::AiQueries), 50);
        assert_eq!(l.limit_for(UsageMetric::ApiCalls), 10);
    }

    #[test]
    fn test_unlimited_sentinel() {
        let mut l = limits();
        l.max_ai_queries = UNLIMITED;
        assert_eq!(l.limit_for(UsageMetric::AiQueries), -1);
    }
}
