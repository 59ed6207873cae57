//! Built-in plan catalog.
//!
//! Three plans, seeded once at service startup. Plans are immutable
//! reference data; a user's "plan change" switches their subscription's
//! plan id, never these rows.

use girder_storage::{Plan, PlanFeatures, PlanId, PlanLimits, PlanTier, UNLIMITED};

/// Id of the free plan every new (user, company) pair starts on.
pub const FREE_PLAN_ID: &str = "plan-free";

/// The seed set.
pub fn builtin_plans() -> Vec<Plan> {
    vec![
        Plan {
            id: PlanId::from(FREE_PLAN_ID),
            name: "Free".to_string(),
            tier: PlanTier::Free,
            price_monthly: 0.0,
            limits: PlanLimits {
                max_flows: 3,
                max_runs: 100,
                max_sandbox_runs: 10,
                max_ai_queries: 50,
                max_api_calls_per_minute: 10,
                max_team_members: 1,
                max_storage_gb: 1,
            },
            features: PlanFeatures {
                custom_domain: false,
                white_label: false,
                priority_support: false,
                advanced_analytics: false,
                custom_integrations: false,
                sso_enabled: false,
            },
        },
        Plan {
            id: PlanId::from("plan-pro-monthly"),
            name: "Pro".to_string(),
            tier: PlanTier::Pro,
            price_monthly: 49.0,
            limits: PlanLimits {
                max_flows: 50,
                max_runs: 5000,
                max_sandbox_runs: 100,
                max_ai_queries: 1000,
                max_api_calls_per_minute: 100,
                max_team_members: 10,
                max_storage_gb: 50,
            },
            features: PlanFeatures {
                custom_domain: false,
                white_label: false,
                priority_support: true,
                advanced_analytics: true,
                custom_integrations: true,
                sso_enabled: false,
            },
        },
        Plan {
            id: PlanId::from("plan-enterprise-monthly"),
            name: "Enterprise".to_string(),
            tier: PlanTier::Enterprise,
            price_monthly: 199.0,
            limits: PlanLimits {
                max_flows: UNLIMITED,
                max_runs: UNLIMITED,
                max_sandbox_runs: UNLIMITED,
                max_ai_queries: UNLIMITED,
                max_api_calls_per_minute: 1000,
                max_team_members: UNLIMITED,
                max_storage_gb: 500,
            },
            features: PlanFeatures {
                custom_domain: true,
                white_label: true,
                priority_support: true,
                advanced_analytics: true,
                custom_integrations: true,
                sso_enabled: true,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plans_shape() {
        let plans = builtin_plans();
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].id.as_str(), FREE_PLAN_ID);
        assert_eq!(plans[0].tier, PlanTier::Free);
        assert_eq!(plans[1].limits.max_ai_queries, 1000);
        assert_eq!(plans[2].limits.max_ai_queries, UNLIMITED);
        // API calls stay rate-capped even on enterprise.
        assert_eq!(plans[2].limits.max_api_calls_per_minute, 1000);
    }
}
