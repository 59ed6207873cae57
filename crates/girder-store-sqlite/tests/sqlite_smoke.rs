use chrono::{Duration, Utc};
use girder_storage::{
    CompanyId, CreateSubscriptionParams, CreateUsageNotificationParams, Period, Plan,
    PlanFeatures, PlanId, PlanLimits, PlanTier, RecordTierChangeParams, Store, StoreError,
    SubscriptionStatus, UsageMetric, UserId,
};
use girder_store_sqlite::SqliteStore;
use uuid::Uuid;

fn plan(id: &str, tier: PlanTier, price: f64, max_ai_queries: i64) -> Plan {
    Plan {
        id: PlanId::from(id),
        name: id.to_string(),
        tier,
        price_monthly: price,
        limits: PlanLimits {
            max_flows: 3,
            max_runs: 100,
            max_sandbox_runs: 10,
            max_ai_queries,
            max_api_calls_per_minute: 10,
            max_team_members: 1,
            max_storage_gb: 1,
        },
        features: PlanFeatures {
            custom_domain: false,
            white_label: false,
            priority_support: tier != PlanTier::Free,
            advanced_analytics: tier != PlanTier::Free,
            custom_integrations: false,
            sso_enabled: tier == PlanTier::Enterprise,
        },
    }
}

fn subscription_params(
    user_id: UserId,
    company_id: CompanyId,
    plan_id: &str,
) -> CreateSubscriptionParams {
    let now = Utc::now();
    CreateSubscriptionParams {
        user_id,
        company_id,
        plan_id: PlanId::from(plan_id),
        status: SubscriptionStatus::Active,
        current_period_start: now,
        current_period_end: now + Duration::days(30),
        cancel_at_period_end: false,
        stripe_subscription_id: None,
    }
}

#[tokio::test]
async fn plans_roundtrip_and_ordering() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    assert_eq!(s.count_plans().await.unwrap(), 0);

    s.insert_plan(&plan("plan-enterprise-monthly", PlanTier::Enterprise, 199.0, -1))
        .await
        .unwrap();
    s.insert_plan(&plan("plan-free", PlanTier::Free, 0.0, 50))
        .await
        .unwrap();
    s.insert_plan(&plan("plan-pro-monthly", PlanTier::Pro, 49.0, 1000))
        .await
        .unwrap();

    assert_eq!(s.count_plans().await.unwrap(), 3);

    // Cheapest first.
    let plans = s.list_plans().await.unwrap();
    let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        ["plan-free", "plan-pro-monthly", "plan-enterprise-monthly"]
    );

    let pro = s.get_plan(&PlanId::from("plan-pro-monthly")).await.unwrap();
    assert_eq!(pro.tier, PlanTier::Pro);
    assert_eq!(pro.limits.max_ai_queries, 1000);
    assert!(pro.features.priority_support);
    assert!(!pro.features.sso_enabled);

    assert!(matches!(
        s.get_plan(&PlanId::from("plan-unknown")).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        s.insert_plan(&plan("plan-free", PlanTier::Free, 0.0, 50)).await,
        Err(StoreError::AlreadyExists)
    ));
}

#[tokio::test]
async fn subscription_lifecycle_is_append_only() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    s.insert_plan(&plan("plan-free", PlanTier::Free, 0.0, 50))
        .await
        .unwrap();
    s.insert_plan(&plan("plan-pro-monthly", PlanTier::Pro, 49.0, 1000))
        .await
        .unwrap();

    let user = UserId(Uuid::new_v4());
    let company = CompanyId(Uuid::new_v4());

    assert!(s
        .get_active_subscription(&user, &company)
        .await
        .unwrap()
        .is_none());

    let free = s
        .create_subscription(&subscription_params(user, company, "plan-free"))
        .await
        .unwrap();
    let active = s
        .get_active_subscription(&user, &company)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, free.id);
    assert_eq!(active.plan_id.as_str(), "plan-free");
    assert_eq!(active.status, SubscriptionStatus::Active);

    // Upgrade cancels the old row and inserts a new one.
    s.set_subscription_status(&free.id, SubscriptionStatus::Canceled)
        .await
        .unwrap();
    let pro = s
        .create_subscription(&subscription_params(user, company, "plan-pro-monthly"))
        .await
        .unwrap();

    let active = s
        .get_active_subscription(&user, &company)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, pro.id);
    assert_eq!(active.plan_id.as_str(), "plan-pro-monthly");

    // A different company sees nothing.
    assert!(s
        .get_active_subscription(&user, &CompanyId(Uuid::new_v4()))
        .await
        .unwrap()
        .is_none());

    // Updating a nonexistent row is an error.
    assert!(matches!(
        s.set_subscription_status(
            &girder_storage::SubscriptionId(Uuid::new_v4()),
            SubscriptionStatus::Canceled
        )
        .await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn usage_counters_upsert_and_period_isolation() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let user = UserId(Uuid::new_v4());
    let company = CompanyId(Uuid::new_v4());
    let jan: Period = "2026-01".parse().unwrap();
    let feb = jan.next();

    assert!(s.get_usage(&user, &company, &jan).await.unwrap().is_none());

    for _ in 0..3 {
        s.increment_usage(&user, &company, &jan, UsageMetric::AiQueries)
            .await
            .unwrap();
    }
    s.increment_usage(&user, &company, &jan, UsageMetric::ApiCalls)
        .await
        .unwrap();

    let usage = s.get_usage(&user, &company, &jan).await.unwrap().unwrap();
    assert_eq!(usage.ai_queries, 3);
    assert_eq!(usage.api_calls, 1);
    assert_eq!(usage.flow_runs, 0);

    // A new period starts from a fresh zeroed row.
    s.increment_usage(&user, &company, &feb, UsageMetric::AiQueries)
        .await
        .unwrap();
    let usage = s.get_usage(&user, &company, &feb).await.unwrap().unwrap();
    assert_eq!(usage.ai_queries, 1);
}

#[tokio::test]
async fn atomic_increment_stops_at_limit() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let user = UserId(Uuid::new_v4());
    let company = CompanyId(Uuid::new_v4());
    let period: Period = "2026-02".parse().unwrap();

    let limit = 3;
    let mut results = Vec::new();
    for _ in 0..5 {
        results.push(
            s.increment_usage_if_below(&user, &company, &period, UsageMetric::SandboxRuns, limit)
                .await
                .unwrap(),
        );
    }
    assert_eq!(results, [Some(1), Some(2), Some(3), None, None]);

    // Denied attempts must not touch the counter.
    let usage = s.get_usage(&user, &company, &period).await.unwrap().unwrap();
    assert_eq!(usage.sandbox_runs, 3);

    // Other metrics are unaffected by the exhausted one.
    let bumped = s
        .increment_usage_if_below(&user, &company, &period, UsageMetric::AiQueries, limit)
        .await
        .unwrap();
    assert_eq!(bumped, Some(1));
}

#[tokio::test]
async fn tier_change_history_appends() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let user = UserId(Uuid::new_v4());

    s.append_tier_change(&RecordTierChangeParams {
        user_id: user,
        old_tier: PlanTier::Free,
        new_tier: PlanTier::Pro,
        reason: "upgrade".to_string(),
        changed_by: "system".to_string(),
        metadata: Some(serde_json::json!({"plan_id": "plan-pro-monthly"})),
    })
    .await
    .unwrap();
    s.append_tier_change(&RecordTierChangeParams {
        user_id: user,
        old_tier: PlanTier::Pro,
        new_tier: PlanTier::Enterprise,
        reason: "upgrade".to_string(),
        changed_by: user.0.to_string(),
        metadata: None,
    })
    .await
    .unwrap();

    let changes = s.list_tier_changes(&user).await.unwrap();
    assert_eq!(changes.len(), 2);
    // Newest first.
    assert_eq!(changes[0].new_tier, PlanTier::Enterprise);
    assert_eq!(changes[1].new_tier, PlanTier::Pro);
    assert_eq!(
        changes[1].metadata.as_ref().unwrap()["plan_id"],
        "plan-pro-monthly"
    );

    // Other users have no history.
    let other = s.list_tier_changes(&UserId(Uuid::new_v4())).await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn usage_notifications_track_latest_per_metric() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let user = UserId(Uuid::new_v4());
    let company = CompanyId(Uuid::new_v4());
    let period: Period = "2026-03".parse().unwrap();

    assert!(s
        .latest_usage_notification(&user, &company, UsageMetric::AiQueries)
        .await
        .unwrap()
        .is_none());

    let inserted = s
        .insert_usage_notification(&CreateUsageNotificationParams {
            user_id: user,
            company_id: company,
            metric: UsageMetric::AiQueries,
            period,
            usage_percent: 82.5,
        })
        .await
        .unwrap();
    assert_eq!(inserted.usage_percent, 82.5);

    let latest = s
        .latest_usage_notification(&user, &company, UsageMetric::AiQueries)
        .await
        .unwrap();
    assert_eq!(latest, Some(inserted.created_at));

    // A warning for one metric doesn't mask another's.
    assert!(s
        .latest_usage_notification(&user, &company, UsageMetric::ApiCalls)
        .await
        .unwrap()
        .is_none());
}
