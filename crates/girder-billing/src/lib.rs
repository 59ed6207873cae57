//! girder-billing - Subscription and usage metering for girder
//!
//! This crate provides the service layer over [`girder_storage::Store`] for:
//! - Plan catalog management (seeded reference data: free/pro/enterprise)
//! - Subscription lifecycle (append-only rows plus a tier-change audit trail)
//! - Usage quotas per user, company, and calendar month
//!
//! # Quota paths
//!
//! Two quota paths exist side by side:
//! - [`BillingService::check_quota`] + [`BillingService::track_usage`]: the
//!   advisory pair. The caller checks before a metered action and tracks
//!   after it, with no atomicity between the two: concurrent requests can
//!   overshoot a limit by the degree of concurrency.
//! - [`BillingService::consume`]: a single atomic check-and-increment that
//!   cannot overshoot. Use it where limits must hold exactly.

use std::sync::Arc;

use chrono::{Duration, Utc};
use girder_storage::{
    CompanyId, CreateSubscriptionParams, CreateUsageNotificationParams, Period, Plan, PlanId,
    RecordTierChangeParams, Store, StoreError, Subscription, SubscriptionStatus, TierChange,
    UsageMetric, UsageMetrics, UserId, UNLIMITED,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod catalog;
pub use catalog::{builtin_plans, FREE_PLAN_ID};

/// Usage percentage at which a warning notification fires.
pub const WARNING_THRESHOLD_PERCENT: f64 = 80.0;

/// Minimum gap in hours between two warnings for the same
/// (user, company, metric).
const WARNING_DEDUP_HOURS: i64 = 24;

/// Free subscriptions don't expire; give them a far-future period end.
const FREE_PERIOD_DAYS: i64 = 36525; // ~100 years

/// Paid subscription billing period.
const PAID_PERIOD_DAYS: i64 = 30;

/// Billing service errors
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Outcome of a quota check or consume attempt.
///
/// `limit` is `-1` for unlimited plans and `0` when the user has no
/// resolvable subscription or plan (fail closed).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub current: i64,
    pub limit: i64,
}

impl QuotaDecision {
    /// Denial used when no subscription or plan resolves.
    fn no_access() -> Self {
        Self {
            allowed: false,
            current: 0,
            limit: 0,
        }
    }
}

/// Subscription/quota service over any [`Store`] backend.
pub struct BillingService<S> {
    store: Arc<S>,
}

impl<S: Store + Send + Sync> BillingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ───────────────────────────── Plan catalog ──────────────────────────────

    /// Seed the built-in plans if the catalog is empty. Idempotent; guarded
    /// by a row-count check so restarts don't duplicate reference data.
    pub async fn seed_plans(&self) -> Result<(), BillingError> {
        if self.store.count_plans().await? > 0 {
            return Ok(());
        }
        for plan in builtin_plans() {
            self.store.insert_plan(&plan).await?;
        }
        tracing::info!("subscription plans seeded");
        Ok(())
    }

    /// All plans, cheapest first.
    pub async fn all_plans(&self) -> Result<Vec<Plan>, BillingError> {
        Ok(self.store.list_plans().await?)
    }

    /// Look up a plan, mapping a missing row to [`BillingError::UnknownPlan`].
    pub async fn plan_by_id(&self, plan_id: &PlanId) -> Result<Plan, BillingError> {
        match self.store.get_plan(plan_id).await {
            Ok(plan) => Ok(plan),
            Err(StoreError::NotFound) => Err(BillingError::UnknownPlan(plan_id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    // ───────────────────────────── Subscriptions ─────────────────────────────

    /// The active subscription for a (user, company), creating a free-plan
    /// subscription on first sight.
    pub async fn ensure_subscription(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<Subscription, BillingError> {
        if let Some(subscription) = self
            .store
            .get_active_subscription(user_id, company_id)
            .await?
        {
            return Ok(subscription);
        }

        let now = Utc::now();
        let subscription = self
            .store
            .create_subscription(&CreateSubscriptionParams {
                user_id: *user_id,
                company_id: *company_id,
                plan_id: PlanId::from(FREE_PLAN_ID),
                status: SubscriptionStatus::Active,
                current_period_start: now,
                current_period_end: now + Duration::days(FREE_PERIOD_DAYS),
                cancel_at_period_end: false,
                stripe_subscription_id: None,
            })
            .await?;
        tracing::info!(
            user_id = %user_id.0,
            company_id = %company_id.0,
            "created free subscription"
        );
        Ok(subscription)
    }

    /// Switch a (user, company) to a different plan.
    ///
    /// The prior active row is marked canceled and a fresh active row is
    /// inserted (rows are never edited in place), and the change is appended
    /// to the tier history. Changing to the already-active plan is a no-op.
    pub async fn change_plan(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        new_plan_id: &PlanId,
        reason: &str,
        changed_by: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Subscription, BillingError> {
        let new_plan = self.plan_by_id(new_plan_id).await?;
        let current = self.ensure_subscription(user_id, company_id).await?;
        if current.plan_id == *new_plan_id {
            return Ok(current);
        }
        let old_plan = self.plan_by_id(&current.plan_id).await?;

        self.store
            .set_subscription_status(&current.id, SubscriptionStatus::Canceled)
            .await?;

        let now = Utc::now();
        let period_days = if new_plan.price_monthly == 0.0 {
            FREE_PERIOD_DAYS
        } else {
            PAID_PERIOD_DAYS
        };
        let subscription = self
            .store
            .create_subscription(&CreateSubscriptionParams {
                user_id: *user_id,
                company_id: *company_id,
                plan_id: new_plan_id.clone(),
                status: SubscriptionStatus::Active,
                current_period_start: now,
                current_period_end: now + Duration::days(period_days),
                cancel_at_period_end: false,
                stripe_subscription_id: None,
            })
            .await?;

        self.store
            .append_tier_change(&RecordTierChangeParams {
                user_id: *user_id,
                old_tier: old_plan.tier,
                new_tier: new_plan.tier,
                reason: reason.to_string(),
                changed_by: changed_by.to_string(),
                metadata,
            })
            .await?;

        tracing::info!(
            user_id = %user_id.0,
            company_id = %company_id.0,
            old_tier = old_plan.tier.as_str(),
            new_tier = new_plan.tier.as_str(),
            "plan changed"
        );
        Ok(subscription)
    }

    /// Tier changes for a user, newest first.
    pub async fn tier_history(&self, user_id: &UserId) -> Result<Vec<TierChange>, BillingError> {
        Ok(self.store.list_tier_changes(user_id).await?)
    }

    // ──────────────────────────────── Quotas ─────────────────────────────────

    /// Advisory quota check for the current period. Read-only; see the crate
    /// docs for the race it carries when paired with [`Self::track_usage`].
    pub async fn check_quota(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<QuotaDecision, BillingError> {
        self.check_quota_in(user_id, company_id, metric, &Period::current())
            .await
    }

    async fn check_quota_in(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
        period: &Period,
    ) -> Result<QuotaDecision, BillingError> {
        let Some(limit) = self.resolve_limit(user_id, company_id, metric).await? else {
            return Ok(QuotaDecision::no_access());
        };
        if limit == UNLIMITED {
            return Ok(QuotaDecision {
                allowed: true,
                current: 0,
                limit: UNLIMITED,
            });
        }

        let current = self
            .store
            .get_usage(user_id, company_id, period)
            .await?
            .map(|usage| usage.get(metric))
            .unwrap_or(0);

        Ok(QuotaDecision {
            // Strictly less: the request that finds current == limit is the
            // one that gets denied.
            allowed: current < limit,
            current,
            limit,
        })
    }

    /// Record one unit of usage in the current period. Fire-and-forget
    /// accounting; performs no quota check of its own.
    pub async fn track_usage(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<(), BillingError> {
        self.store
            .increment_usage(user_id, company_id, &Period::current(), metric)
            .await?;
        Ok(())
    }

    /// Atomic check-and-increment for the current period. Unlike the
    /// check/track pair, concurrent callers cannot push a finite limit past
    /// its cap.
    pub async fn consume(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<QuotaDecision, BillingError> {
        self.consume_in(user_id, company_id, metric, &Period::current())
            .await
    }

    async fn consume_in(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
        period: &Period,
    ) -> Result<QuotaDecision, BillingError> {
        let Some(limit) = self.resolve_limit(user_id, company_id, metric).await? else {
            return Ok(QuotaDecision::no_access());
        };
        if limit == UNLIMITED {
            let count = self
                .store
                .increment_usage_if_below(user_id, company_id, period, metric, i64::MAX)
                .await?
                .unwrap_or(0);
            return Ok(QuotaDecision {
                allowed: true,
                current: count,
                limit: UNLIMITED,
            });
        }

        match self
            .store
            .increment_usage_if_below(user_id, company_id, period, metric, limit)
            .await?
        {
            Some(count) => Ok(QuotaDecision {
                allowed: true,
                current: count,
                limit,
            }),
            None => {
                let current = self
                    .store
                    .get_usage(user_id, company_id, period)
                    .await?
                    .map(|usage| usage.get(metric))
                    .unwrap_or(0);
                Ok(QuotaDecision {
                    allowed: false,
                    current,
                    limit,
                })
            }
        }
    }

    /// The full current-period counter row, zeroed when nothing has been
    /// recorded yet.
    pub async fn current_usage(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<UsageMetrics, BillingError> {
        let period = Period::current();
        Ok(self
            .store
            .get_usage(user_id, company_id, &period)
            .await?
            .unwrap_or_else(|| UsageMetrics::zeroed(*user_id, *company_id, period)))
    }

    // ─────────────────────────── Usage warnings ──────────────────────────────

    /// Fire a `usage_warning` notification if the metric sits in the warning
    /// band (80% ≤ usage < 100%) and none was recorded for the same
    /// (user, company, metric) within the last 24 hours.
    ///
    /// Returns the inserted notification, or `None` when outside the band or
    /// deduplicated.
    pub async fn check_usage_warning(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<Option<girder_storage::UsageNotification>, BillingError> {
        let period = Period::current();
        let decision = self
            .check_quota_in(user_id, company_id, metric, &period)
            .await?;
        if decision.limit <= 0 {
            // Unlimited plans and fail-closed denials never warn.
            return Ok(None);
        }

        let usage_percent = decision.current as f64 / decision.limit as f64 * 100.0;
        if !(WARNING_THRESHOLD_PERCENT..100.0).contains(&usage_percent) {
            return Ok(None);
        }

        if let Some(last) = self
            .store
            .latest_usage_notification(user_id, company_id, metric)
            .await?
        {
            if Utc::now() - last < Duration::hours(WARNING_DEDUP_HOURS) {
                return Ok(None);
            }
        }

        let notification = self
            .store
            .insert_usage_notification(&CreateUsageNotificationParams {
                user_id: *user_id,
                company_id: *company_id,
                metric,
                period,
                usage_percent,
            })
            .await?;
        tracing::warn!(
            user_id = %user_id.0,
            company_id = %company_id.0,
            metric = metric.as_str(),
            usage_percent,
            "usage warning"
        );
        Ok(Some(notification))
    }

    // ──────────────────────────────── Internal ───────────────────────────────

    /// Resolve the limit governing `metric`, or `None` when the user has no
    /// active subscription or its plan row is missing (fail closed).
    async fn resolve_limit(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<Option<i64>, BillingError> {
        let Some(subscription) = self
            .store
            .get_active_subscription(user_id, company_id)
            .await?
        else {
            return Ok(None);
        };
        let plan = match self.store.get_plan(&subscription.plan_id).await {
            Ok(plan) => plan,
            Err(StoreError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(plan.limits.limit_for(metric)))
    }
}
