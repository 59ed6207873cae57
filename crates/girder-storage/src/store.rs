//! The storage trait the billing/quota layer depends on.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{
    CompanyId, CreateSubscriptionParams, CreateUsageNotificationParams, Period, Plan, PlanId,
    RecordTierChangeParams, Subscription, SubscriptionId, SubscriptionStatus, TierChange,
    UsageMetric, UsageMetrics, UsageNotification, UserId,
};

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Optional explicit transaction interface.
/// For simple backends you can stub this out and let methods be atomic.
pub trait Transaction {
    fn commit(self) -> Result<(), StoreError>;
    fn rollback(self) -> Result<(), StoreError>;
}

/// The storage trait for the subscription/quota subsystem.
///
/// Quota-critical methods are scoped by `(user_id, company_id)`; usage
/// counters are additionally scoped by calendar [`Period`].
#[async_trait::async_trait]
pub trait Store {
    type Txn: Transaction;

    // ─────────────────────────────── Lifecycle ───────────────────────────────

    /// Optional explicit transaction (backends may ignore if not needed).
    async fn begin_txn(&self) -> Result<Self::Txn, StoreError>;

    // ───────────────────────────────── Plans ─────────────────────────────────

    /// Number of plan rows (used to guard the idempotent seed).
    async fn count_plans(&self) -> Result<i64, StoreError>;

    /// Insert a plan row. Plans are reference data; this is only called by
    /// the seed path.
    async fn insert_plan(&self, plan: &Plan) -> Result<(), StoreError>;

    /// All plans, cheapest first.
    async fn list_plans(&self) -> Result<Vec<Plan>, StoreError>;

    /// Get a plan by id.
    async fn get_plan(&self, plan_id: &PlanId) -> Result<Plan, StoreError>;

    // ───────────────────────────── Subscriptions ─────────────────────────────

    /// Insert a subscription row (returns the stored record).
    async fn create_subscription(
        &self,
        params: &CreateSubscriptionParams,
    ) -> Result<Subscription, StoreError>;

    /// The newest `active` subscription for a (user, company), if any.
    async fn get_active_subscription(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Update the status of one subscription row (used to cancel the prior
    /// row on plan change; rows are otherwise immutable).
    async fn set_subscription_status(
        &self,
        subscription_id: &SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError>;

    // ───────────────────────────────── Usage ─────────────────────────────────

    /// The counter row for a (user, company, period), or `None` when no
    /// usage has been recorded yet.
    async fn get_usage(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        period: &Period,
    ) -> Result<Option<UsageMetrics>, StoreError>;

    /// Upsert-increment one counter by exactly 1 (row created with 1 when
    /// absent). Unconditional; pairs with an advisory quota check.
    async fn increment_usage(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        period: &Period,
        metric: UsageMetric,
    ) -> Result<(), StoreError>;

    /// Atomic check-and-increment: bump the counter only while it is below
    /// `limit`, in a single statement. Returns the counter value after the
    /// increment, or `None` if the counter was already at or above `limit`
    /// (counter unchanged).
    async fn increment_usage_if_below(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        period: &Period,
        metric: UsageMetric,
        limit: i64,
    ) -> Result<Option<i64>, StoreError>;

    // ──────────────────────────── Tier-change history ─────────────────────────

    /// Append a tier change to the audit trail.
    async fn append_tier_change(
        &self,
        params: &RecordTierChangeParams,
    ) -> Result<TierChange, StoreError>;

    /// Tier changes for a user, newest first.
    async fn list_tier_changes(&self, user_id: &UserId) -> Result<Vec<TierChange>, StoreError>;

    // ───────────────────────────── Notifications ─────────────────────────────

    /// Insert a usage-warning notification row.
    async fn insert_usage_notification(
        &self,
        params: &CreateUsageNotificationParams,
    ) -> Result<UsageNotification, StoreError>;

    /// Timestamp of the most recent usage warning for (user, company,
    /// metric), if any. Drives the 24-hour dedup window.
    async fn latest_usage_notification(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;
}
