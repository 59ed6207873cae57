//! Subscription types for billing and quota resolution.

use chrono::{DateTime, Utc};

use super::{CompanyId, PlanId, SubscriptionId, SubscriptionStatus, UserId};

/// Subscription record.
///
/// At most one `active` row exists per `(user_id, company_id)`; a plan
/// change cancels the prior row and inserts a fresh one, so the table is an
/// append-only history of rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    /// Carried for payment-provider integration; never populated by this
    /// subsystem.
    pub stripe_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for inserting a subscription row.
#[derive(Clone, Debug)]
pub struct CreateSubscriptionParams {
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    pub stripe_subscription_id: Option<String>,
}
