//! Persisted usage-warning notifications.

use chrono::{DateTime, Utc};

use super::{CompanyId, NotificationId, Period, UsageMetric, UserId};

/// A `usage_warning` row, recorded when a user's metered usage crosses the
/// warning threshold. The row's timestamp drives the 24-hour dedup window.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageNotification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub metric: UsageMetric,
    pub period: Period,
    pub usage_percent: f64,
    pub created_at: DateTime<Utc>,
}

/// Parameters for inserting a usage warning.
#[derive(Clone, Debug)]
pub struct CreateUsageNotificationParams {
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub metric: UsageMetric,
    pub period: Period,
    pub usage_percent: f64,
}
