//! Append-only audit trail of subscription tier changes.

use chrono::{DateTime, Utc};

use super::{HistoryEntryId, PlanTier, UserId};

/// One tier change. Rows are only ever appended, never updated.
#[derive(Clone, Debug, PartialEq)]
pub struct TierChange {
    pub id: HistoryEntryId,
    pub user_id: UserId,
    pub old_tier: PlanTier,
    pub new_tier: PlanTier,
    /// Free-form reason (e.g. "upgrade", "downgrade", "admin_override").
    pub reason: String,
    /// Who triggered the change: a user id string, or "system".
    pub changed_by: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for appending a tier change.
#[derive(Clone, Debug)]
pub struct RecordTierChangeParams {
    pub user_id: UserId,
    pub old_tier: PlanTier,
    pub new_tier: PlanTier,
    pub reason: String,
    pub changed_by: String,
    pub metadata: Option<serde_json::Value>,
}
