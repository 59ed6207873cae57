//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// User identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Company (tenant) identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompanyId(pub Uuid);

/// Project identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProjectId(pub Uuid);

/// Subscription row identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

/// Tier-change history entry identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HistoryEntryId(pub Uuid);

/// Usage notification identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId(pub Uuid);

/// Plan identifier. Plans are seeded reference data with fixed string ids
/// (e.g. `plan-free`), not generated UUIDs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlanId {
    fn from(s: &str) -> Self {
        PlanId(s.to_string())
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_debug() {
        let uuid = Uuid::new_v4();
        let user_id = UserId(uuid);
        assert!(format!("{:?}", user_id).contains(&uuid.to_string()));
    }

    #[test]
    fn test_typed_ids_equality() {
        let uuid = Uuid::new_v4();
        assert_eq!(CompanyId(uuid), CompanyId(uuid));
        assert_ne!(CompanyId(uuid), CompanyId(Uuid::new_v4()));
    }

    #[test]
    fn test_typed_ids_hash() {
        use std::collections::HashSet;

        let uuid = Uuid::new_v4();
        let mut set = HashSet::new();
        set.insert(ProjectId(uuid));
        assert!(set.contains(&ProjectId(uuid)));
    }

    #[test]
    fn test_typed_ids_inner_access() {
        let uuid = Uuid::new_v4();
        assert_eq!(SubscriptionId(uuid).0, uuid);
        assert_eq!(NotificationId(uuid).0, uuid);
        assert_eq!(HistoryEntryId(uuid).0, uuid);
    }

    #[test]
    fn test_plan_id_display_and_from() {
        let id = PlanId::from("plan-free");
        assert_eq!(id.as_str(), "plan-free");
        assert_eq!(id.to_string(), "plan-free");
        assert_eq!(id, PlanId("plan-free".to_string()));
    }
}
