//! Role and plan-tier enums shared across the quota and navigation layers.

use std::str::FromStr;

/// Role of an authenticated user within a company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Developer,
    SuperAdmin,
    CompanyAdmin,
    ProjectManager,
    Supervisor,
    Operative,
}

/// Error type for parsing Role from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl std::fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer" => Ok(Role::Developer),
            "super_admin" => Ok(Role::SuperAdmin),
            "company_admin" => Ok(Role::CompanyAdmin),
            "project_manager" => Ok(Role::ProjectManager),
            "supervisor" => Ok(Role::Supervisor),
            "operative" => Ok(Role::Operative),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::SuperAdmin => "super_admin",
            Role::CompanyAdmin => "company_admin",
            Role::ProjectManager => "project_manager",
            Role::Supervisor => "supervisor",
            Role::Operative => "operative",
        }
    }
}

/// Billing plan tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanTier {
    Free,
    Pro,
    Enterprise,
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            "enterprise" => Ok(PlanTier::Enterprise),
            _ => Err(format!("invalid plan tier: {}", s)),
        }
    }
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }
}

/// Subscription status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
    Trialing,
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            _ => Err(format!("invalid subscription status: {}", s)),
        }
    }
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Trialing => "trialing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            Role::Developer,
            Role::SuperAdmin,
            Role::CompanyAdmin,
            Role::ProjectManager,
            Role::Supervisor,
            Role::Operative,
        ] {
            let s = role.as_str();
            let parsed: Role = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_role_parse_invalid() {
        assert!("site_operative".parse::<Role>().is_err());
        assert!("Developer".parse::<Role>().is_err()); // Case sensitive
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_parse_role_error_display() {
        let err = ParseRoleError("foreman".to_string());
        assert!(err.to_string().contains("foreman"));
    }

    #[test]
    fn test_plan_tier_roundtrip() {
        for tier in [PlanTier::Free, PlanTier::Pro, PlanTier::Enterprise] {
            assert_eq!(tier.as_str().parse::<PlanTier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_subscription_status_roundtrip() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Trialing,
        ] {
            assert_eq!(
                status.as_str().parse::<SubscriptionStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_subscription_status_parse_invalid() {
        assert!("unpaid".parse::<SubscriptionStatus>().is_err());
    }
}
