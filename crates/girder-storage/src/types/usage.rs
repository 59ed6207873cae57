//! Usage metering types: metrics, periods, and per-period counters.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::{CompanyId, UserId};

/// A countable, quota-governed action.
///
/// Storage consumption (`storage_gb`) is reported alongside these counters
/// but is not a countable metric: the limit map never governed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageMetric {
    FlowRuns,
    SandboxRuns,
    AiQueries,
    ApiCalls,
}

impl UsageMetric {
    /// Snake-case name; doubles as the counter column name in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageMetric::FlowRuns => "flow_runs",
            UsageMetric::SandboxRuns => "sandbox_runs",
            UsageMetric::AiQueries => "ai_queries",
            UsageMetric::ApiCalls => "api_calls",
        }
    }

    pub const ALL: [UsageMetric; 4] = [
        UsageMetric::FlowRuns,
        UsageMetric::SandboxRuns,
        UsageMetric::AiQueries,
        UsageMetric::ApiCalls,
    ];
}

impl std::fmt::Display for UsageMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UsageMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flow_runs" => Ok(UsageMetric::FlowRuns),
            "sandbox_runs" => Ok(UsageMetric::SandboxRuns),
            "ai_queries" => Ok(UsageMetric::AiQueries),
            "api_calls" => Ok(UsageMetric::ApiCalls),
            _ => Err(format!("unknown usage metric: {}", s)),
        }
    }
}

/// A calendar month, the usage-counter reset boundary. Renders as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// The period containing `at`.
    pub fn containing(at: &DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The current calendar month.
    pub fn current() -> Self {
        Self::containing(&Utc::now())
    }

    /// The following calendar month (wraps December into January).
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid period: {}", s))?;
        let year: i32 = y.parse().map_err(|_| format!("invalid period: {}", s))?;
        let month: u32 = m.parse().map_err(|_| format!("invalid period: {}", s))?;
        if y.len() != 4 || m.len() != 2 || !(1..=12).contains(&month) {
            return Err(format!("invalid period: {}", s));
        }
        Ok(Self { year, month })
    }
}

/// Per-user, per-company, per-period usage counters.
///
/// Counters only ever increase within a period; a new period starts a fresh
/// zeroed row.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageMetrics {
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub period: Period,
    pub flow_runs: i64,
    pub sandbox_runs: i64,
    pub ai_queries: i64,
    pub api_calls: i64,
    pub storage_gb: f64,
}

impl UsageMetrics {
    /// A fresh all-zero row for a (user, company, period) with no recorded
    /// usage yet.
    pub fn zeroed(user_id: UserId, company_id: CompanyId, period: Period) -> Self {
        Self {
            user_id,
            company_id,
            period,
            flow_runs: 0,
            sandbox_runs: 0,
            ai_queries: 0,
            api_calls: 0,
            storage_gb: 0.0,
        }
    }

    /// Read the counter for one metric.
    pub fn get(&self, metric: UsageMetric) -> i64 {
        match metric {
            UsageMetric::FlowRuns => self.flow_runs,
            UsageMetric::SandboxRuns => self.sandbox_runs,
            UsageMetric::AiQueries => self.ai_queries,
            UsageMetric::ApiCalls => self.api_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_period_display() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(Period::containing(&at).to_string(), "2026-03");
    }

    #[test]
    fn test_period_parse_roundtrip() {
        let p: Period = "2025-11".parse().unwrap();
        assert_eq!(p.to_string(), "2025-11");
    }

    #[test]
    fn test_period_parse_invalid() {
        assert!("2025".parse::<Period>().is_err());
        assert!("2025-13".parse::<Period>().is_err());
        assert!("2025-00".parse::<Period>().is_err());
        assert!("25-01".parse::<Period>().is_err());
        assert!("2025-1".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_next_wraps_year() {
        let dec: Period = "2025-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2026-01");
        let mar: Period = "2026-03".parse().unwrap();
        assert_eq!(mar.next().to_string(), "2026-04");
    }

    #[test]
    fn test_metric_roundtrip() {
        for metric in UsageMetric::ALL {
            assert_eq!(metric.as_str().parse::<UsageMetric>().unwrap(), metric);
        }
        assert!("storage_gb".parse::<UsageMetric>().is_err());
    }

    #[test]
    fn test_zeroed_counters() {
        let m = UsageMetrics::zeroed(
            UserId(Uuid::new_v4()),
            CompanyId(Uuid::new_v4()),
            "2026-01".parse().unwrap(),
        );
        for metric in UsageMetric::ALL {
            assert_eq!(m.get(metric), 0);
        }
        assert_eq!(m.storage_gb, 0.0);
    }
}
