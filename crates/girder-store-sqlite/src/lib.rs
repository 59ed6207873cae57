use std::str::FromStr;

use chrono::{DateTime, Utc};
use girder_storage::{
    CompanyId, CreateSubscriptionParams, CreateUsageNotificationParams, HistoryEntryId,
    NotificationId, Period, Plan, PlanFeatures, PlanId, PlanLimits, PlanTier,
    RecordTierChangeParams, Store, StoreError, Subscription, SubscriptionId, SubscriptionStatus,
    TierChange, Transaction, UsageMetric, UsageMetrics, UsageNotification, UserId,
};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

pub struct SqliteTxn;
impl Transaction for SqliteTxn {
    fn commit(self) -> Result<(), StoreError> {
        Ok(())
    }
    fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl SqliteStore {
    /// `~/.girder/store.db` (creates dir with 0700 perms on unix)
    pub async fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| StoreError::Backend("no home dir".into()))?
            .join(".girder");
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Backend(e.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let path = dir.join("store.db");
        let url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
        Self::open(&url).await
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    Uuid::try_parse(s).map_err(|e| StoreError::Backend(e.to_string()))
}

fn from_unix(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {}", secs)))
}

fn map_unique(e: sqlx::Error) -> StoreError {
    let s = e.to_string();
    if s.contains("UNIQUE") {
        StoreError::AlreadyExists
    } else {
        StoreError::Backend(s)
    }
}

fn map_plan_row(row: &SqliteRow) -> Result<Plan, StoreError> {
    let backend = |e: sqlx::Error| StoreError::Backend(e.to_string());
    let tier: String = row.try_get("tier").map_err(backend)?;
    let flag = |name: &str| -> Result<bool, StoreError> {
        Ok(row.try_get::<i64, _>(name).map_err(backend)? != 0)
    };
    Ok(Plan {
        id: PlanId(row.try_get::<String, _>("id").map_err(backend)?),
        name: row.try_get("name").map_err(backend)?,
        tier: PlanTier::from_str(&tier).map_err(StoreError::Backend)?,
        price_monthly: row.try_get("price_monthly").map_err(backend)?,
        limits: PlanLimits {
            max_flows: row.try_get("max_flows").map_err(backend)?,
            max_runs: row.try_get("max_runs").map_err(backend)?,
            max_sandbox_runs: row.try_get("max_sandbox_runs").map_err(backend)?,
            max_ai_queries: row.try_get("max_ai_queries").map_err(backend)?,
            max_api_calls_per_minute: row.try_get("max_api_calls_per_minute").map_err(backend)?,
            max_team_members: row.try_get("max_team_members").map_err(backend)?,
            max_storage_gb: row.try_get("max_storage_gb").map_err(backend)?,
        },
        features: PlanFeatures {
            custom_domain: flag("custom_domain")?,
            white_label: flag("white_label")?,
            priority_support: flag("priority_support")?,
            advanced_analytics: flag("advanced_analytics")?,
            custom_integrations: flag("custom_integrations")?,
            sso_enabled: flag("sso_enabled")?,
        },
    })
}

type SubscriptionRow = (
    String,         // id
    String,         // user_id
    String,         // company_id
    String,         // plan_id
    String,         // status
    i64,            // current_period_start
    i64,            // current_period_end
    i64,            // cancel_at_period_end
    Option<String>, // stripe_subscription_id
    i64,            // created_at
    i64,            // updated_at
);

fn map_subscription_row(row: SubscriptionRow) -> Result<Subscription, StoreError> {
    let (id, user_id, company_id, plan_id, status, start, end, cape, stripe, created, updated) =
        row;
    Ok(Subscription {
        id: SubscriptionId(parse_uuid(&id)?),
        user_id: UserId(parse_uuid(&user_id)?),
        company_id: CompanyId(parse_uuid(&company_id)?),
        plan_id: PlanId(plan_id),
        status: SubscriptionStatus::from_str(&status).map_err(StoreError::Backend)?,
        current_period_start: from_unix(start)?,
        current_period_end: from_unix(end)?,
        cancel_at_period_end: cape != 0,
        stripe_subscription_id: stripe,
        created_at: from_unix(created)?,
        updated_at: from_unix(updated)?,
    })
}

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, company_id, plan_id, status, \
     current_period_start, current_period_end, cancel_at_period_end, \
     stripe_subscription_id, created_at, updated_at";

#[async_trait::async_trait]
impl Store for SqliteStore {
    type Txn = SqliteTxn;

    async fn begin_txn(&self) -> Result<Self::Txn, StoreError> {
        Ok(SqliteTxn)
    }

    // ───────────────────────────────── Plans ─────────────────────────────────

    async fn count_plans(&self) -> Result<i64, StoreError> {
        let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM subscription_plans")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(count)
    }

    async fn insert_plan(&self, plan: &Plan) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO subscription_plans(
                 id, name, tier, price_monthly,
                 max_flows, max_runs, max_sandbox_runs, max_ai_queries,
                 max_api_calls_per_minute, max_team_members, max_storage_gb,
                 custom_domain, white_label, priority_support,
                 advanced_analytics, custom_integrations, sso_enabled,
                 created_at)
             VALUES(?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(plan.id.as_str())
        .bind(&plan.name)
        .bind(plan.tier.as_str())
        .bind(plan.price_monthly)
        .bind(plan.limits.max_flows)
        .bind(plan.limits.max_runs)
        .bind(plan.limits.max_sandbox_runs)
        .bind(plan.limits.max_ai_queries)
        .bind(plan.limits.max_api_calls_per_minute)
        .bind(plan.limits.max_team_members)
        .bind(plan.limits.max_storage_gb)
        .bind(plan.features.custom_domain as i64)
        .bind(plan.features.white_label as i64)
        .bind(plan.features.priority_support as i64)
        .bind(plan.features.advanced_analytics as i64)
        .bind(plan.features.custom_integrations as i64)
        .bind(plan.features.sso_enabled as i64)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(map_unique)?;
        Ok(())
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, StoreError> {
        let rows = sqlx::query("SELECT * FROM subscription_plans ORDER BY price_monthly ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(map_plan_row).collect()
    }

    async fn get_plan(&self, plan_id: &PlanId) -> Result<Plan, StoreError> {
        let row = sqlx::query("SELECT * FROM subscription_plans WHERE id = ?")
            .bind(plan_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match row {
            None => Err(StoreError::NotFound),
            Some(row) => map_plan_row(&row),
        }
    }

    // ───────────────────────────── Subscriptions ─────────────────────────────

    async fn create_subscription(
        &self,
        params: &CreateSubscriptionParams,
    ) -> Result<Subscription, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO user_subscriptions(
                 id, user_id, company_id, plan_id, status,
                 current_period_start, current_period_end, cancel_at_period_end,
                 stripe_subscription_id, created_at, updated_at)
             VALUES(?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.user_id.0.to_string())
        .bind(params.company_id.0.to_string())
        .bind(params.plan_id.as_str())
        .bind(params.status.as_str())
        .bind(params.current_period_start.timestamp())
        .bind(params.current_period_end.timestamp())
        .bind(params.cancel_at_period_end as i64)
        .bind(params.stripe_subscription_id.as_deref())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique)?;

        Ok(Subscription {
            id: SubscriptionId(id),
            user_id: params.user_id,
            company_id: params.company_id,
            plan_id: params.plan_id.clone(),
            status: params.status,
            current_period_start: from_unix(params.current_period_start.timestamp())?,
            current_period_end: from_unix(params.current_period_end.timestamp())?,
            cancel_at_period_end: params.cancel_at_period_end,
            stripe_subscription_id: params.stripe_subscription_id.clone(),
            created_at: from_unix(now)?,
            updated_at: from_unix(now)?,
        })
    }

    async fn get_active_subscription(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<Option<Subscription>, StoreError> {
        let sql = format!(
            "SELECT {} FROM user_subscriptions
             WHERE user_id = ? AND company_id = ? AND status = 'active'
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            SUBSCRIPTION_COLUMNS
        );
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(user_id.0.to_string())
            .bind(company_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        row.map(map_subscription_row).transpose()
    }

    async fn set_subscription_status(
        &self,
        subscription_id: &SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE user_subscriptions SET status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(Utc::now().timestamp())
        .bind(subscription_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ───────────────────────────────── Usage ─────────────────────────────────

    async fn get_usage(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        period: &Period,
    ) -> Result<Option<UsageMetrics>, StoreError> {
        let row = sqlx::query_as::<_, (i64, i64, i64, i64, f64)>(
            "SELECT flow_runs, sandbox_runs, ai_queries, api_calls, storage_gb
             FROM usage_metrics
             WHERE user_id = ? AND company_id = ? AND period = ?",
        )
        .bind(user_id.0.to_string())
        .bind(company_id.0.to_string())
        .bind(period.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row.map(
            |(flow_runs, sandbox_runs, ai_queries, api_calls, storage_gb)| UsageMetrics {
                user_id: *user_id,
                company_id: *company_id,
                period: *period,
                flow_runs,
                sandbox_runs,
                ai_queries,
                api_calls,
                storage_gb,
            },
        ))
    }

    async fn increment_usage(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        period: &Period,
        metric: UsageMetric,
    ) -> Result<(), StoreError> {
        // Column names come from the UsageMetric enum, a closed identifier set.
        let col = metric.as_str();
        let now = Utc::now().timestamp();
        let sql = format!(
            "INSERT INTO usage_metrics(user_id, company_id, period, {col}, created_at, updated_at)
             VALUES(?,?,?,1,?,?)
             ON CONFLICT(user_id, company_id, period)
             DO UPDATE SET {col} = {col} + 1, updated_at = excluded.updated_at"
        );
        sqlx::query(&sql)
            .bind(user_id.0.to_string())
            .bind(company_id.0.to_string())
            .bind(period.to_string())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn increment_usage_if_below(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        period: &Period,
        metric: UsageMetric,
        limit: i64,
    ) -> Result<Option<i64>, StoreError> {
        let col = metric.as_str();
        let now = Utc::now().timestamp();

        // Make sure the period row exists so the guarded update has a target.
        sqlx::query(
            "INSERT OR IGNORE INTO usage_metrics(user_id, company_id, period, created_at, updated_at)
             VALUES(?,?,?,?,?)",
        )
        .bind(user_id.0.to_string())
        .bind(company_id.0.to_string())
        .bind(period.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        // Single-statement compare-and-increment; concurrent callers cannot
        // both pass the guard for the final slot.
        let sql = format!(
            "UPDATE usage_metrics
             SET {col} = {col} + 1, updated_at = ?
             WHERE user_id = ? AND company_id = ? AND period = ? AND {col} < ?
             RETURNING {col}"
        );
        let row = sqlx::query_as::<_, (i64,)>(&sql)
            .bind(now)
            .bind(user_id.0.to_string())
            .bind(company_id.0.to_string())
            .bind(period.to_string())
            .bind(limit)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(row.map(|(count,)| count))
    }

    // ──────────────────────────── Tier-change history ─────────────────────────

    async fn append_tier_change(
        &self,
        params: &RecordTierChangeParams,
    ) -> Result<TierChange, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        let metadata = params
            .metadata
            .as_ref()
            .map(|v| serde_json::to_string(v).map_err(|e| StoreError::Backend(e.to_string())))
            .transpose()?;
        sqlx::query(
            "INSERT INTO subscription_history(
                 id, user_id, old_tier, new_tier, reason, changed_by, metadata, created_at)
             VALUES(?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.user_id.0.to_string())
        .bind(params.old_tier.as_str())
        .bind(params.new_tier.as_str())
        .bind(&params.reason)
        .bind(&params.changed_by)
        .bind(metadata.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique)?;

        Ok(TierChange {
            id: HistoryEntryId(id),
            user_id: params.user_id,
            old_tier: params.old_tier,
            new_tier: params.new_tier,
            reason: params.reason.clone(),
            changed_by: params.changed_by.clone(),
            metadata: params.metadata.clone(),
            created_at: from_unix(now)?,
        })
    }

    async fn list_tier_changes(&self, user_id: &UserId) -> Result<Vec<TierChange>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                String,
                String,
                String,
                String,
                String,
                String,
                Option<String>,
                i64,
            ),
        >(
            "SELECT id, user_id, old_tier, new_tier, reason, changed_by, metadata, created_at
             FROM subscription_history
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for (id, user, old_tier, new_tier, reason, changed_by, metadata, created) in rows {
            let metadata = metadata
                .map(|s| {
                    serde_json::from_str(&s).map_err(|e| StoreError::Backend(e.to_string()))
                })
                .transpose()?;
            out.push(TierChange {
                id: HistoryEntryId(parse_uuid(&id)?),
                user_id: UserId(parse_uuid(&user)?),
                old_tier: PlanTier::from_str(&old_tier).map_err(StoreError::Backend)?,
                new_tier: PlanTier::from_str(&new_tier).map_err(StoreError::Backend)?,
                reason,
                changed_by,
                metadata,
                created_at: from_unix(created)?,
            });
        }
        Ok(out)
    }

    // ───────────────────────────── Notifications ─────────────────────────────

    async fn insert_usage_notification(
        &self,
        params: &CreateUsageNotificationParams,
    ) -> Result<UsageNotification, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO subscription_notifications(
                 id, user_id, company_id, kind, metric, period, usage_percent, created_at)
             VALUES(?,?,?,'usage_warning',?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.user_id.0.to_string())
        .bind(params.company_id.0.to_string())
        .bind(params.metric.as_str())
        .bind(params.period.to_string())
        .bind(params.usage_percent)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique)?;

        Ok(UsageNotification {
            id: NotificationId(id),
            user_id: params.user_id,
            company_id: params.company_id,
            metric: params.metric,
            period: params.period,
            usage_percent: params.usage_percent,
            created_at: from_unix(now)?,
        })
    }

    async fn latest_usage_notification(
        &self,
        user_id: &UserId,
        company_id: &CompanyId,
        metric: UsageMetric,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT created_at FROM subscription_notifications
             WHERE user_id = ? AND company_id = ? AND metric = ? AND kind = 'usage_warning'
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(user_id.0.to_string())
        .bind(company_id.0.to_string())
        .bind(metric.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        row.map(|(created,)| from_unix(created)).transpose()
    }
}
