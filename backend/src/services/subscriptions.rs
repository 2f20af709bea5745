use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use cultura_models::subscriptions::{Plan, SubscriptionDetail, SubscriptionStatus};

use crate::errors::ApiError;

const PLAN_COLUMNS: &str = "id, name, description, price_monthly, max_venues, \
                            max_events_per_month, features, stripe_product_id, is_active";

const DETAIL_SELECT: &str = r#"
    SELECT s.id, s.user_id, u.email AS user_email,
           s.plan_id, p.name AS plan_name,
           s.status, s.start_date, s.end_date, s.renewal_date,
           s.created_at, s.updated_at
    FROM subscriptions s
    JOIN users u ON u.id = s.user_id
    JOIN plans p ON p.id = s.plan_id
"#;

pub struct SubscriptionService {
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Catalog listing; inactive plans are hidden but stay referenceable by
    /// existing subscriptions.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE is_active = TRUE ORDER BY price_monthly ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    pub async fn get_plan(&self, plan_id: &str) -> Result<Plan, ApiError> {
        sqlx::query_as::<_, Plan>(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Plan not found.".to_string()))
    }

    pub async fn get_for_user(&self, user_id: Uuid) -> Result<SubscriptionDetail, ApiError> {
        sqlx::query_as::<_, SubscriptionDetail>(&format!("{DETAIL_SELECT} WHERE s.user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User has no subscription.".to_string()))
    }

    /// Moves the user onto `plan_id`, creating the subscription row on first
    /// use. A user only ever holds one subscription; switching plans mutates
    /// it in place rather than opening a second one.
    pub async fn upgrade(
        &self,
        user_id: Uuid,
        plan_id: &str,
    ) -> Result<SubscriptionDetail, ApiError> {
        // 404 before touching the subscription so a bad plan id never
        // creates an empty record.
        self.get_plan(plan_id).await?;

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, user_id, plan_id, status, start_date,
                                       end_date, renewal_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NULL, NULL, $5, $5)
            ON CONFLICT (user_id)
            DO UPDATE SET plan_id = EXCLUDED.plan_id, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(plan_id)
        .bind(SubscriptionStatus::Active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!("User {} moved to plan {}", user_id, plan_id);
        self.get_for_user(user_id).await
    }
}
