use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
    Pending,
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        SubscriptionStatus::Active
    }
}

/// Subscription tier. Plans are reference data keyed by a fixed string id
/// (`free`, `basic`, `pro`) and maintained by migration, not through the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in MXN per month; 0 for free plans.
    pub price_monthly: Decimal,
    /// Soft limit; not enforced anywhere yet.
    pub max_venues: i32,
    /// Soft limit; not enforced anywhere yet.
    pub max_events_per_month: i32,
    pub features: serde_json::Value,
    /// External billing product reference. Never serialized out.
    #[serde(skip_serializing, default)]
    pub stripe_product_id: Option<String>,
    pub is_active: bool,
}

/// Subscription shape returned by the API, with plan and user context joined
/// in. External billing identifiers stay in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubscriptionDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub plan_id: String,
    pub plan_name: String,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub renewal_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpgradeRequest {
    /// Required; checked by the handler so a missing value maps to 400
    /// rather than a deserialization error.
    pub plan_id: Option<String>,
}
