use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_category", rename_all = "snake_case")]
pub enum EventCategory {
    Exhibition,
    Performance,
    Workshop,
    Conference,
    Festival,
    Cinema,
    Music,
    Theater,
    Dance,
    Art,
    Literature,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Archived,
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Draft
    }
}

/// Full event shape with owner and venue names joined in.
///
/// The timing flags are not stored; they default to `false` when a row is
/// fetched and are filled in by [`EventDetail::with_timing`] before the event
/// is serialized out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventDetail {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: EventCategory,
    pub image: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub registered_count: i32,
    pub price: Decimal,
    pub is_free: bool,
    pub registration_url: Option<String>,
    pub status: EventStatus,
    pub is_featured: bool,
    #[sqlx(default)]
    pub is_upcoming: bool,
    #[sqlx(default)]
    pub is_ongoing: bool,
    #[sqlx(default)]
    pub is_past: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventDetail {
    /// Computes the derived timing flags against an explicit clock value.
    pub fn with_timing(mut self, now: DateTime<Utc>) -> Self {
        self.is_upcoming = self.start_datetime > now;
        self.is_ongoing = self.start_datetime <= now && now <= self.end_datetime;
        self.is_past = self.end_datetime < now;
        self
    }
}

/// Lightweight shape for event listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: EventCategory,
    pub image: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub venue_name: String,
    pub is_free: bool,
    pub price: Decimal,
    pub is_featured: bool,
    pub owner_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    pub venue: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        custom(function = "crate::common::validate_slug_format")
    )]
    pub slug: String,
    pub description: String,
    pub category: EventCategory,
    pub image: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: Option<i32>,
    /// Price in MXN; 0 for free events.
    pub price: Option<Decimal>,
    pub is_free: Option<bool>,
    #[validate(url(message = "Invalid URL"))]
    pub registration_url: Option<String>,
    pub status: Option<EventStatus>,
    pub is_featured: Option<bool>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    pub venue: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        custom(function = "crate::common::validate_slug_format")
    )]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub image: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub is_free: Option<bool>,
    #[validate(url(message = "Invalid URL"))]
    pub registration_url: Option<String>,
    pub status: Option<EventStatus>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventQuery {
    pub category: Option<EventCategory>,
    /// City of the hosting venue.
    #[serde(alias = "venue__city")]
    pub venue_city: Option<String>,
    pub is_featured: Option<bool>,
    pub is_free: Option<bool>,
    /// Free-text search over title, description and venue name.
    pub search: Option<String>,
    /// Comma-separated field names, `-` prefix for descending.
    pub ordering: Option<String>,
}

/// The stored price is authoritative over the client-supplied flag: any
/// positive price makes the event paid.
pub fn resolve_is_free(price: Decimal, requested: Option<bool>) -> bool {
    if price > Decimal::ZERO {
        false
    } else {
        requested.unwrap_or(true)
    }
}

/// Events must end after they start.
pub fn validate_date_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), &'static str> {
    if end <= start {
        return Err("End time must be after start time.");
    }
    Ok(())
}
