use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "venue_category", rename_all = "snake_case")]
pub enum VenueCategory {
    Museum,
    Gallery,
    Theater,
    Cinema,
    Cafe,
    CulturalCenter,
    Library,
    Market,
    PublicSpace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "venue_status", rename_all = "snake_case")]
pub enum VenueStatus {
    Draft,
    Published,
    Archived,
}

impl Default for VenueStatus {
    fn default() -> Self {
        VenueStatus::Draft
    }
}

/// Full venue shape with the owner's display name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VenueDetail {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: VenueCategory,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
    pub status: VenueStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lightweight shape for venue listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VenueSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: VenueCategory,
    pub city: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub owner_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        custom(function = "crate::common::validate_slug_format")
    )]
    pub slug: String,
    pub description: String,
    pub category: VenueCategory,
    #[validate(length(min = 1, max = 500, message = "Address must be between 1 and 500 characters"))]
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub website: Option<String>,
    pub image: Option<String>,
    pub status: Option<VenueStatus>,
    pub is_featured: Option<bool>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVenueRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"),
        custom(function = "crate::common::validate_slug_format")
    )]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<VenueCategory>,
    #[validate(length(min = 1, max = 500, message = "Address must be between 1 and 500 characters"))]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub website: Option<String>,
    pub image: Option<String>,
    pub status: Option<VenueStatus>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VenueQuery {
    pub category: Option<VenueCategory>,
    pub city: Option<String>,
    pub is_featured: Option<bool>,
    /// Free-text search over name, description and address.
    pub search: Option<String>,
    /// Comma-separated field names, `-` prefix for descending.
    pub ordering: Option<String>,
}
