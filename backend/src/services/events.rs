use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use cultura_models::events::{
    resolve_is_free, validate_date_range, CreateEventRequest, EventDetail, EventQuery,
    EventStatus, EventSummary, UpdateEventRequest,
};

use crate::errors::ApiError;
use crate::services::{ensure_write_access, parse_ordering};

const DETAIL_SELECT: &str = r#"
    SELECT e.id, e.owner_id,
           TRIM(u.first_name || ' ' || u.last_name) AS owner_name,
           e.venue_id, v.name AS venue_name,
           e.title, e.slug, e.description, e.category, e.image,
           e.start_datetime, e.end_datetime,
           e.capacity, e.registered_count, e.price, e.is_free,
           e.registration_url, e.status, e.is_featured,
           e.created_at, e.updated_at
    FROM events e
    JOIN venues v ON v.id = e.venue_id
    JOIN users u ON u.id = e.owner_id
"#;

const ORDERABLE: &[(&str, &str)] = &[
    ("start_datetime", "e.start_datetime"),
    ("created_at", "e.created_at"),
    ("is_featured", "e.is_featured"),
];
const DEFAULT_ORDER: &str = "e.is_featured DESC, e.start_datetime ASC";

pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<EventDetail, ApiError> {
        self.ensure_venue_exists(request.venue).await?;
        check_date_range(request.start_datetime, request.end_datetime)?;
        self.check_slug(&request.slug, None).await?;

        let price = request.price.unwrap_or(Decimal::ZERO);
        let is_free = resolve_is_free(price, request.is_free);

        let event_id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO events (id, owner_id, venue_id, title, slug, description, category,
                                image, start_datetime, end_datetime, capacity, registered_count,
                                price, is_free, registration_url, status, is_featured,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0,
                    $12, $13, $14, $15, $16, $17, $17)
            "#,
        )
        .bind(event_id)
        .bind(owner_id)
        .bind(request.venue)
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.description)
        .bind(request.category)
        .bind(request.image.as_deref())
        .bind(request.start_datetime)
        .bind(request.end_datetime)
        .bind(request.capacity)
        .bind(price)
        .bind(is_free)
        .bind(request.registration_url.as_deref())
        .bind(request.status.unwrap_or_default())
        .bind(request.is_featured.unwrap_or(false))
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!("Created event {} ({})", request.slug, event_id);
        Ok(self.fetch_detail(event_id).await?.with_timing(Utc::now()))
    }

    /// Retrieves an event; non-published events exist only for their owner.
    pub async fn get(&self, event_id: Uuid, viewer: Option<Uuid>) -> Result<EventDetail, ApiError> {
        let event = self.fetch_detail(event_id).await?;
        if event.status != EventStatus::Published && viewer != Some(event.owner_id) {
            return Err(ApiError::NotFound("Event not found.".to_string()));
        }
        Ok(event.with_timing(Utc::now()))
    }

    pub async fn list(
        &self,
        viewer: Option<Uuid>,
        query: &EventQuery,
    ) -> Result<Vec<EventSummary>, ApiError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT e.id, e.title, e.slug, e.category, e.image, e.start_datetime,
                   v.name AS venue_name, e.is_free, e.price, e.is_featured,
                   TRIM(u.first_name || ' ' || u.last_name) AS owner_name
            FROM events e
            JOIN venues v ON v.id = e.venue_id
            JOIN users u ON u.id = e.owner_id
            WHERE (e.status = 'published'
            "#,
        );
        if let Some(viewer) = viewer {
            builder.push(" OR e.owner_id = ");
            builder.push_bind(viewer);
        }
        builder.push(")");

        if let Some(category) = query.category {
            builder.push(" AND e.category = ");
            builder.push_bind(category);
        }
        if let Some(city) = &query.venue_city {
            builder.push(" AND v.city = ");
            builder.push_bind(city);
        }
        if let Some(is_featured) = query.is_featured {
            builder.push(" AND e.is_featured = ");
            builder.push_bind(is_featured);
        }
        if let Some(is_free) = query.is_free {
            builder.push(" AND e.is_free = ");
            builder.push_bind(is_free);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            builder.push(" AND (e.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR e.description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR v.name ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY ");
        builder.push(parse_ordering(
            query.ordering.as_deref(),
            ORDERABLE,
            DEFAULT_ORDER,
        ));

        let events = builder
            .build_query_as::<EventSummary>()
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn update(
        &self,
        event_id: Uuid,
        actor: Uuid,
        request: &UpdateEventRequest,
    ) -> Result<EventDetail, ApiError> {
        let existing = self.fetch_detail(event_id).await?;
        ensure_write_access(actor, existing.owner_id)?;

        if let Some(venue_id) = request.venue {
            self.ensure_venue_exists(venue_id).await?;
        }
        if let Some(slug) = &request.slug {
            self.check_slug(slug, Some(event_id)).await?;
        }

        // The date check runs against the merged values so a partial update
        // cannot sneak an end time before the stored start.
        let start = request.start_datetime.unwrap_or(existing.start_datetime);
        let end = request.end_datetime.unwrap_or(existing.end_datetime);
        check_date_range(start, end)?;

        let price = request.price.unwrap_or(existing.price);
        let is_free = resolve_is_free(price, request.is_free.or(Some(existing.is_free)));

        sqlx::query(
            r#"
            UPDATE events
            SET venue_id = COALESCE($2, venue_id),
                title = COALESCE($3, title),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                category = COALESCE($6, category),
                image = COALESCE($7, image),
                start_datetime = $8,
                end_datetime = $9,
                capacity = COALESCE($10, capacity),
                price = $11,
                is_free = $12,
                registration_url = COALESCE($13, registration_url),
                status = COALESCE($14, status),
                is_featured = COALESCE($15, is_featured),
                updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .bind(request.venue)
        .bind(request.title.as_deref())
        .bind(request.slug.as_deref())
        .bind(request.description.as_deref())
        .bind(request.category)
        .bind(request.image.as_deref())
        .bind(start)
        .bind(end)
        .bind(request.capacity)
        .bind(price)
        .bind(is_free)
        .bind(request.registration_url.as_deref())
        .bind(request.status)
        .bind(request.is_featured)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(self.fetch_detail(event_id).await?.with_timing(Utc::now()))
    }

    pub async fn delete(&self, event_id: Uuid, actor: Uuid) -> Result<(), ApiError> {
        let existing = self.fetch_detail(event_id).await?;
        ensure_write_access(actor, existing.owner_id)?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Deleted event {}", event_id);
        Ok(())
    }

    async fn fetch_detail(&self, event_id: Uuid) -> Result<EventDetail, ApiError> {
        sqlx::query_as::<_, EventDetail>(&format!("{DETAIL_SELECT} WHERE e.id = $1"))
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Event not found.".to_string()))
    }

    async fn ensure_venue_exists(&self, venue_id: Uuid) -> Result<(), ApiError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM venues WHERE id = $1)")
            .bind(venue_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists.0 {
            return Err(ApiError::NotFound("Venue not found.".to_string()));
        }
        Ok(())
    }

    async fn check_slug(&self, slug: &str, exclude: Option<Uuid>) -> Result<(), ApiError> {
        let taken: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        if taken.0 {
            return Err(ApiError::field_validation(
                "slug",
                "An event with this slug already exists.",
            ));
        }
        Ok(())
    }
}

fn check_date_range(
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
) -> Result<(), ApiError> {
    validate_date_range(start, end).map_err(|msg| ApiError::field_validation("end_datetime", msg))
}
