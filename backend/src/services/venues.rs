use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use cultura_models::venues::{
    CreateVenueRequest, UpdateVenueRequest, VenueDetail, VenueQuery, VenueStatus, VenueSummary,
};

use crate::errors::ApiError;
use crate::services::{ensure_write_access, parse_ordering};

/// Columns of the joined detail shape. `owner_name` mirrors the profile's
/// display name (first + last, trimmed).
const DETAIL_SELECT: &str = r#"
    SELECT v.id, v.owner_id,
           TRIM(u.first_name || ' ' || u.last_name) AS owner_name,
           v.name, v.slug, v.description, v.category,
           v.address, v.city, v.state, v.postal_code,
           v.latitude, v.longitude,
           v.phone, v.email, v.website, v.image,
           v.status, v.is_featured, v.created_at, v.updated_at
    FROM venues v
    JOIN users u ON u.id = v.owner_id
"#;

const ORDERABLE: &[(&str, &str)] = &[
    ("created_at", "v.created_at"),
    ("name", "v.name"),
    ("is_featured", "v.is_featured"),
];
const DEFAULT_ORDER: &str = "v.is_featured DESC, v.created_at DESC";

pub struct VenueService {
    pool: PgPool,
}

impl VenueService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a venue owned by `owner_id` (always the authenticated
    /// principal; any owner in the payload is ignored upstream).
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: &CreateVenueRequest,
    ) -> Result<VenueDetail, ApiError> {
        self.check_slug(&request.slug, None).await?;

        let venue_id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO venues (id, owner_id, name, slug, description, category,
                                address, city, state, postal_code, latitude, longitude,
                                phone, email, website, image, status, is_featured,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18, $19, $19)
            "#,
        )
        .bind(venue_id)
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.slug)
        .bind(&request.description)
        .bind(request.category)
        .bind(&request.address)
        .bind(request.city.as_deref().unwrap_or("Guanajuato"))
        .bind(request.state.as_deref().unwrap_or("Guanajuato"))
        .bind(request.postal_code.as_deref())
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.phone.as_deref())
        .bind(request.email.as_deref())
        .bind(request.website.as_deref())
        .bind(request.image.as_deref())
        .bind(request.status.unwrap_or_default())
        .bind(request.is_featured.unwrap_or(false))
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!("Created venue {} ({})", request.slug, venue_id);
        self.fetch_detail(venue_id).await
    }

    /// Retrieves a venue, applying the visibility rule: non-published venues
    /// exist only for their owner.
    pub async fn get(&self, venue_id: Uuid, viewer: Option<Uuid>) -> Result<VenueDetail, ApiError> {
        let venue = self.fetch_detail(venue_id).await?;
        if venue.status != VenueStatus::Published && viewer != Some(venue.owner_id) {
            return Err(ApiError::NotFound("Venue not found.".to_string()));
        }
        Ok(venue)
    }

    pub async fn list(
        &self,
        viewer: Option<Uuid>,
        query: &VenueQuery,
    ) -> Result<Vec<VenueSummary>, ApiError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT v.id, v.name, v.slug, v.category, v.city, v.image, v.is_featured,
                   TRIM(u.first_name || ' ' || u.last_name) AS owner_name
            FROM venues v
            JOIN users u ON u.id = v.owner_id
            WHERE (v.status = 'published'
            "#,
        );
        if let Some(viewer) = viewer {
            builder.push(" OR v.owner_id = ");
            builder.push_bind(viewer);
        }
        builder.push(")");

        if let Some(category) = query.category {
            builder.push(" AND v.category = ");
            builder.push_bind(category);
        }
        if let Some(city) = &query.city {
            builder.push(" AND v.city = ");
            builder.push_bind(city);
        }
        if let Some(is_featured) = query.is_featured {
            builder.push(" AND v.is_featured = ");
            builder.push_bind(is_featured);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            builder.push(" AND (v.name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR v.description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR v.address ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY ");
        builder.push(parse_ordering(
            query.ordering.as_deref(),
            ORDERABLE,
            DEFAULT_ORDER,
        ));

        let venues = builder
            .build_query_as::<VenueSummary>()
            .fetch_all(&self.pool)
            .await?;
        Ok(venues)
    }

    pub async fn update(
        &self,
        venue_id: Uuid,
        actor: Uuid,
        request: &UpdateVenueRequest,
    ) -> Result<VenueDetail, ApiError> {
        let existing = self.fetch_detail(venue_id).await?;
        ensure_write_access(actor, existing.owner_id)?;

        if let Some(slug) = &request.slug {
            self.check_slug(slug, Some(venue_id)).await?;
        }

        sqlx::query(
            r#"
            UPDATE venues
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                state = COALESCE($8, state),
                postal_code = COALESCE($9, postal_code),
                latitude = COALESCE($10, latitude),
                longitude = COALESCE($11, longitude),
                phone = COALESCE($12, phone),
                email = COALESCE($13, email),
                website = COALESCE($14, website),
                image = COALESCE($15, image),
                status = COALESCE($16, status),
                is_featured = COALESCE($17, is_featured),
                updated_at = $18
            WHERE id = $1
            "#,
        )
        .bind(venue_id)
        .bind(request.name.as_deref())
        .bind(request.slug.as_deref())
        .bind(request.description.as_deref())
        .bind(request.category)
        .bind(request.address.as_deref())
        .bind(request.city.as_deref())
        .bind(request.state.as_deref())
        .bind(request.postal_code.as_deref())
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.phone.as_deref())
        .bind(request.email.as_deref())
        .bind(request.website.as_deref())
        .bind(request.image.as_deref())
        .bind(request.status)
        .bind(request.is_featured)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.fetch_detail(venue_id).await
    }

    /// Deletes a venue. Fails while events still reference it (the FK is
    /// RESTRICT), which we surface as a validation-style 400.
    pub async fn delete(&self, venue_id: Uuid, actor: Uuid) -> Result<(), ApiError> {
        let existing = self.fetch_detail(venue_id).await?;
        ensure_write_access(actor, existing.owner_id)?;

        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(venue_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::info!("Deleted venue {}", venue_id);
                Ok(())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(ApiError::BadRequest(
                    "Venue still has events and cannot be deleted.".to_string(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_detail(&self, venue_id: Uuid) -> Result<VenueDetail, ApiError> {
        sqlx::query_as::<_, VenueDetail>(&format!("{DETAIL_SELECT} WHERE v.id = $1"))
            .bind(venue_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Venue not found.".to_string()))
    }

    /// Application-level slug pre-check; the unique index stays the real
    /// guarantee under concurrent creates.
    async fn check_slug(&self, slug: &str, exclude: Option<Uuid>) -> Result<(), ApiError> {
        let taken: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM venues WHERE slug = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        if taken.0 {
            return Err(ApiError::field_validation(
                "slug",
                "A venue with this slug already exists.",
            ));
        }
        Ok(())
    }
}
