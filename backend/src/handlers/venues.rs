use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use cultura_models::venues::{
    CreateVenueRequest, UpdateVenueRequest, VenueDetail, VenueQuery, VenueSummary,
};

use crate::errors::ApiError;
use crate::handlers::{optional_user, require_user};
use crate::services::venues::VenueService;

#[utoipa::path(
    get,
    path = "/api/venues",
    params(VenueQuery),
    responses(
        (status = 200, description = "Published venues, plus the caller's own", body = [VenueSummary])
    ),
    tag = "venues"
)]
pub async fn list_venues(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<VenueQuery>,
) -> Result<HttpResponse, ApiError> {
    let service = VenueService::new(pool.get_ref().clone());
    let venues = service.list(optional_user(&req), &query).await?;
    Ok(HttpResponse::Ok().json(venues))
}

#[utoipa::path(
    get,
    path = "/api/venues/{id}",
    params(("id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue detail", body = VenueDetail),
        (status = 404, description = "Unknown or not visible to the caller")
    ),
    tag = "venues"
)]
pub async fn get_venue(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let service = VenueService::new(pool.get_ref().clone());
    let venue = service.get(path.into_inner(), optional_user(&req)).await?;
    Ok(HttpResponse::Ok().json(venue))
}

#[utoipa::path(
    post,
    path = "/api/venues",
    request_body = CreateVenueRequest,
    responses(
        (status = 201, description = "Venue created", body = VenueDetail),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "venues"
)]
pub async fn create_venue(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    request: web::Json<CreateVenueRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = require_user(&req)?;
    request.validate()?;
    let service = VenueService::new(pool.get_ref().clone());
    let venue = service.create(owner, &request).await?;
    Ok(HttpResponse::Created().json(venue))
}

#[utoipa::path(
    patch,
    path = "/api/venues/{id}",
    params(("id" = Uuid, Path, description = "Venue id")),
    request_body = UpdateVenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = VenueDetail),
        (status = 403, description = "Not the owner")
    ),
    tag = "venues"
)]
pub async fn update_venue(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateVenueRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_user(&req)?;
    request.validate()?;
    let service = VenueService::new(pool.get_ref().clone());
    let venue = service.update(path.into_inner(), actor, &request).await?;
    Ok(HttpResponse::Ok().json(venue))
}

#[utoipa::path(
    delete,
    path = "/api/venues/{id}",
    params(("id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 204, description = "Venue deleted"),
        (status = 400, description = "Venue still has events"),
        (status = 403, description = "Not the owner")
    ),
    tag = "venues"
)]
pub async fn delete_venue(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_user(&req)?;
    let service = VenueService::new(pool.get_ref().clone());
    service.delete(path.into_inner(), actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_venue_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/venues")
            .route("", web::get().to(list_venues))
            .route("", web::post().to(create_venue))
            .route("/{id}", web::get().to(get_venue))
            .route("/{id}", web::put().to(update_venue))
            .route("/{id}", web::patch().to(update_venue))
            .route("/{id}", web::delete().to(delete_venue)),
    );
}
