use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use cultura_models::events::{
    CreateEventRequest, EventDetail, EventQuery, EventSummary, UpdateEventRequest,
};

use crate::errors::ApiError;
use crate::handlers::{optional_user, require_user};
use crate::services::events::EventService;

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Published events, plus the caller's own", body = [EventSummary])
    ),
    tag = "events"
)]
pub async fn list_events(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<EventQuery>,
) -> Result<HttpResponse, ApiError> {
    let service = EventService::new(pool.get_ref().clone());
    let events = service.list(optional_user(&req), &query).await?;
    Ok(HttpResponse::Ok().json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event detail with timing flags", body = EventDetail),
        (status = 404, description = "Unknown or not visible to the caller")
    ),
    tag = "events"
)]
pub async fn get_event(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let service = EventService::new(pool.get_ref().clone());
    let event = service.get(path.into_inner(), optional_user(&req)).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDetail),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown venue")
    ),
    tag = "events"
)]
pub async fn create_event(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, ApiError> {
    let owner = require_user(&req)?;
    request.validate()?;
    let service = EventService::new(pool.get_ref().clone());
    let event = service.create(owner, &request).await?;
    Ok(HttpResponse::Created().json(event))
}

#[utoipa::path(
    patch,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventDetail),
        (status = 403, description = "Not the owner")
    ),
    tag = "events"
)]
pub async fn update_event(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_user(&req)?;
    request.validate()?;
    let service = EventService::new(pool.get_ref().clone());
    let event = service.update(path.into_inner(), actor, &request).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Not the owner")
    ),
    tag = "events"
)]
pub async fn delete_event(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_user(&req)?;
    let service = EventService::new(pool.get_ref().clone());
    service.delete(path.into_inner(), actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_event_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/events")
            .route("", web::get().to(list_events))
            .route("", web::post().to(create_event))
            .route("/{id}", web::get().to(get_event))
            .route("/{id}", web::put().to(update_event))
            .route("/{id}", web::patch().to(update_event))
            .route("/{id}", web::delete().to(delete_event)),
    );
}
