use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use cultura_models::subscriptions::{Plan, SubscriptionDetail, UpgradeRequest};

use crate::errors::ApiError;
use crate::handlers::require_user;
use crate::services::subscriptions::SubscriptionService;

#[utoipa::path(
    get,
    path = "/api/subscriptions/plans",
    responses(
        (status = 200, description = "Active plans, cheapest first", body = [Plan])
    ),
    tag = "subscriptions"
)]
pub async fn list_plans(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let service = SubscriptionService::new(pool.get_ref().clone());
    let plans = service.list_plans().await?;
    Ok(HttpResponse::Ok().json(plans))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/plans/{id}",
    params(("id" = String, Path, description = "Plan id, e.g. `free`")),
    responses(
        (status = 200, description = "Plan detail", body = Plan),
        (status = 404, description = "Unknown plan")
    ),
    tag = "subscriptions"
)]
pub async fn get_plan(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let service = SubscriptionService::new(pool.get_ref().clone());
    let plan = service.get_plan(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/me",
    responses(
        (status = 200, description = "The caller's subscription", body = SubscriptionDetail),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No subscription yet")
    ),
    tag = "subscriptions"
)]
pub async fn my_subscription(
    req: HttpRequest,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user(&req)?;
    let service = SubscriptionService::new(pool.get_ref().clone());
    let subscription = service.get_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(subscription))
}

#[utoipa::path(
    post,
    path = "/api/subscriptions/upgrade",
    request_body = UpgradeRequest,
    responses(
        (status = 200, description = "Subscription moved to the requested plan", body = SubscriptionDetail),
        (status = 400, description = "Missing plan_id"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown plan")
    ),
    tag = "subscriptions"
)]
pub async fn upgrade(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    request: web::Json<UpgradeRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user(&req)?;
    let plan_id = request
        .plan_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("plan_id is required.".to_string()))?;

    let service = SubscriptionService::new(pool.get_ref().clone());
    let subscription = service.upgrade(user_id, plan_id).await?;
    Ok(HttpResponse::Ok().json(subscription))
}

pub fn configure_subscription_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/subscriptions")
            .route("/plans", web::get().to(list_plans))
            .route("/plans/{id}", web::get().to(get_plan))
            .route("/me", web::get().to(my_subscription))
            .route("/upgrade", web::post().to(upgrade)),
    );
}
