use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use cultura_models::users::{
    RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, TokenRequest, TokenResponse,
    UpdateUserRequest, UserProfile,
};

use crate::errors::ApiError;
use crate::handlers::require_user;
use crate::services::security::SecurityService;
use crate::services::users::UserService;

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Validation failed")
    ),
    tag = "users"
)]
pub async fn register(
    pool: web::Data<PgPool>,
    security: web::Data<SecurityService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    let service = UserService::new(pool.get_ref().clone());
    let user = service.create_user(&security, &request).await?;
    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/users/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "users"
)]
pub async fn obtain_token(
    pool: web::Data<PgPool>,
    security: web::Data<SecurityService>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    let service = UserService::new(pool.get_ref().clone());
    let user = service
        .authenticate(&security, &request.username, &request.password)
        .await?;
    let tokens = security.issue_token_pair(&user)?;
    Ok(HttpResponse::Ok().json(tokens))
}

#[utoipa::path(
    post,
    path = "/api/users/token/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "users"
)]
pub async fn refresh_token(
    security: web::Data<SecurityService>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    let refreshed = security.refresh_access_token(&request.refresh)?;
    Ok(HttpResponse::Ok().json(refreshed))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile of the authenticated user", body = UserProfile),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn me(req: HttpRequest, pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let user_id = require_user(&req)?;
    let service = UserService::new(pool.get_ref().clone());
    let user = service
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "User directory", body = [UserProfile])
    ),
    tag = "users"
)]
pub async fn list_users(
    pool: web::Data<PgPool>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, ApiError> {
    let service = UserService::new(pool.get_ref().clone());
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);
    let users = service.list_users(limit, offset).await?;
    let profiles: Vec<UserProfile> = users.into_iter().map(UserProfile::from).collect();
    Ok(HttpResponse::Ok().json(profiles))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 404, description = "Unknown user")
    ),
    tag = "users"
)]
pub async fn get_user(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let service = UserService::new(pool.get_ref().clone());
    let user = service
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 403, description = "Not your account")
    ),
    tag = "users"
)]
pub async fn update_user(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_user(&req)?;
    let target = path.into_inner();
    if actor != target {
        return Err(ApiError::permission_denied());
    }
    request.validate()?;
    let service = UserService::new(pool.get_ref().clone());
    let user = service.update_user(target, &request).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Not your account")
    ),
    tag = "users"
)]
pub async fn delete_user(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_user(&req)?;
    let target = path.into_inner();
    if actor != target {
        return Err(ApiError::permission_denied());
    }
    let service = UserService::new(pool.get_ref().clone());
    service.delete_user(target).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("", web::post().to(register))
            .route("", web::get().to(list_users))
            .route("/token", web::post().to(obtain_token))
            .route("/token/refresh", web::post().to(refresh_token))
            .route("/me", web::get().to(me))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::patch().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
