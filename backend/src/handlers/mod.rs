pub mod events;
pub mod subscriptions;
pub mod users;
pub mod venues;

use actix_web::HttpRequest;
use uuid::Uuid;

use cultura_middleware::extract_user_id_from_request;

use crate::errors::ApiError;

/// Identity of the caller, if any. Anonymous requests pass the middleware
/// untouched, so handlers that allow both decide here.
pub fn optional_user(req: &HttpRequest) -> Option<Uuid> {
    extract_user_id_from_request(req)
}

/// Identity of the caller, or a 401 for anonymous requests.
pub fn require_user(req: &HttpRequest) -> Result<Uuid, ApiError> {
    optional_user(req).ok_or_else(ApiError::unauthenticated)
}
