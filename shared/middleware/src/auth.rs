use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error as ActixError, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::json;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use cultura_models::users::Claims;

/// Issuer claim stamped into every token.
pub const TOKEN_ISSUER: &str = "cultura-api";
/// Audience claim stamped into every token.
pub const TOKEN_AUDIENCE: &str = "cultura-clients";

/// Bearer-token middleware.
///
/// Requests without an `Authorization: Bearer` header pass through untouched;
/// each handler decides whether it requires an authenticated principal. A
/// present but invalid, expired or non-access token is rejected with 401 so
/// a caller never silently proceeds as anonymous with bad credentials.
pub struct AuthMiddleware<S> {
    service: Rc<S>,
    decoding_key: Arc<DecodingKey>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let decoding_key = Arc::clone(&self.decoding_key);

        Box::pin(async move {
            let bearer = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.to_string());

            if let Some(token) = bearer {
                match verify_access_token(&token, &decoding_key) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims);
                    }
                    Err(e) => {
                        tracing::warn!("Rejected bearer token: {}", e);
                        return Ok(req
                            .into_response(HttpResponse::Unauthorized().json(json!({
                                "detail": "Invalid or expired token."
                            })))
                            .map_into_right_body());
                    }
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[derive(Clone)]
pub struct AuthMiddlewareFactory {
    decoding_key: Arc<DecodingKey>,
}

impl AuthMiddlewareFactory {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Reads the signing secret from `JWT_SECRET`. Falls back to a dev-only
    /// secret with a loud warning so local setups still boot.
    pub fn from_env() -> Self {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Self::new(&secret),
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set; using an insecure development secret. \
                     Set JWT_SECRET in production."
                );
                Self::new(dev_secret())
            }
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            decoding_key: Arc::clone(&self.decoding_key),
        }))
    }
}

/// Fallback signing secret for local development.
pub fn dev_secret() -> &'static str {
    "cultura-dev-secret-do-not-use-in-production"
}

/// Decodes and validates an access token against the shared secret.
pub fn verify_access_token(
    token: &str,
    decoding_key: &DecodingKey,
) -> Result<Claims, Box<dyn std::error::Error>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_audience(&[TOKEN_AUDIENCE]);

    let token_data = decode::<Claims>(token, decoding_key, &validation)?;
    if token_data.claims.token_type != "access" {
        return Err("Not an access token".into());
    }
    Ok(token_data.claims)
}

/// Claims stashed by the middleware, if the request carried a valid token.
pub fn extract_claims_from_request(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

pub fn extract_user_id_from_request(req: &HttpRequest) -> Option<uuid::Uuid> {
    extract_claims_from_request(req)?.user_id()
}
