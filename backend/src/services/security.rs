use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use cultura_middleware::{dev_secret, TOKEN_AUDIENCE, TOKEN_ISSUER};
use cultura_models::users::{Claims, RefreshTokenResponse, TokenResponse, User};

use crate::errors::ApiError;

const ACCESS_TOKEN_TTL_HOURS: i64 = 1;
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Password hashing and JWT issuance. The verifying side of the same secret
/// lives in `cultura-middleware`.
pub struct SecurityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SecurityService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_env() -> Self {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Self::new(&secret),
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set; signing tokens with an insecure development \
                     secret. Set JWT_SECRET in production."
                );
                Self::new(dev_secret())
            }
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, ApiError> {
        verify(password, password_hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))
    }

    /// Issues an access/refresh token pair whose claims embed the user's
    /// identity, matching what the middleware later reads back out.
    pub fn issue_token_pair(&self, user: &User) -> Result<TokenResponse, ApiError> {
        let now = Utc::now();
        let access_expires = now + Duration::hours(ACCESS_TOKEN_TTL_HOURS);
        let refresh_expires = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        let access = self.encode_token(user_claims(user, "access", now, access_expires))?;
        let refresh = self.encode_token(user_claims(user, "refresh", now, refresh_expires))?;

        Ok(TokenResponse {
            access,
            refresh,
            expires_at: access_expires,
        })
    }

    /// Exchanges a valid refresh token for a fresh access token. The new
    /// claims are rebuilt from the refresh token itself; no database hit.
    pub fn refresh_access_token(&self, refresh: &str) -> Result<RefreshTokenResponse, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_AUDIENCE]);

        let token_data = decode::<Claims>(refresh, &self.decoding_key, &validation)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token.".to_string()))?;
        let claims = token_data.claims;

        if claims.token_type != "refresh" {
            return Err(ApiError::Unauthorized(
                "Invalid or expired refresh token.".to_string(),
            ));
        }

        let now = Utc::now();
        let expires_at = now + Duration::hours(ACCESS_TOKEN_TTL_HOURS);
        let access = self.encode_token(Claims {
            token_type: "access".to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            ..claims
        })?;

        Ok(RefreshTokenResponse { access, expires_at })
    }

    fn encode_token(&self, claims: Claims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Token encoding failed: {}", e)))
    }
}

fn user_claims(user: &User, token_type: &str, now: DateTime<Utc>, expires: DateTime<Utc>) -> Claims {
    Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        user_type: user.user_type,
        token_type: token_type.to_string(),
        exp: expires.timestamp() as usize,
        iat: now.timestamp() as usize,
        iss: TOKEN_ISSUER.to_string(),
        aud: TOKEN_AUDIENCE.to_string(),
    }
}
