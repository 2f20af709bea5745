use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use cultura_models::users::{RegisterRequest, UpdateUserRequest, User};

use crate::errors::ApiError;
use crate::services::security::SecurityService;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                            user_type, bio, avatar, created_at, updated_at";

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new account. The password confirmation and uniqueness
    /// checks surface as field-keyed validation errors; the unique indexes
    /// on username/email remain the actual guarantee under concurrency.
    pub async fn create_user(
        &self,
        security: &SecurityService,
        request: &RegisterRequest,
    ) -> Result<User, ApiError> {
        if request.password != request.password_confirm {
            return Err(ApiError::field_validation(
                "password",
                "Passwords do not match.",
            ));
        }

        if self.username_taken(&request.username).await? {
            return Err(ApiError::field_validation(
                "username",
                "A user with that username already exists.",
            ));
        }
        if self.email_taken(&request.email).await? {
            return Err(ApiError::field_validation(
                "email",
                "A user with that email already exists.",
            ));
        }

        let password_hash = security.hash_password(&request.password)?;
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name,
                               user_type, bio, avatar, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, '', NULL, $8, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&request.username)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(request.first_name.as_deref().unwrap_or(""))
        .bind(request.last_name.as_deref().unwrap_or(""))
        .bind(request.user_type.unwrap_or_default())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Looks the account up by username and checks the password. Both
    /// failure modes collapse into the same unauthorized error.
    pub async fn authenticate(
        &self,
        security: &SecurityService,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let invalid = || {
            ApiError::Unauthorized(
                "No active account found with the given credentials.".to_string(),
            )
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(invalid)?;

        if !security.verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }
        Ok(user)
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: &UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                bio = COALESCE($4, bio),
                avatar = COALESCE($5, avatar),
                user_type = COALESCE($6, user_type),
                updated_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(request.first_name.as_deref())
        .bind(request.last_name.as_deref())
        .bind(request.bio.as_deref())
        .bind(request.avatar.as_deref())
        .bind(request.user_type)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

        Ok(user)
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User not found.".to_string()));
        }
        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }

    async fn username_taken(&self, username: &str) -> Result<bool, ApiError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn email_taken(&self, email: &str) -> Result<bool, ApiError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }
}
