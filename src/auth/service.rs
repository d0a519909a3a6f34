use secrecy::Secret;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;

use super::jwt::{create_access_token, create_refresh_token};
use super::models::{AuthTokenResponse, User};
use super::password::{hash_password, verify_against_dummy, verify_password};

/// Authentication service: credential checks and bootstrap users.
pub struct AuthService;

impl AuthService {
    /// Exchange credentials for an access/refresh token pair
    pub async fn login(
        pool: &PgPool,
        jwt_secret: &Secret<String>,
        expiry_minutes: i64,
        username: &str,
        password: &str,
    ) -> Result<AuthTokenResponse, AppError> {
        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let Some(user) = Self::find_by_username(pool, username.trim()).await? else {
            verify_against_dummy(password);
            warn!(username = %username.trim(), "login rejected: unknown user");
            return Err(invalid());
        };

        if !verify_password(password, &user.password_hash)? || !user.active {
            warn!(username = %user.username, "login rejected");
            return Err(invalid());
        }

        let access_token = create_access_token(&user.username, jwt_secret, expiry_minutes)?;
        let refresh_token = create_refresh_token(pool, &user.username).await?;

        info!(username = %user.username, "login succeeded");
        Ok(AuthTokenResponse::new(
            access_token,
            refresh_token,
            expiry_minutes,
            &user,
        ))
    }

    /// Case-insensitive username lookup
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, active, created_on
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Load an active user, failing as unauthenticated otherwise
    pub async fn get_active_user(pool: &PgPool, username: &str) -> Result<User, AppError> {
        Self::find_by_username(pool, username)
            .await?
            .filter(|user| user.active)
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    /// Create the user when missing. Returns true when a row was inserted.
    pub async fn ensure_user(pool: &PgPool, username: &str, password: &str) -> Result<bool, AppError> {
        if Self::find_by_username(pool, username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(password)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, active)
            VALUES ($1, $2, TRUE)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .execute(pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            info!(%username, "seeded user");
        }
        Ok(inserted > 0)
    }

    /// Seed every configured bootstrap user
    pub async fn seed_users(pool: &PgPool, users: &[(String, String)]) -> Result<(), AppError> {
        for (username, password) in users {
            Self::ensure_user(pool, username, password).await?;
        }
        Ok(())
    }
}
