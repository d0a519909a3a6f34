use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// User Models
// ============================================================================

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_on: DateTime<Utc>,
}

/// Request body for login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "username and password are required"))]
    #[schema(example = "u001")]
    pub username: String,
    #[validate(length(min = 1, message = "username and password are required"))]
    #[schema(example = "pass111")]
    pub password: String,
}

/// Identity of the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    #[schema(example = "u001")]
    pub username: String,
}

// ============================================================================
// Token Models
// ============================================================================

/// JWT access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // Username (owner identity)
    pub iat: usize,
    pub exp: usize,
}

/// Refresh token stored in database
#[derive(Debug, FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub username: String,
}

/// Request body to refresh access token
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenDto {
    #[schema(example = "a1b2c3d4e5f6...")]
    pub refresh_token: String,
}

/// Response containing both access and refresh tokens
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Refresh token for obtaining new access tokens
    #[schema(example = "a1b2c3d4e5f6...")]
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: &'static str,
    /// Access token expiry time in seconds
    #[schema(example = 3600)]
    pub expires_in: u64,
    #[schema(example = "u001")]
    pub username: String,
}

impl AuthTokenResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expiry_minutes: i64,
        user: &User,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: (expiry_minutes.max(0) as u64) * 60,
            username: user.username.clone(),
        }
    }
}
