use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

use super::models::{RefreshToken, TokenClaims};

pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

// ============================================================================
// JWT Access Token Utilities
// ============================================================================

/// Create a signed access token whose subject is the username
pub fn create_access_token(
    username: &str,
    jwt_secret: &Secret<String>,
    expiry_minutes: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(expiry_minutes);

    let claims = TokenClaims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Failed to create access token: {e}")))
}

/// Decode and validate a JWT access token
pub fn decode_token(token: &str, jwt_secret: &Secret<String>) -> Result<TokenClaims, AppError> {
    let claims = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))?;

    if claims.sub.trim().is_empty() {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }
    Ok(claims)
}

// ============================================================================
// Refresh Token Utilities
// ============================================================================

/// Generate a random refresh token string (64 hex characters)
pub fn generate_refresh_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Hash a refresh token for storage
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create and store a new refresh token for a user
pub async fn create_refresh_token(pool: &PgPool, username: &str) -> Result<String, AppError> {
    let raw_token = generate_refresh_token();
    let token_hash = hash_refresh_token(&raw_token);
    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (username, token_hash, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(username)
    .bind(&token_hash)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(|e| AppError::InternalError(format!("Failed to store refresh token: {e}")))?;

    Ok(raw_token)
}

/// Look up a live (unexpired, unrevoked) refresh token
pub async fn validate_refresh_token(
    pool: &PgPool,
    raw_token: &str,
) -> Result<RefreshToken, AppError> {
    let token_hash = hash_refresh_token(raw_token);

    sqlx::query_as::<_, RefreshToken>(
        r#"
        SELECT id, username
        FROM refresh_tokens
        WHERE token_hash = $1
          AND expires_at > NOW()
          AND revoked_at IS NULL
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".to_string()))
}

pub async fn revoke_refresh_token(pool: &PgPool, token_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1")
        .bind(token_id)
        .execute(pool)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to revoke token: {e}")))?;

    Ok(())
}

/// Revoke all refresh tokens for a user (logout from all devices)
pub async fn revoke_all_user_tokens(pool: &PgPool, username: &str) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = NOW()
        WHERE username = $1 AND revoked_at IS NULL
        "#,
    )
    .bind(username)
    .execute(pool)
    .await
    .map_err(|e| AppError::InternalError(format!("Failed to revoke tokens: {e}")))?;

    Ok(result.rows_affected())
}

/// Rotate refresh token atomically (revoke old, create new)
pub async fn rotate_refresh_token(
    pool: &PgPool,
    old_token_id: Uuid,
    username: &str,
) -> Result<String, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1")
        .bind(old_token_id)
        .execute(&mut *tx)
        .await?;

    let raw_token = generate_refresh_token();
    let token_hash = hash_refresh_token(&raw_token);
    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (username, token_hash, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(username)
    .bind(&token_hash)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(raw_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Secret<String> {
        Secret::new(value.to_string())
    }

    #[test]
    fn test_access_token_roundtrip_subject() {
        let key = secret("test_secret_key_for_testing");
        let token = create_access_token("u001", &key, 60).expect("Should create token");

        assert_eq!(token.split('.').count(), 3, "JWT should have 3 parts");

        let claims = decode_token(&token, &key).expect("Should decode token");
        assert_eq!(claims.sub, "u001");
    }

    #[test]
    fn test_access_token_expiry_follows_config() {
        let key = secret("test_secret_key");
        let token = create_access_token("u001", &key, 30).expect("Should create token");
        let claims = decode_token(&token, &key).expect("Should decode token");

        let now = Utc::now().timestamp() as usize;
        let expected_exp = now + 30 * 60;
        assert!(claims.exp >= expected_exp - 5 && claims.exp <= expected_exp + 5);
        assert!(claims.iat >= now - 5 && claims.iat <= now + 5);
    }

    #[test]
    fn test_decode_token_wrong_secret() {
        let token = create_access_token("u001", &secret("correct_secret"), 60)
            .expect("Should create token");
        let result = decode_token(&token, &secret("wrong_secret"));

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_decode_token_rejects_blank_subject() {
        let key = secret("test_secret");
        let token = create_access_token("  ", &key, 60).expect("Should create token");

        assert!(decode_token(&token, &key).is_err());
    }

    #[test]
    fn test_decode_token_invalid_token() {
        let result = decode_token("invalid.token.here", &secret("test_secret"));
        assert!(result.is_err(), "Invalid token should fail");
    }

    #[test]
    fn test_generate_refresh_token_length() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 64, "Refresh token should be 64 hex characters");
        assert_ne!(token, generate_refresh_token(), "Tokens should be unique");
    }

    #[test]
    fn test_hash_refresh_token_deterministic() {
        assert_eq!(hash_refresh_token("token1"), hash_refresh_token("token1"));
        assert_ne!(hash_refresh_token("token1"), hash_refresh_token("token2"));
    }
}
