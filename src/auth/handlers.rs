use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::jwt::{
    create_access_token, revoke_all_user_tokens, revoke_refresh_token, rotate_refresh_token,
    validate_refresh_token,
};
use super::models::{AuthTokenResponse, LoginDto, MeResponse, RefreshTokenDto};
use super::service::AuthService;

/// POST /login - Exchange credentials for tokens
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Authenticated", body = AuthTokenResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    )
)]
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let response = AuthService::login(
        pool.get_ref(),
        &config.jwt_secret,
        config.jwt_expiry_minutes,
        &body.username,
        &body.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// POST /refresh - Rotate the refresh token and issue a new access token
#[utoipa::path(
    post,
    path = "/refresh",
    tag = "Auth",
    request_body = RefreshTokenDto,
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
#[post("/refresh")]
pub async fn refresh(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    body: web::Json<RefreshTokenDto>,
) -> Result<HttpResponse, AppError> {
    let token_record = validate_refresh_token(pool.get_ref(), &body.refresh_token).await?;
    let user = AuthService::get_active_user(pool.get_ref(), &token_record.username).await?;

    let new_refresh_token =
        rotate_refresh_token(pool.get_ref(), token_record.id, &user.username).await?;
    let access_token =
        create_access_token(&user.username, &config.jwt_secret, config.jwt_expiry_minutes)?;

    Ok(HttpResponse::Ok().json(AuthTokenResponse::new(
        access_token,
        new_refresh_token,
        config.jwt_expiry_minutes,
        &user,
    )))
}

/// POST /logout - Revoke one refresh token, or all of them when none is given
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    request_body(content = RefreshTokenDto, description = "Omit to revoke every session"),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: Option<web::Json<RefreshTokenDto>>,
) -> Result<HttpResponse, AppError> {
    match body {
        Some(refresh_body) => {
            if let Ok(record) =
                validate_refresh_token(pool.get_ref(), &refresh_body.refresh_token).await
            {
                if record.username == auth.username {
                    revoke_refresh_token(pool.get_ref(), record.id).await?;
                }
            }
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Logged out successfully"
            })))
        }
        None => {
            let count = revoke_all_user_tokens(pool.get_ref(), &auth.username).await?;
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Logged out from all devices",
                "revokedSessions": count
            })))
        }
    }
}

/// GET /me - Identity behind the bearer token
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::get_active_user(pool.get_ref(), &auth.username).await?;

    Ok(HttpResponse::Ok().json(MeResponse {
        username: user.username,
    }))
}
