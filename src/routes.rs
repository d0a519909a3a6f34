use actix_web::{get, web, HttpResponse, Responder};
use sqlx::PgPool;

use crate::errors::{json_error_handler, query_error_handler};
use crate::{auth, budget, category, dashboard, transaction};

/// Health check endpoint that verifies database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database reachable"),
        (status = 503, description = "Database unreachable")
    )
)]
#[get("/health")]
pub async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

/// Extractor settings shared by every route: bad bodies and queries use the error envelope.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}

/// Credential endpoints. The server mounts these behind the rate limiter.
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login).service(auth::refresh);
}

/// Everything else
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(auth::logout)
        .service(auth::me)
        // Category endpoints
        .service(category::list_categories)
        .service(category::create_category)
        .service(category::update_category)
        .service(category::list_sub_categories)
        .service(category::create_sub_category)
        .service(category::update_sub_category)
        // Budget endpoints
        .service(budget::list_budgets)
        .service(budget::create_budget)
        .service(budget::get_budget)
        .service(budget::update_budget)
        // Transaction endpoints
        .service(transaction::list_transactions)
        .service(transaction::create_transaction)
        .service(transaction::get_transaction)
        .service(transaction::update_transaction)
        .service(transaction::delete_transaction)
        // Dashboard
        .service(dashboard::get_summary);
}
