use actix_web::{get, web, HttpResponse};
use chrono::Local;
use sqlx::PgPool;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{DashboardSummary, SummaryQuery};
use super::service::DashboardService;

/// GET /dashboard/summary - Monthly series, period rollups and category rankings
#[utoipa::path(
    get,
    path = "/dashboard/summary",
    tag = "Dashboard",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Dashboard summary for the last 12 months", body = DashboardSummary),
        (status = 400, description = "topN out of range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/dashboard/summary")]
pub async fn get_summary(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let today = Local::now().date_naive();

    let summary =
        DashboardService::summary(pool.get_ref(), auth.owner(), today, query.top_n).await?;

    Ok(HttpResponse::Ok().json(summary))
}
