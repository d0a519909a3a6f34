use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{BudgetIdPath, BudgetResponse, CreateBudgetDto, UpdateBudgetDto};
use super::service::BudgetService;

/// GET /budgets - List the caller's budgets, default first
#[utoipa::path(
    get,
    path = "/budgets",
    tag = "Budgets",
    responses(
        (status = 200, description = "List of budgets", body = Vec<BudgetResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budgets")]
pub async fn list_budgets(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let budgets = BudgetService::list_budgets(pool.get_ref(), auth.owner()).await?;

    let response: Vec<BudgetResponse> = budgets.into_iter().map(BudgetResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /budgets/{id} - Get a specific budget by ID
#[utoipa::path(
    get,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    responses(
        (status = 200, description = "Budget details", body = BudgetResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budgets/{id}")]
pub async fn get_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
) -> Result<HttpResponse, AppError> {
    let budget = BudgetService::get_budget_by_id(pool.get_ref(), auth.owner(), path.id).await?;

    Ok(HttpResponse::Ok().json(BudgetResponse::from(budget)))
}

/// POST /budgets - Create a new budget
#[utoipa::path(
    post,
    path = "/budgets",
    tag = "Budgets",
    request_body = CreateBudgetDto,
    responses(
        (status = 201, description = "Budget created", body = BudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Budget already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/budgets")]
pub async fn create_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateBudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let budget = BudgetService::create_budget(pool.get_ref(), auth.owner(), &body).await?;

    Ok(HttpResponse::Created().json(BudgetResponse::from(budget)))
}

/// PUT /budgets/{id} - Replace a budget, optionally making it the default
#[utoipa::path(
    put,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    request_body = UpdateBudgetDto,
    responses(
        (status = 200, description = "Budget updated", body = BudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 409, description = "Budget already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/budgets/{id}")]
pub async fn update_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
    body: web::Json<UpdateBudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let budget =
        BudgetService::update_budget(pool.get_ref(), auth.owner(), path.id, &body).await?;

    Ok(HttpResponse::Ok().json(BudgetResponse::from(budget)))
}
