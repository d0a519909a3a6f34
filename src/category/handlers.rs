use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{CategoryDto, CategoryResponse, IdPath, SubCategoryDto, SubCategoryResponse};
use super::service::CategoryService;

/// GET /categories - List the caller's categories with their sub-categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = Vec<CategoryResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/categories")]
pub async fn list_categories(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let categories = CategoryService::list_categories(pool.get_ref(), auth.owner()).await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// POST /categories - Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/categories")]
pub async fn create_category(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let category = CategoryService::create_category(pool.get_ref(), auth.owner(), &body).await?;

    Ok(HttpResponse::Created().json(category))
}

/// PUT /categories/{id} - Replace a category's name, description and type
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(IdPath),
    request_body = CategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/categories/{id}")]
pub async fn update_category(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<IdPath>,
    body: web::Json<CategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let category =
        CategoryService::update_category(pool.get_ref(), auth.owner(), path.id, &body).await?;

    Ok(HttpResponse::Ok().json(category))
}

/// GET /sub-categories - List the caller's sub-categories
#[utoipa::path(
    get,
    path = "/sub-categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Sub-categories ordered by name", body = Vec<SubCategoryResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/sub-categories")]
pub async fn list_sub_categories(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let sub_categories =
        CategoryService::list_sub_categories(pool.get_ref(), auth.owner()).await?;

    Ok(HttpResponse::Ok().json(sub_categories))
}

/// POST /sub-categories - Create a sub-category under an owned category
#[utoipa::path(
    post,
    path = "/sub-categories",
    tag = "Categories",
    request_body = SubCategoryDto,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategoryResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Sub-category already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/sub-categories")]
pub async fn create_sub_category(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<SubCategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let sub_category =
        CategoryService::create_sub_category(pool.get_ref(), auth.owner(), &body).await?;

    Ok(HttpResponse::Created().json(sub_category))
}

/// PUT /sub-categories/{id} - Rename or move a sub-category
#[utoipa::path(
    put,
    path = "/sub-categories/{id}",
    tag = "Categories",
    params(IdPath),
    request_body = SubCategoryDto,
    responses(
        (status = 200, description = "Sub-category updated", body = SubCategoryResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Sub-category or category not found", body = ErrorResponse),
        (status = 409, description = "Sub-category already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/sub-categories/{id}")]
pub async fn update_sub_category(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<IdPath>,
    body: web::Json<SubCategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let sub_category =
        CategoryService::update_sub_category(pool.get_ref(), auth.owner(), path.id, &body)
            .await?;

    Ok(HttpResponse::Ok().json(sub_category))
}
