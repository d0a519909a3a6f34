use sqlx::PgPool;
use tracing::info;

use super::models::{Category, CategoryDto, CategoryResponse, SubCategoryDto, SubCategoryResponse};
use super::repository::{CategoryRepository, SubCategoryRepository};
use crate::errors::AppError;

/// Service layer for categories and sub-categories. Every call is scoped to `owner`.
pub struct CategoryService;

impl CategoryService {
    /// Owner's categories by name, each with its sub-categories attached
    pub async fn list_categories(
        pool: &PgPool,
        owner: &str,
    ) -> Result<Vec<CategoryResponse>, AppError> {
        let categories = CategoryRepository::find_all(pool, owner).await?;
        let mut sub_categories = SubCategoryRepository::find_all(pool, owner).await?;

        let response = categories
            .into_iter()
            .map(|category| {
                let (mine, rest): (Vec<_>, Vec<_>) = sub_categories
                    .drain(..)
                    .partition(|s| s.category_id == category.id);
                sub_categories = rest;
                CategoryResponse::new(category, mine)
            })
            .collect();

        Ok(response)
    }

    pub async fn create_category(
        pool: &PgPool,
        owner: &str,
        dto: &CategoryDto,
    ) -> Result<CategoryResponse, AppError> {
        let name = dto.name.trim();

        if CategoryRepository::find_by_name(pool, owner, name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }

        let category = CategoryRepository::insert(
            pool,
            owner,
            name,
            dto.description.trim(),
            dto.category_type.unwrap_or_default(),
        )
        .await?;

        info!(%owner, category_id = category.id, "category created");
        Ok(CategoryResponse::new(category, Vec::new()))
    }

    pub async fn update_category(
        pool: &PgPool,
        owner: &str,
        id: i64,
        dto: &CategoryDto,
    ) -> Result<CategoryResponse, AppError> {
        Self::get_owned_category(pool, owner, id).await?;

        let name = dto.name.trim();
        if let Some(existing) = CategoryRepository::find_by_name(pool, owner, name).await? {
            if existing.id != id {
                return Err(AppError::Conflict("Category already exists".to_string()));
            }
        }

        let category = CategoryRepository::update(
            pool,
            owner,
            id,
            name,
            dto.description.trim(),
            dto.category_type.unwrap_or_default(),
        )
        .await?;

        let sub_categories = SubCategoryRepository::find_all(pool, owner)
            .await?
            .into_iter()
            .filter(|s| s.category_id == id)
            .collect();

        info!(%owner, category_id = id, "category updated");
        Ok(CategoryResponse::new(category, sub_categories))
    }

    pub async fn list_sub_categories(
        pool: &PgPool,
        owner: &str,
    ) -> Result<Vec<SubCategoryResponse>, AppError> {
        let rows = SubCategoryRepository::find_all(pool, owner).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_sub_category(
        pool: &PgPool,
        owner: &str,
        dto: &SubCategoryDto,
    ) -> Result<SubCategoryResponse, AppError> {
        let category = Self::resolve_parent(pool, owner, dto.category_id).await?;
        let name = dto.name.trim();

        if SubCategoryRepository::find_by_name(pool, owner, category.id, name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Sub-category already exists".to_string()));
        }

        let id = SubCategoryRepository::insert(pool, owner, name, category.id).await?;

        info!(%owner, sub_category_id = id, category_id = category.id, "sub-category created");
        Ok(SubCategoryResponse {
            id,
            name: name.to_string(),
            category_id: category.id,
            category_name: category.name,
        })
    }

    pub async fn update_sub_category(
        pool: &PgPool,
        owner: &str,
        id: i64,
        dto: &SubCategoryDto,
    ) -> Result<SubCategoryResponse, AppError> {
        SubCategoryRepository::find_by_id(pool, owner, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sub-category not found".to_string()))?;

        let category = Self::resolve_parent(pool, owner, dto.category_id).await?;
        let name = dto.name.trim();

        if let Some(existing) =
            SubCategoryRepository::find_by_name(pool, owner, category.id, name).await?
        {
            if existing.id != id {
                return Err(AppError::Conflict("Sub-category already exists".to_string()));
            }
        }

        SubCategoryRepository::update(pool, owner, id, name, category.id).await?;

        info!(%owner, sub_category_id = id, category_id = category.id, "sub-category updated");
        Ok(SubCategoryResponse {
            id,
            name: name.to_string(),
            category_id: category.id,
            category_name: category.name,
        })
    }

    /// Category by id, NotFound when absent or owned by someone else
    pub async fn get_owned_category(
        pool: &PgPool,
        owner: &str,
        id: i64,
    ) -> Result<Category, AppError> {
        CategoryRepository::find_by_id(pool, owner, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    async fn resolve_parent(
        pool: &PgPool,
        owner: &str,
        category_id: Option<i64>,
    ) -> Result<Category, AppError> {
        let category_id = category_id
            .ok_or_else(|| AppError::BadRequest("categoryId is required".to_string()))?;
        Self::get_owned_category(pool, owner, category_id).await
    }
}
