use sqlx::PgPool;

use super::models::{Category, CategoryType, SubCategory};
use crate::errors::AppError;

const CATEGORY_COLUMNS: &str =
    "c.id, c.name, c.description, c.category_type, c.created_by, c.created_on, c.updated_by, c.updated_on";

const SUB_CATEGORY_COLUMNS: &str = "s.id, s.name, s.category_id, c.name AS category_name, \
     s.created_by, s.created_on, s.updated_by, s.updated_on";

/// Owner-scoped queries over `categories`. No business rules live here.
pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn find_all(pool: &PgPool, owner: &str) -> Result<Vec<Category>, AppError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories c \
             WHERE c.created_by = $1 ORDER BY LOWER(c.name) ASC, c.id ASC"
        );
        let rows = sqlx::query_as::<_, Category>(&sql)
            .bind(owner)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: &str,
        id: i64,
    ) -> Result<Option<Category>, AppError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories c WHERE c.id = $1 AND c.created_by = $2"
        );
        let row = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Case-insensitive name lookup within the owner's categories
    pub async fn find_by_name(
        pool: &PgPool,
        owner: &str,
        name: &str,
    ) -> Result<Option<Category>, AppError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories c \
             WHERE LOWER(c.name) = LOWER($1) AND c.created_by = $2 LIMIT 1"
        );
        let row = sqlx::query_as::<_, Category>(&sql)
            .bind(name)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn insert(
        pool: &PgPool,
        owner: &str,
        name: &str,
        description: &str,
        category_type: CategoryType,
    ) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, category_type, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, category_type, created_by, created_on, updated_by, updated_on
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category_type.as_str())
        .bind(owner)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        pool: &PgPool,
        owner: &str,
        id: i64,
        name: &str,
        description: &str,
        category_type: CategoryType,
    ) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3, description = $4, category_type = $5,
                updated_by = $2, updated_on = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING id, name, description, category_type, created_by, created_on, updated_by, updated_on
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .bind(description)
        .bind(category_type.as_str())
        .fetch_one(pool)
        .await?;
        Ok(row)
    }
}

/// Owner-scoped queries over `sub_categories`, always joined with the parent category.
pub struct SubCategoryRepository;

impl SubCategoryRepository {
    pub async fn find_all(pool: &PgPool, owner: &str) -> Result<Vec<SubCategory>, AppError> {
        let sql = format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories s \
             JOIN categories c ON c.id = s.category_id \
             WHERE s.created_by = $1 ORDER BY LOWER(s.name) ASC, s.id ASC"
        );
        let rows = sqlx::query_as::<_, SubCategory>(&sql)
            .bind(owner)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: &str,
        id: i64,
    ) -> Result<Option<SubCategory>, AppError> {
        let sql = format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories s \
             JOIN categories c ON c.id = s.category_id \
             WHERE s.id = $1 AND s.created_by = $2"
        );
        let row = sqlx::query_as::<_, SubCategory>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Case-insensitive name lookup within one category of the owner
    pub async fn find_by_name(
        pool: &PgPool,
        owner: &str,
        category_id: i64,
        name: &str,
    ) -> Result<Option<SubCategory>, AppError> {
        let sql = format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories s \
             JOIN categories c ON c.id = s.category_id \
             WHERE LOWER(s.name) = LOWER($1) AND s.category_id = $2 AND s.created_by = $3 LIMIT 1"
        );
        let row = sqlx::query_as::<_, SubCategory>(&sql)
            .bind(name)
            .bind(category_id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn insert(
        pool: &PgPool,
        owner: &str,
        name: &str,
        category_id: i64,
    ) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sub_categories (name, category_id, created_by)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(category_id)
        .bind(owner)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    pub async fn update(
        pool: &PgPool,
        owner: &str,
        id: i64,
        name: &str,
        category_id: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE sub_categories
            SET name = $3, category_id = $4, updated_by = $2, updated_on = NOW()
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
