use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{Budget, BudgetPeriod};
use crate::errors::AppError;

const BUDGET_COLUMNS: &str =
    "id, name, amount, budget_period, is_default, created_by, created_on, updated_by, updated_on";

/// Owner-scoped queries over `budgets`
pub struct BudgetRepository;

impl BudgetRepository {
    /// Default budget first, then by name
    pub async fn find_all(pool: &PgPool, owner: &str) -> Result<Vec<Budget>, AppError> {
        let sql = format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets WHERE created_by = $1 \
             ORDER BY is_default DESC, LOWER(name) ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, Budget>(&sql)
            .bind(owner)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner: &str,
        id: i64,
    ) -> Result<Option<Budget>, AppError> {
        let sql = format!("SELECT {BUDGET_COLUMNS} FROM budgets WHERE id = $1 AND created_by = $2");
        let row = sqlx::query_as::<_, Budget>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_name(
        pool: &PgPool,
        owner: &str,
        name: &str,
    ) -> Result<Option<Budget>, AppError> {
        let sql = format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets \
             WHERE LOWER(name) = LOWER($1) AND created_by = $2 LIMIT 1"
        );
        let row = sqlx::query_as::<_, Budget>(&sql)
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
        amount: Decimal,
        period: BudgetPeriod,
    ) -> Result<Budget, AppError> {
        let sql = format!(
            "INSERT INTO budgets (name, amount, budget_period, is_default, created_by) \
             VALUES ($1, $2, $3, FALSE, $4) RETURNING {BUDGET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Budget>(&sql)
            .bind(name)
            .bind(amount)
            .bind(period.as_str())
            .bind(owner)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Drop the default flag from every other budget of the owner
    pub async fn clear_other_defaults(
        tx: &mut Transaction<'_, Postgres>,
        owner: &str,
        keep_id: i64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE budgets
            SET is_default = FALSE, updated_by = $1, updated_on = NOW()
            WHERE created_by = $1 AND id <> $2 AND is_default
            "#,
        )
        .bind(owner)
        .bind(keep_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        owner: &str,
        id: i64,
        name: &str,
        amount: Decimal,
        period: BudgetPeriod,
        is_default: bool,
    ) -> Result<Budget, AppError> {
        let sql = format!(
            "UPDATE budgets \
             SET name = $3, amount = $4, budget_period = $5, is_default = $6, \
                 updated_by = $2, updated_on = NOW() \
             WHERE id = $1 AND created_by = $2 RETURNING {BUDGET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Budget>(&sql)
            .bind(id)
            .bind(owner)
            .bind(name)
            .bind(amount)
            .bind(period.as_str())
            .bind(is_default)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row)
    }
}
