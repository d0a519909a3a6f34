use sqlx::PgPool;

use super::models::{Transaction, TransactionFilter, TransactionWrite};
use crate::errors::AppError;

const TRANSACTION_SELECT: &str = "SELECT t.id, t.amount, t.description, t.expense_date, \
     t.transaction_type, t.category_id, c.name AS category_name, \
     t.sub_category_id, s.name AS sub_category_name, t.budget_id, \
     t.created_by, t.created_on, t.updated_by, t.updated_on \
     FROM transactions t \
     JOIN categories c ON c.id = t.category_id \
     JOIN sub_categories s ON s.id = t.sub_category_id";

// Optional filters bind NULL to mean "unfiltered".
const FILTER_PREDICATE: &str = "t.created_by = $1 \
     AND ($2::date IS NULL OR t.expense_date >= $2) \
     AND ($3::date IS NULL OR t.expense_date <= $3) \
     AND ($4::bigint IS NULL OR t.category_id = $4) \
     AND ($5::bigint IS NULL OR t.sub_category_id = $5) \
     AND ($6::numeric IS NULL OR t.amount >= $6) \
     AND ($7::numeric IS NULL OR t.amount <= $7) \
     AND t.transaction_type = $8";

/// Owner-scoped queries over `transactions`
pub struct TransactionRepository;

impl TransactionRepository {
    pub async fn find_by_id(
        pool: &PgPool,
        owner: &str,
        id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        let sql = format!("{TRANSACTION_SELECT} WHERE t.id = $1 AND t.created_by = $2");
        let row = sqlx::query_as::<_, Transaction>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn insert(
        pool: &PgPool,
        owner: &str,
        values: &TransactionWrite,
    ) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transactions
                (amount, description, expense_date, transaction_type,
                 category_id, sub_category_id, budget_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(values.amount)
        .bind(&values.description)
        .bind(values.expense_date)
        .bind(values.transaction_type.as_str())
        .bind(values.category_id)
        .bind(values.sub_category_id)
        .bind(values.budget_id)
        .bind(owner)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// Transaction type is never rewritten.
    pub async fn update(
        pool: &PgPool,
        owner: &str,
        id: i64,
        values: &TransactionWrite,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET amount = $3, description = $4, expense_date = $5,
                category_id = $6, sub_category_id = $7, budget_id = $8,
                updated_by = $2, updated_on = NOW()
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(values.amount)
        .bind(&values.description)
        .bind(values.expense_date)
        .bind(values.category_id)
        .bind(values.sub_category_id)
        .bind(values.budget_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, owner: &str, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// One page of matches plus the total match count
    pub async fn list(
        pool: &PgPool,
        owner: &str,
        filter: &TransactionFilter,
    ) -> Result<(Vec<Transaction>, i64), AppError> {
        let sql = format!(
            "{TRANSACTION_SELECT} WHERE {FILTER_PREDICATE} ORDER BY {} LIMIT $9 OFFSET $10",
            filter.order_by()
        );
        let rows = sqlx::query_as::<_, Transaction>(&sql)
            .bind(owner)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.category_id)
            .bind(filter.sub_category_id)
            .bind(filter.min_amount)
            .bind(filter.max_amount)
            .bind(filter.transaction_type.as_str())
            .bind(filter.size)
            .bind(filter.offset())
            .fetch_all(pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM transactions t WHERE {FILTER_PREDICATE}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(owner)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.category_id)
            .bind(filter.sub_category_id)
            .bind(filter.min_amount)
            .bind(filter.max_amount)
            .bind(filter.transaction_type.as_str())
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }
}
