use chrono::NaiveDate;
use sqlx::PgPool;

use super::models::DashboardRow;
use crate::errors::AppError;

pub struct DashboardRepository;

impl DashboardRepository {
    /// Owner's transactions between `start` and `end` inclusive, newest first
    pub async fn find_in_range(
        pool: &PgPool,
        owner: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DashboardRow>, AppError> {
        let rows = sqlx::query_as::<_, DashboardRow>(
            r#"
            SELECT t.expense_date, t.amount, t.transaction_type,
                   c.name AS category_name, c.category_type
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.created_by = $1
              AND t.expense_date >= $2
              AND t.expense_date <= $3
            ORDER BY t.expense_date DESC, t.id DESC
            "#,
        )
        .bind(owner)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
