use sqlx::PgPool;
use tracing::{debug, info};

use super::models::{Budget, CreateBudgetDto, UpdateBudgetDto};
use super::repository::BudgetRepository;
use crate::errors::AppError;
use crate::money::round2;

/// Service layer for budget business logic.
pub struct BudgetService;

impl BudgetService {
    pub async fn list_budgets(pool: &PgPool, owner: &str) -> Result<Vec<Budget>, AppError> {
        BudgetRepository::find_all(pool, owner).await
    }

    /// Get a budget by ID, ensuring the caller owns it.
    pub async fn get_budget_by_id(
        pool: &PgPool,
        owner: &str,
        budget_id: i64,
    ) -> Result<Budget, AppError> {
        BudgetRepository::find_by_id(pool, owner, budget_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Budget not found".to_string()))
    }

    /// Create a new, non-default budget.
    pub async fn create_budget(
        pool: &PgPool,
        owner: &str,
        dto: &CreateBudgetDto,
    ) -> Result<Budget, AppError> {
        let name = dto.name.trim();

        if BudgetRepository::find_by_name(pool, owner, name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Budget already exists".to_string()));
        }

        let budget = BudgetRepository::insert(
            pool,
            owner,
            name,
            round2(dto.amount),
            dto.period.unwrap_or_default(),
        )
        .await?;

        info!(%owner, budget_id = budget.id, "budget created");
        Ok(budget)
    }

    /// Replace a budget. Promoting it to default demotes every other budget
    /// of the owner in the same database transaction.
    pub async fn update_budget(
        pool: &PgPool,
        owner: &str,
        budget_id: i64,
        dto: &UpdateBudgetDto,
    ) -> Result<Budget, AppError> {
        let current = Self::get_budget_by_id(pool, owner, budget_id).await?;

        let name = dto.name.trim();
        if let Some(existing) = BudgetRepository::find_by_name(pool, owner, name).await? {
            if existing.id != budget_id {
                return Err(AppError::Conflict("Budget already exists".to_string()));
            }
        }

        let is_default = dto.default_budget.unwrap_or(current.is_default);
        let period = dto.period.unwrap_or_else(|| current.get_period());

        let mut tx = pool.begin().await?;

        if is_default {
            let demoted = BudgetRepository::clear_other_defaults(&mut tx, owner, budget_id).await?;
            debug!(%owner, budget_id, demoted, "cleared previous default budget");
        }

        let budget = BudgetRepository::update(
            &mut tx,
            owner,
            budget_id,
            name,
            round2(dto.amount),
            period,
            is_default,
        )
        .await?;

        tx.commit().await?;

        info!(%owner, budget_id, is_default, "budget updated");
        Ok(budget)
    }
}
