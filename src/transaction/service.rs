use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, info};

use super::models::{
    ListTransactionsQuery, SortDir, SortField, Transaction, TransactionDto, TransactionFilter,
    TransactionPage, TransactionResponse, TransactionType, TransactionWrite,
};
use super::repository::TransactionRepository;
use crate::budget::service::BudgetService;
use crate::category::models::CategoryType;
use crate::category::repository::SubCategoryRepository;
use crate::category::service::CategoryService;
use crate::errors::AppError;
use crate::money::round2;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 200;

/// Service layer for transaction business logic. Every call is scoped to `owner`.
pub struct TransactionService;

impl TransactionService {
    pub async fn create_transaction(
        pool: &PgPool,
        owner: &str,
        dto: &TransactionDto,
    ) -> Result<TransactionResponse, AppError> {
        let transaction_type = dto.transaction_type.unwrap_or_default();
        let values = Self::resolve_write(pool, owner, dto, transaction_type).await?;

        let id = TransactionRepository::insert(pool, owner, &values).await?;

        info!(%owner, transaction_id = id, transaction_type = transaction_type.as_str(), "transaction created");
        Self::get_transaction(pool, owner, id).await
    }

    pub async fn update_transaction(
        pool: &PgPool,
        owner: &str,
        transaction_id: i64,
        dto: &TransactionDto,
    ) -> Result<TransactionResponse, AppError> {
        let current = Self::find_owned(pool, owner, transaction_id).await?;
        let transaction_type = resolve_update_type(current.get_type(), dto.transaction_type)?;
        let values = Self::resolve_write(pool, owner, dto, transaction_type).await?;

        let updated = TransactionRepository::update(pool, owner, transaction_id, &values).await?;
        if updated == 0 {
            return Err(AppError::NotFound("Transaction not found".to_string()));
        }

        info!(%owner, transaction_id, "transaction updated");
        Self::get_transaction(pool, owner, transaction_id).await
    }

    pub async fn delete_transaction(
        pool: &PgPool,
        owner: &str,
        transaction_id: i64,
    ) -> Result<(), AppError> {
        let deleted = TransactionRepository::delete(pool, owner, transaction_id).await?;

        if deleted == 0 {
            return Err(AppError::NotFound("Transaction not found".to_string()));
        }

        info!(%owner, transaction_id, "transaction deleted");
        Ok(())
    }

    pub async fn get_transaction(
        pool: &PgPool,
        owner: &str,
        transaction_id: i64,
    ) -> Result<TransactionResponse, AppError> {
        Self::find_owned(pool, owner, transaction_id)
            .await
            .map(TransactionResponse::from)
    }

    /// List transactions with filters, sorting and pagination
    pub async fn list_transactions(
        pool: &PgPool,
        owner: &str,
        query: &ListTransactionsQuery,
    ) -> Result<TransactionPage, AppError> {
        let filter = resolve_filter(query)?;
        debug!(%owner, ?filter, "listing transactions");

        let (rows, total) = TransactionRepository::list(pool, owner, &filter).await?;
        let items = rows.into_iter().map(TransactionResponse::from).collect();

        Ok(TransactionPage::new(items, filter.page, filter.size, total))
    }

    async fn find_owned(
        pool: &PgPool,
        owner: &str,
        transaction_id: i64,
    ) -> Result<Transaction, AppError> {
        TransactionRepository::find_by_id(pool, owner, transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// Check every reference in the body against the owner's data
    async fn resolve_write(
        pool: &PgPool,
        owner: &str,
        dto: &TransactionDto,
        transaction_type: TransactionType,
    ) -> Result<TransactionWrite, AppError> {
        let category = CategoryService::get_owned_category(pool, owner, dto.category_id).await?;
        let sub_category = SubCategoryRepository::find_by_id(pool, owner, dto.sub_category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sub-category not found".to_string()))?;

        check_sub_category_parent(sub_category.category_id, category.id)?;
        check_category_type(transaction_type, category.get_type())?;

        if let Some(budget_id) = dto.budget_id {
            BudgetService::get_budget_by_id(pool, owner, budget_id).await?;
        }

        Ok(TransactionWrite {
            amount: round2(dto.amount),
            description: dto.description.trim().to_string(),
            expense_date: dto.expense_date,
            transaction_type,
            category_id: category.id,
            sub_category_id: sub_category.id,
            budget_id: dto.budget_id,
        })
    }
}

fn check_sub_category_parent(parent_id: i64, category_id: i64) -> Result<(), AppError> {
    if parent_id != category_id {
        return Err(AppError::BadRequest(
            "Sub-category does not belong to selected category".to_string(),
        ));
    }
    Ok(())
}

fn check_category_type(
    transaction_type: TransactionType,
    category_type: CategoryType,
) -> Result<(), AppError> {
    if transaction_type.accepts(category_type) {
        return Ok(());
    }
    let message = match transaction_type {
        TransactionType::Income => "Category type must be INCOME for income transactions",
        TransactionType::Expense => {
            "Category type must be EXPENSE or SAVING for expense transactions"
        }
    };
    Err(AppError::BadRequest(message.to_string()))
}

/// Omitted means "keep"; anything else must equal the stored type.
fn resolve_update_type(
    stored: TransactionType,
    requested: Option<TransactionType>,
) -> Result<TransactionType, AppError> {
    match requested {
        Some(requested) if requested != stored => Err(AppError::BadRequest(
            "changing transaction type is not allowed for updates".to_string(),
        )),
        _ => Ok(stored),
    }
}

/// Validate raw listing parameters and fill in defaults
fn resolve_filter(query: &ListTransactionsQuery) -> Result<TransactionFilter, AppError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::BadRequest(
                "startDate cannot be after endDate".to_string(),
            ));
        }
    }

    let page = query.page.unwrap_or(0);
    if page < 0 {
        return Err(AppError::BadRequest("page must be 0 or greater".to_string()));
    }

    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(AppError::BadRequest(
            "size must be between 1 and 200".to_string(),
        ));
    }

    if query.min_amount.is_some_and(|v| v < Decimal::ZERO) {
        return Err(AppError::BadRequest(
            "minAmount must be 0 or greater".to_string(),
        ));
    }
    if query.max_amount.is_some_and(|v| v < Decimal::ZERO) {
        return Err(AppError::BadRequest(
            "maxAmount must be 0 or greater".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (query.min_amount, query.max_amount) {
        if min > max {
            return Err(AppError::BadRequest(
                "minAmount cannot be greater than maxAmount".to_string(),
            ));
        }
    }

    let sort_by = match query.sort_by.as_deref() {
        None => SortField::ExpenseDate,
        Some(raw) => SortField::parse(raw.trim()).ok_or_else(|| {
            AppError::BadRequest(
                "sortBy must be one of: expenseDate, amount, category, subCategory".to_string(),
            )
        })?,
    };

    let sort_dir = match query.sort_dir.as_deref() {
        None => SortDir::Desc,
        Some(raw) => SortDir::parse(raw.trim()).ok_or_else(|| {
            AppError::BadRequest("sortDir must be one of: asc, desc".to_string())
        })?,
    };

    Ok(TransactionFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        category_id: query.category_id,
        sub_category_id: query.sub_category_id,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
        transaction_type: query.transaction_type.unwrap_or_default(),
        sort_by,
        sort_dir,
        page,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn bad_request(result: Result<TransactionFilter, AppError>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_defaults() {
        let filter = resolve_filter(&ListTransactionsQuery::default()).expect("valid");
        assert_eq!(filter.transaction_type, TransactionType::Expense);
        assert_eq!(filter.sort_by, SortField::ExpenseDate);
        assert_eq!(filter.sort_dir, SortDir::Desc);
        assert_eq!(filter.page, 0);
        assert_eq!(filter.size, 10);
        assert_eq!(filter.order_by(), "t.expense_date DESC, t.id DESC");
    }

    #[test]
    fn test_filter_rejects_inverted_dates() {
        let query = ListTransactionsQuery {
            start_date: Some(date(2025, 2, 1)),
            end_date: Some(date(2025, 1, 1)),
            ..Default::default()
        };
        assert_eq!(bad_request(resolve_filter(&query)), "startDate cannot be after endDate");
    }

    #[test]
    fn test_filter_accepts_same_day_range() {
        let query = ListTransactionsQuery {
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2025, 1, 1)),
            ..Default::default()
        };
        assert!(resolve_filter(&query).is_ok());
    }

    #[test]
    fn test_filter_page_and_size_bounds() {
        let query = ListTransactionsQuery {
            page: Some(-1),
            ..Default::default()
        };
        assert_eq!(bad_request(resolve_filter(&query)), "page must be 0 or greater");

        for size in [0, 201] {
            let query = ListTransactionsQuery {
                size: Some(size),
                ..Default::default()
            };
            assert_eq!(bad_request(resolve_filter(&query)), "size must be between 1 and 200");
        }

        let query = ListTransactionsQuery {
            size: Some(200),
            ..Default::default()
        };
        assert!(resolve_filter(&query).is_ok());
    }

    #[test]
    fn test_filter_amount_bounds() {
        let query = ListTransactionsQuery {
            min_amount: Some(Decimal::from_str("-1").expect("decimal")),
            ..Default::default()
        };
        assert_eq!(bad_request(resolve_filter(&query)), "minAmount must be 0 or greater");

        let query = ListTransactionsQuery {
            max_amount: Some(Decimal::from_str("-0.01").expect("decimal")),
            ..Default::default()
        };
        assert_eq!(bad_request(resolve_filter(&query)), "maxAmount must be 0 or greater");

        let query = ListTransactionsQuery {
            min_amount: Some(Decimal::from(50)),
            max_amount: Some(Decimal::from(10)),
            ..Default::default()
        };
        assert_eq!(
            bad_request(resolve_filter(&query)),
            "minAmount cannot be greater than maxAmount"
        );
    }

    #[test]
    fn test_filter_sort_allow_list() {
        let query = ListTransactionsQuery {
            sort_by: Some("description".to_string()),
            ..Default::default()
        };
        assert!(bad_request(resolve_filter(&query)).starts_with("sortBy must be one of"));

        let query = ListTransactionsQuery {
            sort_dir: Some("sideways".to_string()),
            ..Default::default()
        };
        assert_eq!(bad_request(resolve_filter(&query)), "sortDir must be one of: asc, desc");

        let query = ListTransactionsQuery {
            sort_by: Some("amount".to_string()),
            sort_dir: Some("ASC".to_string()),
            ..Default::default()
        };
        let filter = resolve_filter(&query).expect("valid");
        assert_eq!(filter.order_by(), "t.amount ASC, t.expense_date DESC, t.id DESC");
    }

    #[test]
    fn test_sub_category_parent_mismatch() {
        assert!(check_sub_category_parent(4, 4).is_ok());
        match check_sub_category_parent(4, 5) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Sub-category does not belong to selected category")
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_category_type_rules() {
        assert!(check_category_type(TransactionType::Expense, CategoryType::Saving).is_ok());
        assert!(check_category_type(TransactionType::Income, CategoryType::Income).is_ok());

        match check_category_type(TransactionType::Income, CategoryType::Saving) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Category type must be INCOME for income transactions")
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
        match check_category_type(TransactionType::Expense, CategoryType::Income) {
            Err(AppError::BadRequest(msg)) => assert_eq!(
                msg,
                "Category type must be EXPENSE or SAVING for expense transactions"
            ),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_update_type_cannot_change() {
        assert_eq!(
            resolve_update_type(TransactionType::Income, None).expect("kept"),
            TransactionType::Income
        );
        assert_eq!(
            resolve_update_type(TransactionType::Expense, Some(TransactionType::Expense))
                .expect("same"),
            TransactionType::Expense
        );
        match resolve_update_type(TransactionType::Expense, Some(TransactionType::Income)) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "changing transaction type is not allowed for updates")
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
