use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::audit::Audit;
use crate::category::models::CategoryType;
use crate::money::validate_amount;
use crate::validation::validate_not_blank;

/// Transaction type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money spent, including money moved into SAVING categories
    #[default]
    Expense,
    /// Money received
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EXPENSE" => Some(TransactionType::Expense),
            "INCOME" => Some(TransactionType::Income),
            _ => None,
        }
    }

    /// INCOME needs an INCOME category; EXPENSE takes EXPENSE or SAVING.
    pub fn accepts(&self, category_type: CategoryType) -> bool {
        match self {
            TransactionType::Income => category_type == CategoryType::Income,
            TransactionType::Expense => {
                matches!(category_type, CategoryType::Expense | CategoryType::Saving)
            }
        }
    }
}

/// Transaction row joined with its category and sub-category names
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    pub expense_date: NaiveDate,
    pub transaction_type: String,
    pub category_id: i64,
    pub category_name: String,
    pub sub_category_id: i64,
    pub sub_category_name: String,
    pub budget_id: Option<i64>,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Transaction {
    pub fn get_type(&self) -> TransactionType {
        TransactionType::parse(&self.transaction_type).unwrap_or_default()
    }
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    /// Always positive, two fraction digits
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
    #[schema(example = "Weekly groceries")]
    pub description: String,
    pub expense_date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: i64,
    #[schema(example = "Food")]
    pub category_name: String,
    pub sub_category_id: i64,
    #[schema(example = "Groceries")]
    pub sub_category_name: String,
    pub budget_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        let transaction_type = t.get_type();
        Self {
            id: t.id,
            amount: t.amount,
            description: t.description,
            expense_date: t.expense_date,
            transaction_type,
            category_id: t.category_id,
            category_name: t.category_name,
            sub_category_id: t.sub_category_id,
            sub_category_name: t.sub_category_name,
            budget_id: t.budget_id,
            audit: t.audit,
        }
    }
}

/// Request body for creating or updating a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,

    #[validate(
        length(max = 300, message = "Description cannot exceed 300 characters"),
        custom(function = "validate_not_blank", message = "Description is required")
    )]
    #[schema(example = "Weekly groceries")]
    pub description: String,

    pub expense_date: NaiveDate,

    /// EXPENSE when omitted on create; the stored type when omitted on update
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,

    pub category_id: i64,

    pub sub_category_id: i64,

    pub budget_id: Option<i64>,
}

/// Validated column values written by insert and update
#[derive(Debug, Clone)]
pub struct TransactionWrite {
    pub amount: Decimal,
    pub description: String,
    pub expense_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub budget_id: Option<i64>,
}

/// Raw query parameters for listing transactions
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTransactionsQuery {
    /// Inclusive lower bound on expenseDate
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on expenseDate
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    #[param(value_type = Option<String>)]
    pub min_amount: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_amount: Option<Decimal>,
    /// Defaults to EXPENSE
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// expenseDate (alias date), amount, category or subCategory
    #[param(example = "expenseDate")]
    pub sort_by: Option<String>,
    /// asc or desc
    #[param(example = "desc")]
    pub sort_dir: Option<String>,
    /// Zero-based page number
    #[param(example = 0)]
    pub page: Option<i64>,
    /// Page size (1-200)
    #[param(example = 10)]
    pub size: Option<i64>,
}

/// Primary sort key for transaction listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ExpenseDate,
    Amount,
    Category,
    SubCategory,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "expensedate" | "date" => Some(SortField::ExpenseDate),
            "amount" => Some(SortField::Amount),
            "category" => Some(SortField::Category),
            "subcategory" => Some(SortField::SubCategory),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SortField::ExpenseDate => "t.expense_date",
            SortField::Amount => "t.amount",
            SortField::Category => "LOWER(c.name)",
            SortField::SubCategory => "LOWER(s.name)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Listing criteria after validation and defaulting
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub transaction_type: TransactionType,
    pub sort_by: SortField,
    pub sort_dir: SortDir,
    pub page: i64,
    pub size: i64,
}

impl TransactionFilter {
    /// ORDER BY body: requested key, then newest date, then newest id
    pub fn order_by(&self) -> String {
        match self.sort_by {
            SortField::ExpenseDate => {
                format!("t.expense_date {}, t.id DESC", self.sort_dir.keyword())
            }
            other => format!(
                "{} {}, t.expense_date DESC, t.id DESC",
                other.column(),
                self.sort_dir.keyword()
            ),
        }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of transactions
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<TransactionResponse>,
    #[schema(example = 0)]
    pub page: i64,
    #[schema(example = 10)]
    pub size: i64,
    #[schema(example = 42)]
    pub total_elements: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl TransactionPage {
    pub fn new(items: Vec<TransactionResponse>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if size > 0 {
            (total_elements + size - 1) / size
        } else {
            0
        };
        Self {
            items,
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    pub id: i64,
}
