use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Transaction projection the dashboard aggregates over
#[derive(Debug, Clone, FromRow)]
pub struct DashboardRow {
    pub expense_date: NaiveDate,
    pub amount: Decimal,
    pub transaction_type: String,
    pub category_name: String,
    pub category_type: String,
}

/// Query parameters for the dashboard summary
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// How many categories to rank in the yearly trends (1-10, default 5)
    #[serde(rename = "topN")]
    #[param(example = 5)]
    pub top_n: Option<i64>,
}

/// Expense, income and net over one literal date range
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    #[schema(value_type = String, example = "1200.00")]
    pub expense_total: Decimal,
    #[schema(value_type = String, example = "3000.00")]
    pub income_total: Decimal,
    /// income - expense
    #[schema(value_type = String, example = "1800.00")]
    pub net_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    #[schema(example = "2025-01")]
    pub year_month: String,
    /// Every transaction type summed
    #[schema(value_type = String, example = "1200.00")]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncomeExpensePoint {
    #[schema(example = "2025-01")]
    pub year_month: String,
    #[schema(value_type = String)]
    pub income_total: Decimal,
    #[schema(value_type = String)]
    pub expense_total: Decimal,
    #[schema(value_type = String)]
    pub net_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySavingRatePoint {
    #[schema(example = "2025-01")]
    pub year_month: String,
    /// Amounts booked against SAVING categories
    #[schema(value_type = String, example = "200.00")]
    pub saving_amount: Decimal,
    #[schema(value_type = String, example = "1000.00")]
    pub income_total: Decimal,
    /// saving / income * 100, zero without income
    #[schema(value_type = String, example = "20.00")]
    pub saving_rate_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    #[schema(example = "Food")]
    pub category_name: String,
    #[schema(value_type = String, example = "430.50")]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    #[schema(example = "Food")]
    pub category_name: String,
    #[schema(value_type = String, example = "5120.00")]
    pub year_total: Decimal,
    /// One point per month of the window, oldest first
    pub monthly_trend: Vec<MonthlyTotal>,
}

/// Full dashboard payload for a 12-month window ending with the current month
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(value_type = String)]
    pub current_month_total: Decimal,
    #[schema(value_type = String)]
    pub last_30_days_total: Decimal,
    #[schema(value_type = String)]
    pub last_month_total: Decimal,
    #[schema(value_type = String)]
    pub last_quarter_total: Decimal,
    #[schema(value_type = String)]
    pub last_year_total: Decimal,

    pub current_month_summary: PeriodSummary,
    pub same_period_last_month_summary: PeriodSummary,
    pub last_30_days_summary: PeriodSummary,
    pub last_month_summary: PeriodSummary,
    pub last_quarter_summary: PeriodSummary,
    pub last_year_summary: PeriodSummary,

    pub monthly_totals: Vec<MonthlyTotal>,
    pub monthly_income_expense_points: Vec<MonthlyIncomeExpensePoint>,
    pub monthly_saving_rate_points: Vec<MonthlySavingRatePoint>,

    pub current_month_category_totals: Vec<CategoryTotal>,
    pub top_yearly_category_trends: Vec<CategoryTrend>,
}
