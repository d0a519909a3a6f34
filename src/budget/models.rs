use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::audit::Audit;
use crate::money::validate_amount;
use crate::validation::validate_not_blank;

/// How often a budget's amount renews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "DAILY",
            BudgetPeriod::Weekly => "WEEKLY",
            BudgetPeriod::Monthly => "MONTHLY",
            BudgetPeriod::Yearly => "YEARLY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DAILY" => Some(BudgetPeriod::Daily),
            "WEEKLY" => Some(BudgetPeriod::Weekly),
            "MONTHLY" => Some(BudgetPeriod::Monthly),
            "YEARLY" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }
}

/// Database entity for budgets
#[derive(Debug, Clone, FromRow)]
pub struct Budget {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub budget_period: String,
    pub is_default: bool,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Budget {
    pub fn get_period(&self) -> BudgetPeriod {
        BudgetPeriod::parse(&self.budget_period).unwrap_or_default()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: i64,
    #[schema(example = "Household")]
    pub name: String,
    #[schema(value_type = String, example = "1500.00")]
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub default_budget: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

impl From<Budget> for BudgetResponse {
    fn from(budget: Budget) -> Self {
        let period = budget.get_period();
        Self {
            id: budget.id,
            name: budget.name,
            amount: budget.amount,
            period,
            default_budget: budget.is_default,
            audit: budget.audit,
        }
    }
}

/// DTO for creating a new budget
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetDto {
    #[validate(
        length(max = 120, message = "Name cannot exceed 120 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    #[schema(example = "Household")]
    pub name: String,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = String, example = "1500.00")]
    pub amount: Decimal,

    /// Defaults to MONTHLY
    pub period: Option<BudgetPeriod>,
}

/// DTO for replacing a budget. `period` or `defaultBudget` left out keeps the stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetDto {
    #[validate(
        length(max = 120, message = "Name cannot exceed 120 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = String, example = "1500.00")]
    pub amount: Decimal,

    pub period: Option<BudgetPeriod>,

    pub default_budget: Option<bool>,
}

/// Path parameters for budget ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct BudgetIdPath {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    #[test]
    fn test_period_defaults_to_monthly() {
        assert_eq!(BudgetPeriod::default(), BudgetPeriod::Monthly);
        assert_eq!(BudgetPeriod::parse("WEEKLY"), Some(BudgetPeriod::Weekly));
        assert_eq!(BudgetPeriod::parse("weekly"), None);
    }

    #[test]
    fn test_create_dto_rejects_zero_amount() {
        let dto = CreateBudgetDto {
            name: "Household".to_string(),
            amount: Decimal::ZERO,
            period: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_rejects_three_fraction_digits() {
        let dto = CreateBudgetDto {
            name: "Household".to_string(),
            amount: Decimal::from_str("10.005").expect("decimal"),
            period: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_response_serializes_flat_audit() {
        let budget = Budget {
            id: 3,
            name: "Travel".to_string(),
            amount: Decimal::from_str("250.00").expect("decimal"),
            budget_period: "YEARLY".to_string(),
            is_default: true,
            audit: Audit {
                created_by: "u001".to_string(),
                created_on: Utc::now(),
                updated_by: None,
                updated_on: None,
            },
        };

        let json = serde_json::to_value(BudgetResponse::from(budget)).expect("serialize");
        assert_eq!(json["period"], "YEARLY");
        assert_eq!(json["defaultBudget"], true);
        assert_eq!(json["amount"], "250.00");
        assert_eq!(json["createdBy"], "u001");
    }
}
