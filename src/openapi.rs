use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::audit::Audit;
use crate::auth::models::{AuthTokenResponse, LoginDto, MeResponse, RefreshTokenDto};
use crate::budget::models::{BudgetPeriod, BudgetResponse, CreateBudgetDto, UpdateBudgetDto};
use crate::category::models::{
    CategoryDto, CategoryResponse, CategoryType, SubCategoryDto, SubCategoryResponse,
};
use crate::dashboard::models::{
    CategoryTotal, CategoryTrend, DashboardSummary, MonthlyIncomeExpensePoint,
    MonthlySavingRatePoint, MonthlyTotal, PeriodSummary,
};
use crate::errors::ErrorResponse;
use crate::transaction::models::{
    TransactionDto, TransactionPage, TransactionResponse, TransactionType,
};

/// Security scheme modifier for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expense Tracker API",
        version = "1.0.0",
        description = "Personal income, expense and saving tracking with dashboard reporting"
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Login and session management"),
        (name = "Categories", description = "Categories and sub-categories"),
        (name = "Budgets", description = "Budget management"),
        (name = "Transactions", description = "Income and expense records"),
        (name = "Dashboard", description = "Aggregated reporting")
    ),
    paths(
        crate::routes::health_check,
        // Auth endpoints
        crate::auth::handlers::login,
        crate::auth::handlers::refresh,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        // Category endpoints
        crate::category::handlers::list_categories,
        crate::category::handlers::create_category,
        crate::category::handlers::update_category,
        crate::category::handlers::list_sub_categories,
        crate::category::handlers::create_sub_category,
        crate::category::handlers::update_sub_category,
        // Budget endpoints
        crate::budget::handlers::list_budgets,
        crate::budget::handlers::get_budget,
        crate::budget::handlers::create_budget,
        crate::budget::handlers::update_budget,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Dashboard
        crate::dashboard::handlers::get_summary,
    ),
    components(
        schemas(
            ErrorResponse,
            Audit,
            // Auth schemas
            LoginDto,
            RefreshTokenDto,
            AuthTokenResponse,
            MeResponse,
            // Category schemas
            CategoryType,
            CategoryDto,
            CategoryResponse,
            SubCategoryDto,
            SubCategoryResponse,
            // Budget schemas
            BudgetPeriod,
            BudgetResponse,
            CreateBudgetDto,
            UpdateBudgetDto,
            // Transaction schemas
            TransactionType,
            TransactionDto,
            TransactionResponse,
            TransactionPage,
            // Dashboard schemas
            DashboardSummary,
            PeriodSummary,
            MonthlyTotal,
            MonthlyIncomeExpensePoint,
            MonthlySavingRatePoint,
            CategoryTotal,
            CategoryTrend,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/login",
            "/categories/{id}",
            "/sub-categories",
            "/budgets/{id}",
            "/transactions",
            "/transactions/{id}",
            "/dashboard/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
