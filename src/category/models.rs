use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::audit::Audit;
use crate::validation::validate_not_blank;

/// What a category's transactions represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    #[default]
    Expense,
    Income,
    /// Money set aside; recorded with EXPENSE transactions
    Saving,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "EXPENSE",
            CategoryType::Income => "INCOME",
            CategoryType::Saving => "SAVING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EXPENSE" => Some(CategoryType::Expense),
            "INCOME" => Some(CategoryType::Income),
            "SAVING" => Some(CategoryType::Saving),
            _ => None,
        }
    }
}

/// Database entity for categories
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_type: String,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Category {
    pub fn get_type(&self) -> CategoryType {
        CategoryType::parse(&self.category_type).unwrap_or_default()
    }
}

/// Database entity for sub-categories, joined with the parent's name
#[derive(Debug, Clone, FromRow)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: String,
    #[sqlx(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryResponse {
    pub id: i64,
    #[schema(example = "Groceries")]
    pub name: String,
    pub category_id: i64,
    #[schema(example = "Food")]
    pub category_name: String,
}

impl From<SubCategory> for SubCategoryResponse {
    fn from(s: SubCategory) -> Self {
        Self {
            id: s.id,
            name: s.name,
            category_id: s.category_id,
            category_name: s.category_name,
        }
    }
}

/// Category with its sub-categories sorted by name
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    #[schema(example = "Food")]
    pub name: String,
    #[schema(example = "Meals and groceries")]
    pub description: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub sub_categories: Vec<SubCategoryResponse>,
}

impl CategoryResponse {
    pub fn new(category: Category, mut sub_categories: Vec<SubCategory>) -> Self {
        sub_categories.sort_by_key(|s| s.name.to_lowercase());
        let category_type = category.get_type();
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            category_type,
            sub_categories: sub_categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request body for creating or replacing a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    #[validate(
        length(max = 80, message = "Name cannot exceed 80 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    #[schema(example = "Food")]
    pub name: String,

    #[validate(
        length(max = 200, message = "Description cannot exceed 200 characters"),
        custom(function = "validate_not_blank", message = "Description is required")
    )]
    #[schema(example = "Meals and groceries")]
    pub description: String,

    /// Defaults to EXPENSE
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

/// Request body for creating or replacing a sub-category
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryDto {
    #[validate(
        length(max = 80, message = "Name cannot exceed 80 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    #[schema(example = "Groceries")]
    pub name: String,

    pub category_id: Option<i64>,
}

/// Path parameters for category or sub-category ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct IdPath {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn audit() -> Audit {
        Audit {
            created_by: "u001".to_string(),
            created_on: Utc::now(),
            updated_by: None,
            updated_on: None,
        }
    }

    fn sub(id: i64, name: &str) -> SubCategory {
        SubCategory {
            id,
            name: name.to_string(),
            category_id: 1,
            category_name: "Food".to_string(),
            audit: audit(),
        }
    }

    #[test]
    fn test_category_type_parse_roundtrip() {
        for t in [CategoryType::Expense, CategoryType::Income, CategoryType::Saving] {
            assert_eq!(CategoryType::parse(t.as_str()), Some(t));
        }
        assert_eq!(CategoryType::parse("expense"), None);
    }

    #[test]
    fn test_response_sorts_sub_categories_case_insensitively() {
        let category = Category {
            id: 1,
            name: "Food".to_string(),
            description: "Meals".to_string(),
            category_type: "EXPENSE".to_string(),
            audit: audit(),
        };
        let response =
            CategoryResponse::new(category, vec![sub(1, "snacks"), sub(2, "Bakery"), sub(3, "dairy")]);

        let names: Vec<_> = response.sub_categories.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bakery", "dairy", "snacks"]);
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let dto = CategoryDto {
            name: "   ".to_string(),
            description: "desc".to_string(),
            category_type: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_type_serialized_uppercase() {
        let json = serde_json::to_string(&CategoryType::Saving).expect("serialize");
        assert_eq!(json, "\"SAVING\"");
    }
}
