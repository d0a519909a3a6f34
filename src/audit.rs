use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Audit columns shared by every owned table.
/// `created_by` doubles as the owner and never changes after insert.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[schema(example = "u001")]
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_on: Option<DateTime<Utc>>,
}
