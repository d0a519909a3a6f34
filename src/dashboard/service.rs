use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use super::engine::{build_summary, window_for};
use super::models::DashboardSummary;
use super::repository::DashboardRepository;
use crate::errors::AppError;

const DEFAULT_TOP_N: i64 = 5;
const MAX_TOP_N: i64 = 10;

pub struct DashboardService;

impl DashboardService {
    pub async fn summary(
        pool: &PgPool,
        owner: &str,
        today: NaiveDate,
        top_n: Option<i64>,
    ) -> Result<DashboardSummary, AppError> {
        let top_n = resolve_top_n(top_n)?;
        let window = window_for(today)?;

        let rows = DashboardRepository::find_in_range(pool, owner, window.start, window.end).await?;
        debug!(%owner, %today, rows = rows.len(), "building dashboard summary");

        build_summary(&rows, today, top_n)
    }
}

fn resolve_top_n(top_n: Option<i64>) -> Result<usize, AppError> {
    let top_n = top_n.unwrap_or(DEFAULT_TOP_N);
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(AppError::BadRequest(
            "topN must be between 1 and 10".to_string(),
        ));
    }
    usize::try_from(top_n)
        .map_err(|_| AppError::BadRequest("topN must be between 1 and 10".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_defaults_to_five() {
        assert_eq!(resolve_top_n(None).expect("default"), 5);
        assert_eq!(resolve_top_n(Some(1)).expect("min"), 1);
        assert_eq!(resolve_top_n(Some(10)).expect("max"), 10);
    }

    #[test]
    fn test_top_n_out_of_range() {
        for value in [0, 11, -3] {
            match resolve_top_n(Some(value)) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "topN must be between 1 and 10"),
                other => panic!("expected BadRequest, got {other:?}"),
            }
        }
    }
}
