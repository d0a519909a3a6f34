//! Month bucketing and period rollups for the dashboard.
//!
//! Everything here is pure: rows in, summary out. Callers pass the rows of the
//! 12-month window in date/id descending order; ties in the category rankings
//! keep that order.

use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;

use super::models::{
    CategoryTotal, CategoryTrend, DashboardRow, DashboardSummary, MonthlyIncomeExpensePoint,
    MonthlySavingRatePoint, MonthlyTotal, PeriodSummary,
};
use crate::category::models::CategoryType;
use crate::errors::AppError;
use crate::money::{percent, round2};
use crate::transaction::models::TransactionType;

pub const WINDOW_MONTHS: usize = 12;

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The 12 month slots ending with today's month, plus the named periods.
#[derive(Debug, Clone)]
struct Calendar {
    months: Vec<DateRange>,
    last_30_days: DateRange,
    same_period_last_month: DateRange,
    last_year: DateRange,
}

impl Calendar {
    fn new(today: NaiveDate) -> Option<Self> {
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;

        let mut months = Vec::with_capacity(WINDOW_MONTHS);
        for back in (0..WINDOW_MONTHS as u32).rev() {
            let start = month_start.checked_sub_months(Months::new(back))?;
            let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
            months.push(DateRange { start, end });
        }

        let previous = months[WINDOW_MONTHS - 2];
        let clamped_day = today.day().min(previous.end.day());
        let same_period_last_month = DateRange {
            start: previous.start,
            end: NaiveDate::from_ymd_opt(previous.start.year(), previous.start.month(), clamped_day)?,
        };

        Some(Self {
            months,
            last_30_days: DateRange {
                start: today.checked_sub_days(Days::new(29))?,
                end: today,
            },
            same_period_last_month,
            last_year: DateRange {
                start: today.checked_sub_days(Days::new(364))?,
                end: today,
            },
        })
    }

    fn window(&self) -> DateRange {
        DateRange {
            start: self.months[0].start,
            end: self.months[WINDOW_MONTHS - 1].end,
        }
    }

    fn current_month(&self) -> DateRange {
        self.months[WINDOW_MONTHS - 1]
    }

    fn last_month(&self) -> DateRange {
        self.months[WINDOW_MONTHS - 2]
    }

    /// The three full months before the current one
    fn last_quarter(&self) -> DateRange {
        DateRange {
            start: self.months[WINDOW_MONTHS - 4].start,
            end: self.months[WINDOW_MONTHS - 2].end,
        }
    }

    fn month_index(&self, date: NaiveDate) -> Option<usize> {
        self.months.iter().position(|m| m.contains(date))
    }
}

/// Date range the dashboard reads for `today`
pub fn window_for(today: NaiveDate) -> Result<DateRange, AppError> {
    calendar_for(today).map(|c| c.window())
}

fn calendar_for(today: NaiveDate) -> Result<Calendar, AppError> {
    Calendar::new(today)
        .ok_or_else(|| AppError::InternalError(format!("no dashboard window for {today}")))
}

/// A row with its enums parsed and its month slot resolved
struct Entry<'a> {
    date: NaiveDate,
    month: usize,
    amount: Decimal,
    kind: TransactionType,
    saving: bool,
    category: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
struct MonthBucket {
    total: Decimal,
    count: i64,
    income: Decimal,
    expense: Decimal,
    saving: Decimal,
}

struct CategoryAccumulator<'a> {
    name: &'a str,
    total: Decimal,
    count: i64,
    monthly: [Decimal; WINDOW_MONTHS],
    monthly_counts: [i64; WINDOW_MONTHS],
}

pub fn build_summary(
    rows: &[DashboardRow],
    today: NaiveDate,
    top_n: usize,
) -> Result<DashboardSummary, AppError> {
    let calendar = calendar_for(today)?;

    let entries: Vec<Entry<'_>> = rows
        .iter()
        .filter_map(|row| {
            let month = calendar.month_index(row.expense_date)?;
            Some(Entry {
                date: row.expense_date,
                month,
                amount: row.amount,
                kind: TransactionType::parse(&row.transaction_type).unwrap_or_default(),
                saving: CategoryType::parse(&row.category_type) == Some(CategoryType::Saving),
                category: row.category_name.as_str(),
            })
        })
        .collect();

    let buckets = bucket_by_month(&entries);
    let labels: Vec<String> = calendar
        .months
        .iter()
        .map(|m| m.start.format("%Y-%m").to_string())
        .collect();

    let monthly_totals = labels
        .iter()
        .zip(&buckets)
        .map(|(label, b)| MonthlyTotal {
            year_month: label.clone(),
            total: round2(b.total),
            count: b.count,
        })
        .collect();

    let monthly_income_expense_points = labels
        .iter()
        .zip(&buckets)
        .map(|(label, b)| MonthlyIncomeExpensePoint {
            year_month: label.clone(),
            income_total: round2(b.income),
            expense_total: round2(b.expense),
            net_amount: round2(b.income - b.expense),
        })
        .collect();

    let monthly_saving_rate_points = labels
        .iter()
        .zip(&buckets)
        .map(|(label, b)| MonthlySavingRatePoint {
            year_month: label.clone(),
            saving_amount: round2(b.saving),
            income_total: round2(b.income),
            saving_rate_percent: percent(b.saving, b.income),
        })
        .collect();

    let current_month = calendar.current_month();
    let current_month_summary = summarize(&entries, current_month);
    let same_period_last_month_summary = summarize(&entries, calendar.same_period_last_month);
    let last_30_days_summary = summarize(&entries, calendar.last_30_days);
    let last_month_summary = summarize(&entries, calendar.last_month());
    let last_quarter_summary = summarize(&entries, calendar.last_quarter());
    let last_year_summary = summarize(&entries, calendar.last_year);

    let current_month_category_totals = rank_categories(
        entries
            .iter()
            .filter(|e| e.kind == TransactionType::Expense && current_month.contains(e.date)),
    )
    .into_iter()
    .map(|c| CategoryTotal {
        category_name: c.name.to_string(),
        total: round2(c.total),
        count: c.count,
    })
    .collect();

    let top_yearly_category_trends = rank_categories(
        entries
            .iter()
            .filter(|e| e.kind == TransactionType::Expense),
    )
    .into_iter()
    .take(top_n)
    .map(|c| CategoryTrend {
        category_name: c.name.to_string(),
        year_total: round2(c.total),
        monthly_trend: labels
            .iter()
            .zip(c.monthly.iter().zip(c.monthly_counts.iter()))
            .map(|(label, (total, count))| MonthlyTotal {
                year_month: label.clone(),
                total: round2(*total),
                count: *count,
            })
            .collect(),
    })
    .collect();

    Ok(DashboardSummary {
        current_month_total: current_month_summary.expense_total,
        last_30_days_total: last_30_days_summary.expense_total,
        last_month_total: last_month_summary.expense_total,
        last_quarter_total: last_quarter_summary.expense_total,
        last_year_total: last_year_summary.expense_total,
        current_month_summary,
        same_period_last_month_summary,
        last_30_days_summary,
        last_month_summary,
        last_quarter_summary,
        last_year_summary,
        monthly_totals,
        monthly_income_expense_points,
        monthly_saving_rate_points,
        current_month_category_totals,
        top_yearly_category_trends,
    })
}

fn bucket_by_month(entries: &[Entry<'_>]) -> [MonthBucket; WINDOW_MONTHS] {
    let mut buckets = [MonthBucket::default(); WINDOW_MONTHS];
    for entry in entries {
        let bucket = &mut buckets[entry.month];
        bucket.total += entry.amount;
        bucket.count += 1;
        match entry.kind {
            TransactionType::Income => bucket.income += entry.amount,
            TransactionType::Expense => bucket.expense += entry.amount,
        }
        if entry.saving {
            bucket.saving += entry.amount;
        }
    }
    buckets
}

fn summarize(entries: &[Entry<'_>], range: DateRange) -> PeriodSummary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for entry in entries.iter().filter(|e| range.contains(e.date)) {
        match entry.kind {
            TransactionType::Income => income += entry.amount,
            TransactionType::Expense => expense += entry.amount,
        }
    }
    PeriodSummary {
        expense_total: round2(expense),
        income_total: round2(income),
        net_amount: round2(income - expense),
    }
}

/// Group by category name and order by total, largest first.
/// Equal totals keep first-appearance order.
fn rank_categories<'e, 'a: 'e, I>(entries: I) -> Vec<CategoryAccumulator<'a>>
where
    I: Iterator<Item = &'e Entry<'a>>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<CategoryAccumulator<'a>> = Vec::new();

    for entry in entries {
        let slot = *index.entry(entry.category).or_insert_with(|| {
            groups.push(CategoryAccumulator {
                name: entry.category,
                total: Decimal::ZERO,
                count: 0,
                monthly: [Decimal::ZERO; WINDOW_MONTHS],
                monthly_counts: [0; WINDOW_MONTHS],
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total += entry.amount;
        group.count += 1;
        group.monthly[entry.month] += entry.amount;
        group.monthly_counts[entry.month] += 1;
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal")
    }

    fn row(on: NaiveDate, amount: &str, kind: &str, category: &str, category_type: &str) -> DashboardRow {
        DashboardRow {
            expense_date: on,
            amount: d(amount),
            transaction_type: kind.to_string(),
            category_name: category.to_string(),
            category_type: category_type.to_string(),
        }
    }

    fn expense(on: NaiveDate, amount: &str, category: &str) -> DashboardRow {
        row(on, amount, "EXPENSE", category, "EXPENSE")
    }

    #[test]
    fn test_empty_window_has_twelve_zero_months() {
        let summary = build_summary(&[], date(2025, 3, 15), 5).expect("summary");

        assert_eq!(summary.monthly_totals.len(), 12);
        assert_eq!(summary.monthly_income_expense_points.len(), 12);
        assert_eq!(summary.monthly_saving_rate_points.len(), 12);
        assert_eq!(summary.monthly_totals[0].year_month, "2024-04");
        assert_eq!(summary.monthly_totals[11].year_month, "2025-03");
        assert!(summary
            .monthly_totals
            .iter()
            .all(|m| m.total.to_string() == "0.00" && m.count == 0));
        assert_eq!(summary.current_month_total.to_string(), "0.00");
        assert!(summary.current_month_category_totals.is_empty());
        assert!(summary.top_yearly_category_trends.is_empty());
    }

    #[test]
    fn test_income_and_saving_in_same_month() {
        let rows = vec![
            row(date(2025, 1, 20), "200.00", "EXPENSE", "Emergency fund", "SAVING"),
            row(date(2025, 1, 15), "1000.00", "INCOME", "Salary", "INCOME"),
        ];
        let summary = build_summary(&rows, date(2025, 1, 31), 5).expect("summary");

        let point = &summary.monthly_income_expense_points[11];
        assert_eq!(point.year_month, "2025-01");
        assert_eq!(point.income_total.to_string(), "1000.00");
        assert_eq!(point.expense_total.to_string(), "200.00");
        assert_eq!(point.net_amount.to_string(), "800.00");

        let rate = &summary.monthly_saving_rate_points[11];
        assert_eq!(rate.saving_amount.to_string(), "200.00");
        assert_eq!(rate.saving_rate_percent.to_string(), "20.00");

        let total = &summary.monthly_totals[11];
        assert_eq!(total.total.to_string(), "1200.00");
        assert_eq!(total.count, 2);

        assert_eq!(summary.current_month_summary.net_amount.to_string(), "800.00");
        assert_eq!(summary.current_month_total.to_string(), "200.00");
    }

    #[test]
    fn test_saving_rate_is_zero_without_income() {
        let rows = vec![row(date(2025, 1, 20), "500.00", "EXPENSE", "Fund", "SAVING")];
        let summary = build_summary(&rows, date(2025, 1, 31), 5).expect("summary");

        let rate = &summary.monthly_saving_rate_points[11];
        assert_eq!(rate.saving_amount.to_string(), "500.00");
        assert_eq!(rate.saving_rate_percent.to_string(), "0.00");
    }

    #[test]
    fn test_last_30_days_is_inclusive() {
        let today = date(2025, 3, 15);
        let rows = vec![
            expense(date(2025, 3, 15), "1.00", "Food"),
            expense(date(2025, 2, 14), "10.00", "Food"),
            expense(date(2025, 2, 13), "100.00", "Food"),
        ];
        let summary = build_summary(&rows, today, 5).expect("summary");

        assert_eq!(summary.last_30_days_total.to_string(), "11.00");
    }

    #[test]
    fn test_same_period_last_month_clamps_to_month_length() {
        let rows = vec![
            expense(date(2025, 2, 28), "5.00", "Food"),
            expense(date(2025, 2, 1), "7.00", "Food"),
        ];
        let summary = build_summary(&rows, date(2025, 3, 31), 5).expect("summary");
        assert_eq!(summary.same_period_last_month_summary.expense_total.to_string(), "12.00");

        let leap = vec![expense(date(2024, 2, 29), "3.00", "Food")];
        let summary = build_summary(&leap, date(2024, 3, 31), 5).expect("summary");
        assert_eq!(summary.same_period_last_month_summary.expense_total.to_string(), "3.00");
    }

    #[test]
    fn test_same_period_last_month_stops_at_todays_day() {
        let rows = vec![
            expense(date(2025, 2, 15), "2.00", "Food"),
            expense(date(2025, 2, 16), "20.00", "Food"),
        ];
        let summary = build_summary(&rows, date(2025, 3, 15), 5).expect("summary");

        assert_eq!(summary.same_period_last_month_summary.expense_total.to_string(), "2.00");
        assert_eq!(summary.last_month_total.to_string(), "22.00");
    }

    #[test]
    fn test_last_quarter_is_previous_three_full_months() {
        let rows = vec![
            expense(date(2025, 3, 1), "1000.00", "Food"),
            expense(date(2025, 2, 28), "1.00", "Food"),
            expense(date(2024, 12, 1), "2.00", "Food"),
            expense(date(2024, 11, 30), "500.00", "Food"),
        ];
        let summary = build_summary(&rows, date(2025, 3, 15), 5).expect("summary");

        assert_eq!(summary.last_quarter_total.to_string(), "3.00");
    }

    #[test]
    fn test_rows_outside_window_are_ignored() {
        // window for 2025-03-01 starts 2024-04-01; last year would reach back to 2024-03-02
        let rows = vec![
            expense(date(2024, 4, 1), "4.00", "Food"),
            expense(date(2024, 3, 15), "40.00", "Food"),
        ];
        let summary = build_summary(&rows, date(2025, 3, 1), 5).expect("summary");

        assert_eq!(summary.last_year_total.to_string(), "4.00");
        assert_eq!(summary.monthly_totals[0].total.to_string(), "4.00");
        let counted: i64 = summary.monthly_totals.iter().map(|m| m.count).sum();
        assert_eq!(counted, 1);
    }

    #[test]
    fn test_period_net_includes_income() {
        let rows = vec![
            row(date(2025, 2, 10), "300.00", "INCOME", "Salary", "INCOME"),
            expense(date(2025, 2, 11), "120.50", "Food"),
        ];
        let summary = build_summary(&rows, date(2025, 3, 15), 5).expect("summary");

        assert_eq!(
            summary.last_month_summary,
            PeriodSummary {
                expense_total: d("120.50"),
                income_total: d("300.00"),
                net_amount: d("179.50"),
            }
        );
    }

    #[test]
    fn test_current_month_categories_sorted_with_stable_ties() {
        let today = date(2025, 3, 15);
        let rows = vec![
            expense(date(2025, 3, 14), "10.00", "Transport"),
            expense(date(2025, 3, 13), "25.00", "Food"),
            expense(date(2025, 3, 12), "10.00", "Books"),
            row(date(2025, 3, 11), "900.00", "INCOME", "Salary", "INCOME"),
            expense(date(2025, 3, 10), "5.00", "Food"),
            expense(date(2025, 2, 10), "99.00", "Books"),
        ];
        let summary = build_summary(&rows, today, 5).expect("summary");

        let names: Vec<_> = summary
            .current_month_category_totals
            .iter()
            .map(|c| c.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Transport", "Books"]);
        assert_eq!(summary.current_month_category_totals[0].total.to_string(), "30.00");
        assert_eq!(summary.current_month_category_totals[0].count, 2);
    }

    #[test]
    fn test_yearly_trends_ranked_and_truncated() {
        let today = date(2025, 3, 15);
        let rows = vec![
            expense(date(2025, 3, 1), "10.00", "Food"),
            expense(date(2025, 1, 5), "15.00", "Food"),
            expense(date(2025, 1, 4), "40.00", "Rent"),
            expense(date(2024, 5, 2), "1.00", "Books"),
            row(date(2025, 1, 3), "5000.00", "INCOME", "Salary", "INCOME"),
        ];
        let summary = build_summary(&rows, today, 2).expect("summary");

        let trends = &summary.top_yearly_category_trends;
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].category_name, "Rent");
        assert_eq!(trends[1].category_name, "Food");
        assert_eq!(trends[1].year_total.to_string(), "25.00");
        assert_eq!(trends[1].monthly_trend.len(), 12);

        let january = &trends[1].monthly_trend[9];
        assert_eq!(january.year_month, "2025-01");
        assert_eq!(january.total.to_string(), "15.00");
        assert_eq!(january.count, 1);

        let february = &trends[1].monthly_trend[10];
        assert_eq!(february.year_month, "2025-02");
        assert_eq!(february.total.to_string(), "0.00");
        assert_eq!(february.count, 0);

        let march = serde_json::to_value(&trends[1].monthly_trend[11]).expect("serialize");
        assert_eq!(
            march,
            serde_json::json!({ "yearMonth": "2025-03", "total": "10.00", "count": 1 })
        );
    }

    #[test]
    fn test_sums_are_exact_cents() {
        let today = date(2025, 3, 15);
        let rows: Vec<_> = (0..10)
            .map(|_| expense(date(2025, 3, 2), "0.10", "Snacks"))
            .collect();
        let summary = build_summary(&rows, today, 5).expect("summary");

        assert_eq!(summary.current_month_total.to_string(), "1.00");
        assert_eq!(summary.monthly_totals[11].count, 10);
    }

    #[test]
    fn test_window_bounds() {
        let window = window_for(date(2025, 3, 15)).expect("window");
        assert_eq!(window.start, date(2024, 4, 1));
        assert_eq!(window.end, date(2025, 3, 31));
    }
}
