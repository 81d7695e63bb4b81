//! Budget workbook parsing: line items and totals, the 12-month actuals
//! series, and checking/savings balances.

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::anchors::{
    self, detect_blocks, find_monthly_total_rows, COL_ACTUAL, COL_BUDGET, COL_MONTH_END,
    COL_MONTH_START, COL_REMAINING, MONTHLY_REVENUE_FIRST_ROW,
};
use crate::error::IngestError;
use crate::processor::tabular::{Grid, Workbook};
use crate::types::{
    BudgetCategory, BudgetData, BudgetLineItem, BudgetTotals, FundBalance, MonthlyBudgetData,
};

pub const UNKNOWN_FISCAL_YEAR: &str = "Unknown";

/// Fiscal months in sheet column order (July first).
pub const FISCAL_MONTHS: [&str; 12] = [
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
];

const FISCAL_YEAR_HEADER_ROWS: usize = 5;
const BALANCE_SCAN_ROWS: usize = 70;
const CHECKING_LABEL: &str = "Checking Balance - Ending";
const SAVINGS_LABEL: &str = "Savings Balance - Ending";

fn fiscal_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)July\s+\d*,?\s*(\d{4}).*?June\s+\d*,?\s*(\d{4})").expect("valid regex")
    })
}

fn year_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"20\d{2}\s*[-–]\s*20\d{2}").expect("valid regex"))
}

fn four_digit_years_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})\D+(\d{4})").expect("valid regex"))
}

/// Fiscal year label from the header rows: "July 2025 ... June 2026" gives
/// `FY 2025-2026`; a bare "2025-2026" is kept as written.
pub fn detect_fiscal_year(grid: &Grid) -> String {
    for i in 0..FISCAL_YEAR_HEADER_ROWS {
        let row_text = grid
            .row(i)
            .iter()
            .map(|c| c.as_text())
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(c) = fiscal_span_re().captures(&row_text) {
            return format!("FY {}-{}", &c[1], &c[2]);
        }
        if let Some(m) = year_range_re().find(&row_text) {
            return format!("FY {}", m.as_str());
        }
    }
    UNKNOWN_FISCAL_YEAR.to_string()
}

/// Fiscal year start (`YYYY-07-01`) and end (`YYYY-06-30`), empty when the
/// label carries no year pair.
pub fn fiscal_year_dates(fiscal_year: &str) -> (String, String) {
    match four_digit_years_re().captures(fiscal_year) {
        Some(c) => (format!("{}-07-01", &c[1]), format!("{}-06-30", &c[2])),
        None => (String::new(), String::new()),
    }
}

fn extract_line_items(grid: &Grid, rows: Range<usize>, category: &str) -> Vec<BudgetLineItem> {
    rows.filter_map(|i| {
        let label = anchors::label(grid, i);
        if label.is_empty() || label == "Revenue" || label == "Expenses" {
            return None;
        }
        Some(BudgetLineItem::new(
            category,
            &label,
            grid.number(i, COL_BUDGET),
            grid.number(i, COL_ACTUAL),
            grid.number(i, COL_REMAINING),
        ))
    })
    .collect()
}

/// Totals come from the sheet's total row when it has a value, otherwise
/// from the sum of the items.
fn build_category(grid: &Grid, name: &str, items: Vec<BudgetLineItem>, total_row: usize) -> BudgetCategory {
    let or_sum = |value: f64, f: fn(&BudgetLineItem) -> f64| {
        if value != 0.0 {
            value
        } else {
            items.iter().map(f).sum()
        }
    };
    let total_budgeted = or_sum(grid.number(total_row, COL_BUDGET), |i| i.budgeted);
    let total_actual = or_sum(grid.number(total_row, COL_ACTUAL), |i| i.actual);
    let total_remaining = items.iter().map(|i| i.remaining).sum();

    BudgetCategory {
        name: name.to_string(),
        items,
        total_budgeted,
        total_actual,
        total_remaining,
    }
}

/// Parse one budget grid.
pub fn parse_budget_grid(grid: &Grid) -> BudgetData {
    let fiscal_year = detect_fiscal_year(grid);
    let (start_date, end_date) = fiscal_year_dates(&fiscal_year);
    let bounds = detect_blocks(grid);

    let income_items = extract_line_items(grid, bounds.revenue_items.clone(), "Revenue");
    let expense_items = extract_line_items(grid, bounds.expense_items.clone(), "Expenses");
    let income = build_category(grid, "Revenue", income_items, bounds.revenue_total);
    let expenses = build_category(grid, "Expenses", expense_items, bounds.expense_total);

    let total_income = BudgetTotals {
        budgeted: income.total_budgeted,
        actual: income.total_actual,
    };
    let total_expenses = BudgetTotals {
        budgeted: expenses.total_budgeted,
        actual: expenses.total_actual,
    };

    BudgetData {
        fiscal_year,
        start_date,
        end_date,
        income: vec![income],
        expenses: vec![expenses],
        total_income,
        total_expenses,
        net_income: BudgetTotals {
            budgeted: total_income.budgeted - total_expenses.budgeted,
            actual: total_income.actual - total_expenses.actual,
        },
        confidence: bounds.confidence,
    }
}

pub fn parse_budget_file(path: &Path) -> Result<BudgetData, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_budget_grid(&workbook.first_sheet()))
}

/// Monthly actual income and expenses. Block boundaries are re-derived with
/// the monthly detectors, so they may disagree with [`parse_budget_grid`] on
/// ambiguous sheets. Monthly budget columns do not exist; budgeted stays 0.
pub fn parse_monthly_grid(grid: &Grid) -> Vec<MonthlyBudgetData> {
    let (revenue_total, expense_total) = find_monthly_total_rows(grid);

    FISCAL_MONTHS
        .iter()
        .enumerate()
        .map(|(m, month)| {
            let col = COL_MONTH_START + m;
            let income = revenue_total
                .map(|end| (MONTHLY_REVENUE_FIRST_ROW..end).map(|r| grid.number(r, col)).sum())
                .unwrap_or(0.0);
            let expenses = match (revenue_total, expense_total) {
                (Some(start), Some(end)) => (start + 2..end).map(|r| grid.number(r, col)).sum(),
                _ => 0.0,
            };
            MonthlyBudgetData {
                month: month.to_string(),
                budgeted_income: 0.0,
                actual_income: income,
                budgeted_expenses: 0.0,
                actual_expenses: expenses,
            }
        })
        .collect()
}

pub fn parse_monthly_file(path: &Path) -> Result<Vec<MonthlyBudgetData>, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_monthly_grid(&workbook.first_sheet()))
}

/// Latest positive monthly value on a row, scanning June back to July.
fn latest_month_value(grid: &Grid, row: usize) -> Option<f64> {
    (COL_MONTH_START..=COL_MONTH_END)
        .rev()
        .map(|c| grid.number(row, c))
        .find(|v| *v > 0.0)
}

/// Ending checking and savings balances from the budget sheet.
pub fn parse_fund_balances(grid: &Grid) -> FundBalance {
    let mut checking = 0.0;
    let mut savings = 0.0;
    for i in 0..grid.len().min(BALANCE_SCAN_ROWS) {
        let label = anchors::label(grid, i);
        if label.contains(CHECKING_LABEL) {
            if let Some(v) = latest_month_value(grid, i) {
                checking = v;
            }
        }
        if label.contains(SAVINGS_LABEL) {
            if let Some(v) = latest_month_value(grid, i) {
                savings = v;
            }
        }
    }
    FundBalance {
        checking,
        savings,
        total: checking + savings,
    }
}

pub fn parse_fund_balances_file(path: &Path) -> Result<FundBalance, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_fund_balances(&workbook.first_sheet()))
}
