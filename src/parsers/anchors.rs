//! Anchor detectors for the budget workbook.
//!
//! The budget sheet has no fixed schema: revenue and expense blocks float
//! depending on how many line items a year carries. Each detector is a pure
//! function over the grid returning a row index (or `None`), composed by
//! [`detect_blocks`] with explicit fallback rows when an anchor is missing.

use std::ops::Range;

use crate::processor::tabular::Grid;
use crate::types::ParseConfidence;

// Column layout: A empty, B label, C-N months Jul-Jun, P budget, R actual,
// T remaining.
pub const COL_LABEL: usize = 1;
pub const COL_MONTH_START: usize = 2;
pub const COL_MONTH_END: usize = 13;
pub const COL_BUDGET: usize = 15;
pub const COL_ACTUAL: usize = 17;
pub const COL_REMAINING: usize = 19;

/// First revenue line item label.
pub const REVENUE_SENTINEL: &str = "Concessions";
/// First expense line item label.
pub const EXPENSE_SENTINEL: &str = "Annual Report WA SOS";

/// An unlabeled row whose budget exceeds this is the revenue total.
const REVENUE_TOTAL_MIN_BUDGET: f64 = 10_000.0;
/// The revenue total sits at least this many rows past the first item.
const REVENUE_TOTAL_MIN_OFFSET: usize = 3;
const EXPENSE_TOTAL_MIN_BUDGET: f64 = 5_000.0;
const EXPENSE_TOTAL_MIN_OFFSET: usize = 5;
const EXPENSE_TOTAL_SCAN_LIMIT: usize = 80;

/// Row guesses used when an anchor is not found.
pub mod fallback {
    pub const REVENUE_START: usize = 8;
    pub const REVENUE_TOTAL: usize = 15;
    pub const EXPENSE_START: usize = 17;
    pub const EXPENSE_TOTAL: usize = 50;
}

// Monthly series detection (independent of the block detectors above).
const MONTHLY_SCAN: Range<usize> = 5..60;
const MONTHLY_TOTAL_MIN_BUDGET: f64 = 20_000.0;
pub const MONTHLY_REVENUE_FIRST_ROW: usize = 7;

pub fn label(grid: &Grid, row: usize) -> String {
    grid.text(row, COL_LABEL)
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

pub fn find_revenue_start(grid: &Grid) -> Option<usize> {
    (0..grid.len()).find(|&i| label(grid, i) == REVENUE_SENTINEL)
}

pub fn find_revenue_total(grid: &Grid, revenue_start: usize) -> Option<usize> {
    (revenue_start + REVENUE_TOTAL_MIN_OFFSET + 1..grid.len()).find(|&i| {
        label(grid, i).is_empty() && grid.number(i, COL_BUDGET) > REVENUE_TOTAL_MIN_BUDGET
    })
}

/// The expense sentinel, or the first labeled row after the revenue total.
pub fn find_expense_start(grid: &Grid, revenue_total: Option<usize>) -> Option<usize> {
    (0..grid.len()).find(|&i| {
        let label = label(grid, i);
        if label.is_empty() {
            return false;
        }
        label == EXPENSE_SENTINEL
            || (revenue_total.is_some_and(|t| i > t) && label.chars().count() > 2)
    })
}

pub fn find_expense_total(grid: &Grid, expense_start: usize) -> Option<usize> {
    let end = grid.len().min(EXPENSE_TOTAL_SCAN_LIMIT);
    (expense_start + EXPENSE_TOTAL_MIN_OFFSET..end).find(|&i| {
        label(grid, i).is_empty() && grid.number(i, COL_BUDGET) > EXPENSE_TOTAL_MIN_BUDGET
    })
}

/// Revenue and expense total rows as seen by the monthly series: the first
/// and second unlabeled rows with a large budget value.
pub fn find_monthly_total_rows(grid: &Grid) -> (Option<usize>, Option<usize>) {
    let mut totals = MONTHLY_SCAN.filter(|&i| {
        label(grid, i).is_empty() && grid.number(i, COL_BUDGET) > MONTHLY_TOTAL_MIN_BUDGET
    });
    let revenue = totals.next();
    let expense = revenue.and_then(|_| totals.next());
    (revenue, expense)
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Located revenue and expense blocks. Item ranges are half-open and end at
/// the block's total row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBounds {
    pub revenue_items: Range<usize>,
    pub revenue_total: usize,
    pub expense_items: Range<usize>,
    pub expense_total: usize,
    pub confidence: ParseConfidence,
}

pub fn detect_blocks(grid: &Grid) -> BlockBounds {
    let revenue_start = find_revenue_start(grid);
    let revenue_total = revenue_start.and_then(|s| find_revenue_total(grid, s));
    let expense_start = find_expense_start(grid, revenue_total);
    let expense_total = expense_start.and_then(|s| find_expense_total(grid, s));

    let confidence = if revenue_start.is_some()
        && revenue_total.is_some()
        && expense_start.is_some()
        && expense_total.is_some()
    {
        ParseConfidence::Detected
    } else {
        log::warn!(
            "Budget anchors not found (revenue start {:?}, revenue total {:?}, expense start {:?}, expense total {:?}); using fallback rows",
            revenue_start,
            revenue_total,
            expense_start,
            expense_total
        );
        ParseConfidence::BestGuess
    };

    let revenue_total = revenue_total.unwrap_or(fallback::REVENUE_TOTAL);
    let expense_total = expense_total.unwrap_or(fallback::EXPENSE_TOTAL);
    BlockBounds {
        revenue_items: revenue_start.unwrap_or(fallback::REVENUE_START)..revenue_total,
        revenue_total,
        expense_items: expense_start.unwrap_or(fallback::EXPENSE_START)..expense_total,
        expense_total,
        confidence,
    }
}
