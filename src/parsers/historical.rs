//! Year-over-year aggregation across budget workbooks.

use std::path::{Path, PathBuf};

use super::budget::{parse_budget_file, UNKNOWN_FISCAL_YEAR};
use crate::error::IngestError;
use crate::types::{BudgetData, HistoricalBudget, HistoricalRevenueBySource, RevenueSource};
use crate::util::first_wins_by_key;

/// Parse every file, dropping unreadable ones and ones without a detected
/// fiscal year, keep the first budget per fiscal year, sort by fiscal year.
pub fn collect_budgets<F>(paths: &[PathBuf], parse: F) -> Vec<BudgetData>
where
    F: Fn(&Path) -> Result<BudgetData, IngestError>,
{
    let parsed = paths.iter().filter_map(|path| match parse(path) {
        Ok(budget) if budget.fiscal_year == UNKNOWN_FISCAL_YEAR => {
            log::warn!("Historical budgets: no fiscal year in {}, skipping", path.display());
            None
        }
        Ok(budget) => Some(budget),
        Err(e) => {
            log::warn!("Historical budgets: skipping {}: {}", path.display(), e);
            None
        }
    });

    let mut budgets = first_wins_by_key(parsed, |b| b.fiscal_year.clone());
    budgets.sort_by(|a, b| a.fiscal_year.cmp(&b.fiscal_year));
    budgets
}

/// Actual when present, else budgeted.
fn actual_or_budgeted(actual: f64, budgeted: f64) -> f64 {
    if actual != 0.0 {
        actual
    } else {
        budgeted
    }
}

pub fn summarize(budget: &BudgetData) -> HistoricalBudget {
    let income = actual_or_budgeted(budget.total_income.actual, budget.total_income.budgeted);
    let expenses = actual_or_budgeted(budget.total_expenses.actual, budget.total_expenses.budgeted);
    HistoricalBudget {
        fiscal_year: budget.fiscal_year.clone(),
        total_income: income,
        total_expenses: expenses,
        net_income: income - expenses,
    }
}

pub fn revenue_sources(budget: &BudgetData) -> HistoricalRevenueBySource {
    HistoricalRevenueBySource {
        fiscal_year: budget.fiscal_year.clone(),
        sources: budget
            .income
            .iter()
            .flat_map(|c| c.items.iter())
            .map(|item| RevenueSource {
                name: item.subcategory.clone(),
                budgeted: item.budgeted,
                actual: item.actual,
            })
            .collect(),
    }
}

pub fn parse_historical_budgets(paths: &[PathBuf]) -> Result<Vec<HistoricalBudget>, IngestError> {
    Ok(collect_budgets(paths, parse_budget_file)
        .iter()
        .map(summarize)
        .collect())
}

pub fn parse_historical_revenue(paths: &[PathBuf]) -> Result<Vec<HistoricalRevenueBySource>, IngestError> {
    Ok(collect_budgets(paths, parse_budget_file)
        .iter()
        .map(revenue_sources)
        .collect())
}
