//! Point-of-sale export parsing.
//!
//! One sheet per month. Row 0 is the header
//! (Date, Item, Payment Type, Gross Sales, Fees, Net Total, ...); data rows
//! follow and the sheet ends with a totals row that has no date.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::IngestError;
use crate::processor::tabular::{parse_date, parse_number, serial_to_iso, Cell, Workbook};
use crate::types::{CategoryTransactions, MonthlyTransactions, Transaction, TransactionSummary};

const COL_DATE: usize = 0;
const COL_ITEM: usize = 1;
const COL_PAYMENT_TYPE: usize = 2;
const COL_GROSS: usize = 3;
const COL_FEES: usize = 4;
const COL_NET: usize = 5;

const OTHER_CATEGORY: &str = "Other";

fn transaction_date(cell: &Cell) -> String {
    match cell {
        Cell::Number(serial) => serial_to_iso(*serial),
        other => parse_date(other),
    }
}

pub fn parse_transactions(workbook: &Workbook) -> Vec<Transaction> {
    let mut transactions = Vec::new();

    for sheet in workbook.sheets() {
        let grid = &sheet.grid;
        if grid.len() < 2 {
            continue;
        }

        for i in 1..grid.len() {
            if grid.cell(i, COL_DATE).is_blank() {
                continue;
            }

            let gross = grid.number(i, COL_GROSS);
            let fees = grid.number(i, COL_FEES);
            let net = grid.number(i, COL_NET);
            // Totals and empty rows
            if gross == 0.0 && fees == 0.0 && net == 0.0 {
                continue;
            }

            let date = transaction_date(grid.cell(i, COL_DATE));
            if date.is_empty() {
                continue;
            }

            let payment_type = grid.text(i, COL_PAYMENT_TYPE);
            transactions.push(Transaction {
                date,
                description: grid.text(i, COL_ITEM),
                category: payment_type.clone(),
                amount: gross,
                fees: fees.abs(),
                net,
                payment_method: Some(payment_type),
            });
        }
    }

    // Stable, so same-day rows keep sheet order
    transactions.sort_by(|a, b| a.date.cmp(&b.date));
    transactions
}

pub fn parse_transactions_file(path: &Path) -> Result<Vec<Transaction>, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_transactions(&workbook))
}

/// Totals plus per-month (`YYYY-MM`, ascending) and per-item (by total,
/// descending) aggregates.
pub fn summarize_transactions(transactions: &[Transaction]) -> TransactionSummary {
    let mut by_month: BTreeMap<String, MonthlyTransactions> = BTreeMap::new();
    let mut by_category: HashMap<String, CategoryTransactions> = HashMap::new();
    let mut category_order: Vec<String> = Vec::new();

    for t in transactions {
        let month_key: String = t.date.chars().take(7).collect();
        let month = by_month.entry(month_key.clone()).or_insert_with(|| MonthlyTransactions {
            month: month_key,
            ..Default::default()
        });
        month.revenue += t.amount;
        month.fees += t.fees;
        month.net += t.net;
        month.count += 1;

        let name = if t.description.is_empty() {
            OTHER_CATEGORY.to_string()
        } else {
            t.description.clone()
        };
        let category = by_category.entry(name.clone()).or_insert_with(|| {
            category_order.push(name.clone());
            CategoryTransactions {
                category: name,
                ..Default::default()
            }
        });
        category.total += t.amount;
        category.count += 1;
    }

    let mut categories: Vec<CategoryTransactions> = category_order
        .iter()
        .filter_map(|name| by_category.remove(name))
        .collect();
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    TransactionSummary {
        total_revenue: transactions.iter().map(|t| t.amount).sum(),
        total_fees: transactions.iter().map(|t| t.fees).sum(),
        total_net: transactions.iter().map(|t| t.net).sum(),
        transaction_count: transactions.len(),
        by_month: by_month.into_values().collect(),
        by_category: categories,
    }
}
