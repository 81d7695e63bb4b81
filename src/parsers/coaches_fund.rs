//! Coach's discretionary fund ledger.
//!
//! Sheet layout: title in row 0, headers (DATE, AMOUNT, DESCRIPTION) in
//! row 2, entries from row 3, and a closing "Remaining amount" row. Balances
//! are a left-to-right fold starting from the opening-balance row.

use std::path::Path;

use crate::error::IngestError;
use crate::processor::tabular::{parse_date, serial_to_iso, Cell, Grid, Workbook};
use crate::types::{CoachsFundData, CoachsFundEntry};

const FIRST_ENTRY_ROW: usize = 3;
const COL_DATE: usize = 0;
const COL_AMOUNT: usize = 1;
const COL_DESCRIPTION: usize = 2;

/// How a ledger row affects the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LedgerLine {
    /// Resets the balance to this row's amount.
    Opening,
    /// Closing total; not an entry.
    Closing,
    /// Adds its amount to the balance.
    Movement,
}

fn classify(description: &str, amount: f64) -> LedgerLine {
    let lower = description.to_lowercase();
    if lower.contains("beginning amount") || lower.contains("starting") {
        LedgerLine::Opening
    } else if lower.contains("remaining") {
        LedgerLine::Closing
    } else if amount != 0.0 && lower.contains("beginning") {
        LedgerLine::Opening
    } else {
        LedgerLine::Movement
    }
}

fn entry_date(cell: &Cell) -> String {
    match cell {
        Cell::Number(serial) => serial_to_iso(*serial),
        other => parse_date(other),
    }
}

pub fn parse_coachs_fund(grid: &Grid) -> CoachsFundData {
    let mut entries = Vec::new();
    let mut starting_balance = 0.0;
    let mut balance = 0.0;

    for i in FIRST_ENTRY_ROW..grid.len() {
        let amount = grid.number(i, COL_AMOUNT);
        let description = grid.text(i, COL_DESCRIPTION);
        if description.is_empty() && amount == 0.0 {
            continue;
        }

        match classify(&description, amount) {
            LedgerLine::Closing => continue,
            LedgerLine::Opening => {
                starting_balance = amount;
                balance = amount;
            }
            LedgerLine::Movement => balance += amount,
        }

        let description = if description.is_empty() {
            if amount > 0.0 { "Deposit" } else { "Expense" }.to_string()
        } else {
            description
        };
        entries.push(CoachsFundEntry {
            date: entry_date(grid.cell(i, COL_DATE)),
            description,
            amount,
            balance,
        });
    }

    if starting_balance == 0.0 {
        if let Some(first) = entries.first() {
            starting_balance = first.amount;
        }
    }

    CoachsFundData {
        starting_balance,
        entries,
        current_balance: balance,
    }
}

pub fn parse_coachs_fund_file(path: &Path) -> Result<CoachsFundData, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_coachs_fund(&workbook.first_sheet()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: Cell, amount: f64, description: &str) -> Vec<Cell> {
        vec![date, Cell::Number(amount), Cell::text(description)]
    }

    fn ledger(entries: Vec<Vec<Cell>>) -> Grid {
        let mut rows = vec![
            vec![Cell::text("2025 - 2026 COACH'S DISCRETIONARY FUND")],
            Vec::new(),
            vec![Cell::text("DATE"), Cell::text("AMOUNT"), Cell::text("DESCRIPTION")],
        ];
        rows.extend(entries);
        Grid::new(rows)
    }

    #[test]
    fn test_running_balance_fold() {
        let grid = ledger(vec![
            row(Cell::Number(45839.0), 1500.0, "Beginning amount"),
            row(Cell::Number(45850.0), -200.0, "Bats"),
            row(Cell::text("8/1/2025"), 300.0, "Donation"),
            row(Cell::Empty, 1600.0, "Remaining amount"),
        ]);
        let fund = parse_coachs_fund(&grid);

        assert_eq!(fund.starting_balance, 1500.0);
        assert_eq!(fund.current_balance, 1600.0);
        let balances: Vec<_> = fund.entries.iter().map(|e| e.balance).collect();
        assert_eq!(balances, vec![1500.0, 1300.0, 1600.0]);
        assert_eq!(fund.entries[0].date, "2025-07-01");
        assert_eq!(fund.entries[2].date, "2025-08-01");
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify("Starting balance", 0.0), LedgerLine::Opening);
        assert_eq!(classify("Remaining amount", 10.0), LedgerLine::Closing);
        assert_eq!(classify("Beginning of season", 500.0), LedgerLine::Opening);
        assert_eq!(classify("Beginning of season", 0.0), LedgerLine::Movement);
        assert_eq!(classify("Baseballs", -80.0), LedgerLine::Movement);
    }

    #[test]
    fn test_default_descriptions_and_starting_fallback() {
        let grid = ledger(vec![
            Vec::new(),
            row(Cell::Empty, 250.0, ""),
            row(Cell::Empty, -50.0, ""),
        ]);
        let fund = parse_coachs_fund(&grid);
        assert_eq!(fund.entries.len(), 2);
        assert_eq!(fund.entries[0].description, "Deposit");
        assert_eq!(fund.entries[1].description, "Expense");
        assert_eq!(fund.starting_balance, 250.0);
        assert_eq!(fund.current_balance, 200.0);
        assert_eq!(fund.entries[0].date, "");
    }
}
