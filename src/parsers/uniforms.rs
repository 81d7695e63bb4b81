//! Uniform inventory: one item per (jersey number, item type).
//!
//! Pass 1 reads the season inventory sheet, where each item type has a size
//! column followed by a returned-flag column. Pass 2 reads the fines sheet
//! and marks anything still unreturned there as checked out to the named
//! player, overriding the inventory sheet.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::IngestError;
use crate::processor::tabular::{Grid, Workbook};
use crate::types::{UniformInventory, UniformItem, UniformStatus};

/// An item type and its (size, returned-flag) column pair.
struct ItemColumns {
    name: &'static str,
    size_col: usize,
    returned_col: usize,
}

const fn cols(name: &'static str, size_col: usize) -> ItemColumns {
    ItemColumns {
        name,
        size_col,
        returned_col: size_col + 1,
    }
}

const INVENTORY_COLUMNS: [ItemColumns; 5] = [
    cols("Royal Jersey", 2),
    cols("White Jersey", 4),
    cols("Black Jersey", 6),
    cols("Grey Jersey", 8),
    cols("BP Jacket", 10),
];

const FINES_COLUMNS: [ItemColumns; 8] = [
    cols("Royal Jersey", 2),
    cols("White Jersey", 4),
    cols("Black Jersey", 6),
    cols("BP Jacket", 8),
    cols("Bag", 10),
    cols("Coat", 12),
    cols("Helmet", 14),
    cols("Belt", 16),
];

const INVENTORY_SHEET_MARKER: &str = "2026";
const INVENTORY_FIRST_ROW: usize = 2;
const FINES_SHEET: &str = "Sheet4";
const FINES_FIRST_ROW: usize = 1;
const RETURNED_FLAG: &str = "X";
const MISSING_NOTE: &str = "Reported missing";

fn missing_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*-\s*missing").expect("valid regex"))
}

/// "No jacket" style cells mean the item does not exist for this number.
fn is_no_item(size: &str) -> bool {
    size.to_lowercase().starts_with("no ")
}

fn is_returned(grid: &Grid, row: usize, col: usize) -> bool {
    grid.text(row, col).to_uppercase() == RETURNED_FLAG
}

fn inventory_sheet(workbook: &Workbook) -> Grid {
    let name = workbook
        .sheet_names()
        .find(|n| n.contains(INVENTORY_SHEET_MARKER))
        .map(str::to_string);
    workbook.sheet(name.as_deref())
}

fn fines_sheet(workbook: &Workbook) -> Option<Grid> {
    workbook
        .sheet_names()
        .find(|n| *n == FINES_SHEET || n.to_lowercase().contains("fine"))
        .map(|n| workbook.sheet(Some(n)))
}

fn read_inventory(grid: &Grid) -> Vec<UniformItem> {
    let mut items = Vec::new();

    for i in INVENTORY_FIRST_ROW..grid.len() {
        let jersey = grid.text(i, 0);
        if !jersey.parse::<f64>().is_ok_and(f64::is_finite) {
            continue;
        }
        let player = grid.text(i, 1);

        for column in &INVENTORY_COLUMNS {
            let size = grid.text(i, column.size_col);
            if size.is_empty() || is_no_item(&size) {
                continue;
            }

            let missing = size.to_lowercase().contains("missing");
            let status = if missing {
                UniformStatus::Missing
            } else if is_returned(grid, i, column.returned_col) {
                UniformStatus::Returned
            } else if !player.is_empty() {
                UniformStatus::CheckedOut
            } else {
                UniformStatus::Available
            };

            items.push(UniformItem {
                jersey_number: jersey.clone(),
                player_name: (!player.is_empty()).then(|| player.clone()),
                item: column.name.to_string(),
                size: missing_suffix_re().replace(&size, "").trim().to_string(),
                status,
                notes: missing.then(|| MISSING_NOTE.to_string()),
            });
        }
    }

    items
}

fn apply_fines(items: &mut [UniformItem], fines: &Grid) {
    for i in FINES_FIRST_ROW..fines.len() {
        let jersey = fines.text(i, 0);
        let player = fines.text(i, 1);
        if player.is_empty() {
            continue;
        }

        for column in &FINES_COLUMNS {
            let size = fines.text(i, column.size_col);
            if size.is_empty() || is_no_item(&size) || is_returned(fines, i, column.returned_col) {
                continue;
            }
            if let Some(item) = items
                .iter_mut()
                .find(|it| it.jersey_number == jersey && it.item == column.name)
            {
                item.status = UniformStatus::CheckedOut;
                item.player_name = Some(player.clone());
            }
        }
    }
}

pub fn parse_uniform_inventory(workbook: &Workbook) -> UniformInventory {
    let mut items = read_inventory(&inventory_sheet(workbook));
    if let Some(fines) = fines_sheet(workbook) {
        apply_fines(&mut items, &fines);
    }

    let count = |status: UniformStatus| items.iter().filter(|i| i.status == status).count();
    UniformInventory {
        total_items: items.len(),
        checked_out: count(UniformStatus::CheckedOut),
        returned: count(UniformStatus::Returned),
        missing: count(UniformStatus::Missing),
        available: count(UniformStatus::Available),
        items,
    }
}

pub fn parse_uniform_file(path: &Path) -> Result<UniformInventory, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_uniform_inventory(&workbook))
}
