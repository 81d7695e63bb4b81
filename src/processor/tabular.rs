//! Spreadsheet access as plain 2-D grids.
//!
//! Workbooks are read eagerly with calamine into [`Grid`]s addressed by
//! absolute sheet coordinates (row 0 / column 0 is A1 even when the used
//! range starts later). Out-of-range reads return [`Cell::Empty`].

use std::path::Path;
use std::sync::OnceLock;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::IngestError;

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
pub const SPREADSHEET_EPOCH_OFFSET_DAYS: f64 = 25569.0;
pub const SECONDS_PER_DAY: f64 = 86400.0;

const EMPTY: Cell = Cell::Empty;

/// A normalized spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }

    /// Cell content as display text. Whole numbers render without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Trimmed display text.
    pub fn trimmed(&self) -> String {
        self.as_text().trim().to_string()
    }

    /// A blank cell, an empty string or a zero number.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(n) => *n == 0.0,
            Cell::Bool(b) => !b,
            Cell::Date(_) => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Rows of cells; rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string literals; numeric-looking strings stay text.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|s| if s.is_empty() { Cell::Empty } else { Cell::text(s) })
                        .collect()
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).trimmed()
    }

    pub fn number(&self, row: usize, col: usize) -> f64 {
        parse_number(self.cell(row, col))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

/// An opened workbook: every sheet, in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Open and fully read a spreadsheet container (.xlsx, .xls, .xlsm, .ods).
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        if !path.exists() {
            return Err(IngestError::NotFound(path.to_path_buf()));
        }
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| IngestError::Workbook(format!("{}: {}", path.display(), e)))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names().to_vec() {
            match workbook.worksheet_range(&name) {
                Ok(range) => {
                    let (row_offset, col_offset) = range
                        .start()
                        .map(|(r, c)| (r as usize, c as usize))
                        .unwrap_or((0, 0));
                    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
                    for row in range.rows() {
                        let mut cells = vec![Cell::Empty; col_offset];
                        cells.extend(row.iter().map(convert_cell));
                        rows.push(cells);
                    }
                    sheets.push(Sheet { name, grid: Grid::new(rows) });
                }
                Err(e) => {
                    log::warn!("Workbook {}: skipping sheet '{}': {}", path.display(), name, e);
                }
            }
        }

        Ok(Self { sheets })
    }

    pub fn from_sheets(sheets: Vec<(&str, Grid)>) -> Self {
        Self {
            sheets: sheets
                .into_iter()
                .map(|(name, grid)| Sheet { name: name.to_string(), grid })
                .collect(),
        }
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Grid for a named sheet, or the first sheet when `name` is `None`.
    /// An unknown name or an empty workbook yields an empty grid.
    pub fn sheet(&self, name: Option<&str>) -> Grid {
        let found = match name {
            Some(n) => self.sheets.iter().find(|s| s.name == n),
            None => self.sheets.first(),
        };
        found.map(|s| s.grid.clone()).unwrap_or_default()
    }

    pub fn first_sheet(&self) -> Grid {
        self.sheet(None)
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(_) => Cell::Empty,
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_date_str(s).map(Cell::Date).unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
    })
}

fn parenthesized_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"))
}

/// Numeric value of a cell. Text is cleaned of `$`, commas and whitespace;
/// parentheses mean negative; anything unparseable is 0.
pub fn parse_number(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_number_str(s),
        _ => 0.0,
    }
}

pub fn parse_number_str(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = parenthesized_re().replace(&cleaned, "-$1");
    leading_number_re()
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Convert a spreadsheet serial day number to a calendar date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let seconds = (serial - SPREADSHEET_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY;
    DateTime::from_timestamp(seconds.round() as i64, 0).map(|dt| dt.date_naive())
}

/// ISO date for a serial number; serials below 1000 are treated as non-dates.
pub fn serial_to_iso(serial: f64) -> String {
    if serial < 1000.0 {
        return String::new();
    }
    serial_to_date(serial)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

fn parse_date_str(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
                .map(|dt| dt.date())
        })
}

/// ISO `YYYY-MM-DD` for a date cell, a parseable date string or a serial
/// number; empty string otherwise.
pub fn parse_date(cell: &Cell) -> String {
    let date = match cell {
        Cell::Date(d) => Some(*d),
        Cell::Number(n) => serial_to_date(*n),
        Cell::Text(s) => parse_date_str(s),
        _ => None,
    };
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_currency_and_accounting() {
        assert_eq!(parse_number_str("$1,234"), 1234.0);
        assert_eq!(parse_number_str("(500)"), -500.0);
        assert_eq!(parse_number_str("$ (1,250.50)"), -1250.5);
        assert_eq!(parse_number_str(""), 0.0);
        assert_eq!(parse_number_str("n/a"), 0.0);
        assert_eq!(parse_number_str("12abc"), 12.0);
        assert_eq!(parse_number(&Cell::Number(42.5)), 42.5);
        assert_eq!(parse_number(&Cell::Empty), 0.0);
        assert_eq!(parse_number(&Cell::Bool(true)), 0.0);
    }

    #[test]
    fn test_serial_date_conversion() {
        assert_eq!(parse_date(&Cell::Number(45306.0)), "2024-01-15");
        assert_eq!(serial_to_iso(45306.0), "2024-01-15");
        assert_eq!(serial_to_iso(12.0), "");
    }

    #[test]
    fn test_parse_date_variants() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_date(&Cell::Date(d)), "2025-03-09");
        assert_eq!(parse_date(&Cell::text("3/9/2025")), "2025-03-09");
        assert_eq!(parse_date(&Cell::text("2025-03-09")), "2025-03-09");
        assert_eq!(parse_date(&Cell::text("March 9, 2025")), "2025-03-09");
        assert_eq!(parse_date(&Cell::text("sometime in spring")), "");
        assert_eq!(parse_date(&Cell::Empty), "");
    }

    #[test]
    fn test_grid_out_of_range_is_empty() {
        let grid = Grid::from_strs(&[&["a", "b"], &["c"]]);
        assert_eq!(grid.cell(1, 5), &Cell::Empty);
        assert_eq!(grid.cell(9, 0), &Cell::Empty);
        assert_eq!(grid.text(0, 1), "b");
        assert_eq!(grid.number(7, 7), 0.0);
        assert!(grid.row(42).is_empty());
    }

    #[test]
    fn test_cell_text_formats_whole_numbers() {
        assert_eq!(Cell::Number(12.0).as_text(), "12");
        assert_eq!(Cell::Number(12.5).as_text(), "12.5");
    }

    #[test]
    fn test_workbook_sheet_lookup() {
        let wb = Workbook::from_sheets(vec![
            ("First", Grid::from_strs(&[&["1"]])),
            ("Second", Grid::from_strs(&[&["2"]])),
        ]);
        assert_eq!(wb.sheet(None).text(0, 0), "1");
        assert_eq!(wb.sheet(Some("Second")).text(0, 0), "2");
        assert!(wb.sheet(Some("Missing")).is_empty());
    }

    #[test]
    fn test_open_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Workbook::open(&dir.path().join("nope.xlsx")).unwrap_err();
        assert!(missing.is_missing());

        let bad = dir.path().join("bad.xlsx");
        std::fs::write(&bad, b"not a zip archive").unwrap();
        let err = Workbook::open(&bad).unwrap_err();
        assert!(!err.is_missing());
    }
}
