//! File resolver for the synced document tree.
//!
//! Maps logical document names to paths under the data root, finds files by
//! a simplified glob, and reports modification times. Folder names and file
//! name date patterns are fixed by the upstream Drive layout.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use regex::Regex;
use walkdir::WalkDir;

use crate::util::{date_key, first_wins_by_key};

/// Treasurer records folder.
pub const TREASURER_DIR: &str = "Treasurer";
/// Current-season agendas. Listed first so it wins date-key ties.
pub const AGENDA_DIR_CURRENT: &str = "2025-26 Board Meeting Agenda";
/// Legacy agenda folder kept by older syncs.
pub const AGENDA_DIR_LEGACY: &str = "2026 Board Meeting Agenda";
/// Historical minutes archive (the trailing space is part of the Drive folder name).
pub const SECRETARY_DIR: &str = "Secretary ";
pub const VOLUNTEER_DIR: &str = "Volunteers";

const HISTORICAL_BUDGET_PATTERN: &str = "THS Baseball Boosters Budget July 202*.xlsx";
const OLD_FORMAT_BUDGET_PATTERN: &str = "OLD FORMAT*THS Baseball Boosters Budget.xlsx";
const VOLUNTEER_PATTERN: &str = "2026*Team Needs.xlsx";

/// Documents with a fixed location in the synced tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalDoc {
    CurrentBudget,
    CoachsFund,
    SquareTransactions,
    Bylaws,
    UniformInventory,
    Rosters,
    FinancialReport,
    BodPositions,
}

impl LogicalDoc {
    pub const ALL: [LogicalDoc; 8] = [
        LogicalDoc::CurrentBudget,
        LogicalDoc::CoachsFund,
        LogicalDoc::SquareTransactions,
        LogicalDoc::Bylaws,
        LogicalDoc::UniformInventory,
        LogicalDoc::Rosters,
        LogicalDoc::FinancialReport,
        LogicalDoc::BodPositions,
    ];

    /// Path relative to the data root.
    pub fn relative_path(self) -> &'static str {
        match self {
            LogicalDoc::CurrentBudget => {
                "Treasurer/THS Baseball Boosters Budget July 2025-June 2026.xlsx"
            }
            LogicalDoc::CoachsFund => "Treasurer/Coach's Fund 25-26 Season.xlsx",
            LogicalDoc::SquareTransactions => {
                "Treasurer/Square Transactions/2025/Square 2025.xlsx"
            }
            LogicalDoc::Bylaws => "BOD Information/Bylaws 09_2025 Tahoma Baseball Boosters.docx",
            LogicalDoc::UniformInventory => {
                "Uniforms/EDITING 2026 Uniform Return & Inventory List.xlsx"
            }
            LogicalDoc::Rosters => "2025 Rosters.docx",
            LogicalDoc::FinancialReport => {
                "2026 Financial and Operations Report/2026 Financial and Operations Report Draft.docx"
            }
            LogicalDoc::BodPositions => "BOD Information/BOD Positions_Descriptions.xlsx",
        }
    }
}

/// Modification time in milliseconds since the epoch, or 0 if unreadable.
pub fn file_mtime(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Translate a file-name glob into a regex: `*` → `.*`, `?` → `.`, everything
/// else literal. The match is unanchored, as a substring test on the name.
pub fn glob_to_regex(pattern: &str) -> Regex {
    let mut re = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    // Every non-wildcard char is escaped, so the pattern always compiles.
    Regex::new(&re).unwrap_or_else(|_| Regex::new("$^").expect("valid regex"))
}

/// Recursively find files under `base_dir` whose name matches `pattern`.
///
/// Unreadable directories are skipped. Results are sorted.
pub fn find_files(pattern: &str, base_dir: &Path) -> Vec<PathBuf> {
    let re = glob_to_regex(pattern);
    let mut results: Vec<PathBuf> = WalkDir::new(base_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                log::debug!("Resolver: skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| e.file_name().to_str().is_some_and(|name| re.is_match(name)))
        .map(|e| e.into_path())
        .collect();
    results.sort();
    results
}

/// Merge candidate folders listed in preference order, keeping one file per
/// `M-D-YYYY` date key (or per file name when no date is present).
pub fn merge_dated_folders(folders: Vec<Vec<PathBuf>>) -> Vec<PathBuf> {
    let mut merged = first_wins_by_key(folders.into_iter().flatten(), |p| {
        date_key(p).unwrap_or_else(|| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    });
    merged.sort();
    merged
}

/// Resolves logical names and folder queries against one data root.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, doc: LogicalDoc) -> PathBuf {
        self.resolve_relative(doc.relative_path())
    }

    pub fn resolve_relative(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn find(&self, pattern: &str, relative_dir: &str) -> Vec<PathBuf> {
        find_files(pattern, &self.resolve_relative(relative_dir))
    }

    /// Year-stamped budget workbooks, standard and old-format names, sorted.
    pub fn historical_budget_files(&self) -> Vec<PathBuf> {
        let mut files = self.find(HISTORICAL_BUDGET_PATTERN, TREASURER_DIR);
        files.extend(self.find(OLD_FORMAT_BUDGET_PATTERN, TREASURER_DIR));
        files.sort();
        files.dedup();
        files
    }

    /// Agenda documents from the current and legacy folders, one per date.
    pub fn board_agenda_files(&self) -> Vec<PathBuf> {
        merge_dated_folders(vec![
            self.find("*.docx", AGENDA_DIR_CURRENT),
            self.find("*.docx", AGENDA_DIR_LEGACY),
        ])
    }

    /// Agenda and minutes documents, including the Secretary archive.
    pub fn meeting_minutes_files(&self) -> Vec<PathBuf> {
        merge_dated_folders(vec![
            self.find("*.docx", AGENDA_DIR_CURRENT),
            self.find("*.docx", AGENDA_DIR_LEGACY),
            self.find("*.docx", SECRETARY_DIR),
        ])
    }

    pub fn volunteer_files(&self) -> Vec<PathBuf> {
        self.find(VOLUNTEER_PATTERN, VOLUNTEER_DIR)
    }

    pub fn irs_documents(&self) -> Vec<PathBuf> {
        self.find("*.pdf", "Treasurer/IRS Documents")
    }

    pub fn wa_sos_documents(&self) -> Vec<PathBuf> {
        self.find("*.pdf", "Treasurer/WA Secretary of State")
    }

    pub fn insurance_documents(&self) -> Vec<PathBuf> {
        self.find("*.pdf", "Treasurer/Insurance Policy")
    }

    pub fn bank_rec_files(&self) -> Vec<PathBuf> {
        self.find("*.xlsx", "Treasurer/Bank Recs")
    }

    /// Latest mtime across the fixed logical documents, as a proxy for the
    /// last Drive sync.
    pub fn last_sync_time(&self) -> DateTime<Utc> {
        let latest = LogicalDoc::ALL
            .iter()
            .map(|doc| file_mtime(&self.resolve(*doc)))
            .max()
            .unwrap_or(0);
        DateTime::from_timestamp_millis(latest).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_glob_to_regex() {
        let re = glob_to_regex("2026*Team Needs.xlsx");
        assert!(re.is_match("2026 JV Blue Team Needs.xlsx"));
        assert!(!re.is_match("2025 JV Blue Team Needs.xlsx"));
        assert!(!re.is_match("2026 Team Needs_xlsx"));

        let re = glob_to_regex("Budget ?.xlsx");
        assert!(re.is_match("Budget A.xlsx"));
        assert!(!re.is_match("Budget AB.xlsx"));

        // Regex metacharacters in names are literal
        let re = glob_to_regex("Fund (old).xlsx");
        assert!(re.is_match("Fund (old).xlsx"));
        assert!(!re.is_match("Fund old.xlsx"));
    }

    #[test]
    fn test_find_files_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/Two.docx");
        touch(dir.path(), "a/One.docx");
        touch(dir.path(), "a/deep/Three.docx");
        touch(dir.path(), "a/Other.pdf");

        let found = find_files("*.docx", dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["One.docx", "Three.docx", "Two.docx"]);
    }

    #[test]
    fn test_find_files_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_files("*.docx", &dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_file_mtime_missing_is_zero() {
        assert_eq!(file_mtime(Path::new("/definitely/not/here.xlsx")), 0);
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "x.xlsx");
        assert!(file_mtime(&path) > 0);
    }

    #[test]
    fn test_agenda_merge_prefers_current_folder() {
        let dir = tempfile::tempdir().unwrap();
        let current = touch(dir.path(), "2025-26 Board Meeting Agenda/Agenda 1-14-2026.docx");
        touch(dir.path(), "2026 Board Meeting Agenda/Board Agenda 1-14-2026.docx");
        let legacy_only = touch(dir.path(), "2026 Board Meeting Agenda/Agenda 12-10-2025.docx");

        let resolver = FileResolver::new(dir.path());
        let files = resolver.board_agenda_files();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&current));
        assert!(files.contains(&legacy_only));
    }

    #[test]
    fn test_historical_budget_files_merge_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Treasurer/THS Baseball Boosters Budget July 2024-June 2025.xlsx");
        touch(dir.path(), "Treasurer/OLD FORMAT 2022 THS Baseball Boosters Budget.xlsx");
        touch(dir.path(), "Treasurer/Unrelated.xlsx");

        let resolver = FileResolver::new(dir.path());
        assert_eq!(resolver.historical_budget_files().len(), 2);
    }

    #[test]
    fn test_resolve_logical() {
        let resolver = FileResolver::new("/data");
        assert_eq!(
            resolver.resolve(LogicalDoc::Rosters),
            PathBuf::from("/data/2025 Rosters.docx")
        );
    }
}
