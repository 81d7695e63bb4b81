//! Governance documents: board meeting agendas, minutes archive, bylaws and
//! compliance filings.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use super::agenda::structure_meeting_html;
use crate::error::IngestError;
use crate::processor::markup;
use crate::resolver::file_mtime;
use crate::types::{BoardMeeting, BylawsData, ComplianceDocument, MeetingMinutes};
use crate::util::{date_from_filename, date_key};

pub const BYLAWS_PLACEHOLDER: &str = "<p class='text-muted-foreground'>Unable to load bylaws document. Please ensure the file exists in the BOD Information folder.</p>";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Meeting date from an `M-D-YYYY` file name.
pub fn meeting_date(path: &Path) -> Option<NaiveDate> {
    let key = date_key(path)?;
    NaiveDate::parse_from_str(&key, "%m-%d-%Y").ok()
}

/// Long display date, e.g. "January 14, 2026".
pub fn meeting_label(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Convert and structure each dated agenda, most recent first. When
/// `featured` is non-empty only those ISO dates are kept. Files that fail
/// to convert are skipped.
pub fn collect_board_meetings<F>(paths: &[PathBuf], featured: &[String], convert: F) -> Vec<BoardMeeting>
where
    F: Fn(&Path) -> Result<String, IngestError>,
{
    let mut meetings: Vec<(NaiveDate, BoardMeeting)> = paths
        .iter()
        .filter_map(|path| {
            let date = meeting_date(path)?;
            let iso = date.format("%Y-%m-%d").to_string();
            if !featured.is_empty() && !featured.contains(&iso) {
                return None;
            }
            match convert(path) {
                Ok(raw) => Some((
                    date,
                    BoardMeeting {
                        label: meeting_label(date),
                        date: iso,
                        file_name: file_name(path),
                        html: structure_meeting_html(&raw),
                    },
                )),
                Err(e) => {
                    log::warn!("Board meetings: skipping {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    meetings.sort_by(|a, b| b.0.cmp(&a.0));
    meetings.into_iter().map(|(_, m)| m).collect()
}

pub fn parse_board_meetings(paths: &[PathBuf], featured: &[String]) -> Result<Vec<BoardMeeting>, IngestError> {
    Ok(collect_board_meetings(paths, featured, markup::to_markup))
}

/// Minutes and agendas on file, newest first. Undated files sort last.
pub fn list_meeting_minutes(paths: &[PathBuf]) -> Vec<MeetingMinutes> {
    let mut minutes: Vec<MeetingMinutes> = paths
        .iter()
        .map(|path| {
            let name = file_name(path);
            let date = date_from_filename(&name).unwrap_or_default();
            let year = date.get(..4).and_then(|y| y.parse().ok()).unwrap_or(0);
            MeetingMinutes {
                date,
                title: file_stem(path),
                file_name: name,
                year,
            }
        })
        .collect();
    minutes.sort_by(|a, b| b.date.cmp(&a.date));
    minutes
}

/// ISO date of a file's modification time, empty when unreadable.
pub fn last_modified_date(path: &Path) -> String {
    match file_mtime(path) {
        0 => String::new(),
        ms => DateTime::<Utc>::from_timestamp_millis(ms)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// Bylaws markup, with a placeholder when the document cannot be converted.
pub fn load_bylaws(path: &Path) -> BylawsData {
    let html_content = match markup::to_markup(path) {
        Ok(html) => html,
        Err(e) => {
            if e.is_missing() {
                log::info!("Bylaws not found at {}", path.display());
            } else {
                log::warn!("Bylaws could not be converted: {}", e);
            }
            BYLAWS_PLACEHOLDER.to_string()
        }
    };
    BylawsData {
        html_content,
        last_updated: last_modified_date(path),
        file_name: file_name(path),
    }
}

pub fn compliance_documents(paths: Vec<PathBuf>) -> Vec<ComplianceDocument> {
    paths
        .into_iter()
        .map(|path| ComplianceDocument {
            file_name: file_name(&path),
            path,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::markup::tests::{bold_para, para, write_docx};

    fn fake_convert(path: &Path) -> Result<String, IngestError> {
        if file_name(path).contains("broken") {
            Err(IngestError::Document("bad zip".into()))
        } else {
            Ok("<p>Agenda</p><p><strong>Call to Order</strong></p>".to_string())
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/agendas").join(n)).collect()
    }

    #[test]
    fn test_meeting_label() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        assert_eq!(meeting_label(d), "January 4, 2026");
        assert_eq!(meeting_date(Path::new("/a/Agenda 10-28-2025.docx")), NaiveDate::from_ymd_opt(2025, 10, 28));
        assert_eq!(meeting_date(Path::new("/a/Agenda.docx")), None);
    }

    #[test]
    fn test_board_meetings_sorted_and_filtered() {
        let files = paths(&[
            "Agenda 10-28-2025.docx",
            "Agenda 1-14-2026.docx",
            "Agenda 12-10-2025 broken.docx",
            "Undated Agenda.docx",
        ]);
        let all = collect_board_meetings(&files, &[], fake_convert);
        let labels: Vec<_> = all.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["January 14, 2026", "October 28, 2025"]);
        assert!(all[0].html.contains("agenda-section-header"));

        let featured = vec!["2025-10-28".to_string()];
        let only = collect_board_meetings(&files, &featured, fake_convert);
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].date, "2025-10-28");
    }

    #[test]
    fn test_minutes_listing() {
        let minutes = list_meeting_minutes(&paths(&[
            "Minutes 8_13_24.docx",
            "Minutes 10-28-2025.docx",
            "Notes.docx",
        ]));
        assert_eq!(minutes[0].date, "2025-10-28");
        assert_eq!(minutes[0].year, 2025);
        assert_eq!(minutes[1].title, "Minutes 8_13_24");
        assert_eq!(minutes[2].date, "");
        assert_eq!(minutes[2].year, 0);
    }

    #[test]
    fn test_bylaws_placeholder_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_bylaws(&dir.path().join("Bylaws.docx"));
        assert_eq!(missing.html_content, BYLAWS_PLACEHOLDER);
        assert_eq!(missing.last_updated, "");

        let body = format!("{}{}", bold_para("Article I"), para("Name"));
        let path = write_docx(dir.path(), "Bylaws 09_2025.docx", &body);
        let bylaws = load_bylaws(&path);
        assert_eq!(bylaws.html_content, "<p><strong>Article I</strong></p><p>Name</p>");
        assert_eq!(bylaws.file_name, "Bylaws 09_2025.docx");
        assert_eq!(bylaws.last_updated.len(), 10);
    }
}
