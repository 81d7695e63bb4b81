//! Board governance accessors: agendas, minutes, bylaws and compliance
//! filings.

use std::sync::Arc;

use super::{load_or_default, Dashboard};
use crate::error::IngestError;
use crate::parsers::meetings;
use crate::resolver::LogicalDoc;
use crate::types::{BoardMeeting, BylawsData, ComplianceDocuments, MeetingMinutes};

const BOARD_MEETINGS_KEY: &str = "board-meetings";
const MEETING_MINUTES_KEY: &str = "meeting-minutes";

impl Dashboard {
    /// Structured agendas, most recent first.
    pub async fn board_meetings(&self) -> Arc<Vec<BoardMeeting>> {
        let this = self.clone();
        load_or_default("Board meetings", move || {
            let paths = this.resolver.board_agenda_files();
            let featured = &this.config.featured_meeting_dates;
            this.cache.cached_multi_parse(
                &paths,
                |paths| meetings::parse_board_meetings(paths, featured),
                BOARD_MEETINGS_KEY,
            )
        })
        .await
    }

    pub async fn meeting_minutes(&self) -> Arc<Vec<MeetingMinutes>> {
        let this = self.clone();
        load_or_default("Meeting minutes", move || {
            let paths = this.resolver.meeting_minutes_files();
            this.cache.cached_multi_parse(
                &paths,
                |paths| Ok::<_, IngestError>(meetings::list_meeting_minutes(paths)),
                MEETING_MINUTES_KEY,
            )
        })
        .await
    }

    pub async fn bylaws(&self) -> Arc<BylawsData> {
        let this = self.clone();
        load_or_default("Bylaws", move || {
            let path = this.resolver.resolve(LogicalDoc::Bylaws);
            this.cache
                .cached_parse(&path, |p| Ok::<_, IngestError>(meetings::load_bylaws(p)))
        })
        .await
    }

    /// Filings on record, listed fresh on every call.
    pub async fn compliance_documents(&self) -> Arc<ComplianceDocuments> {
        let resolver = self.resolver.clone();
        load_or_default("Compliance documents", move || {
            Ok(Arc::new(ComplianceDocuments {
                irs: meetings::compliance_documents(resolver.irs_documents()),
                wa_sos: meetings::compliance_documents(resolver.wa_sos_documents()),
                insurance: meetings::compliance_documents(resolver.insurance_documents()),
                bank_recs: meetings::compliance_documents(resolver.bank_rec_files()),
            }))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{dashboard_at, touch};
    use super::*;
    use crate::processor::markup::tests::{bold_para, para, write_docx};
    use crate::resolver::{AGENDA_DIR_CURRENT, AGENDA_DIR_LEGACY, SECRETARY_DIR};
    use crate::types::Config;

    fn agenda_body() -> String {
        format!(
            "{}{}{}{}",
            para("Board Meeting Agenda"),
            para("7pm, Library"),
            bold_para("Treasurer Report"),
            para("Balances reviewed")
        )
    }

    fn seed_agendas(root: &std::path::Path) {
        let current = root.join(AGENDA_DIR_CURRENT);
        let legacy = root.join(AGENDA_DIR_LEGACY);
        std::fs::create_dir_all(&current).unwrap();
        std::fs::create_dir_all(&legacy).unwrap();
        write_docx(&current, "Agenda 1-14-2026.docx", &agenda_body());
        write_docx(&legacy, "Agenda 1-14-2026 copy.docx", &para("stale"));
        write_docx(&legacy, "Agenda 10-28-2025.docx", &agenda_body());
    }

    #[tokio::test]
    async fn test_board_meetings_merge_folders() {
        let dir = tempfile::tempdir().unwrap();
        seed_agendas(dir.path());
        let dashboard = dashboard_at(dir.path());

        let meetings = dashboard.board_meetings().await;
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[0].label, "January 14, 2026");
        assert_eq!(meetings[0].file_name, "Agenda 1-14-2026.docx");
        assert!(meetings[0].html.contains("agenda-section-header"));
        assert!(meetings[0].html.contains("7pm, Library"));
        assert!(!meetings[0].html.contains("Board Meeting Agenda"));
        assert_eq!(meetings[1].date, "2025-10-28");
    }

    #[tokio::test]
    async fn test_featured_dates_filter() {
        let dir = tempfile::tempdir().unwrap();
        seed_agendas(dir.path());
        let dashboard = Dashboard::new(Config {
            data_dir: dir.path().to_path_buf(),
            featured_meeting_dates: vec!["2025-10-28".to_string()],
            ..Config::default()
        });

        let meetings = dashboard.board_meetings().await;
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].label, "October 28, 2025");
    }

    #[tokio::test]
    async fn test_minutes_include_secretary_archive() {
        let dir = tempfile::tempdir().unwrap();
        seed_agendas(dir.path());
        touch(dir.path(), &format!("{}/Minutes 8_13_24.docx", SECRETARY_DIR));
        let dashboard = dashboard_at(dir.path());

        let minutes = dashboard.meeting_minutes().await;
        let dates: Vec<&str> = minutes.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-14", "2025-10-28", "2024-08-13"]);
    }

    #[tokio::test]
    async fn test_bylaws_placeholder_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());
        let bylaws = dashboard.bylaws().await;
        assert_eq!(bylaws.html_content, meetings::BYLAWS_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_compliance_documents_by_folder() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Treasurer/IRS Documents/990N 2025.pdf");
        touch(dir.path(), "Treasurer/IRS Documents/notes.txt");
        touch(dir.path(), "Treasurer/Insurance Policy/Policy 2026.pdf");
        touch(dir.path(), "Treasurer/Bank Recs/Rec Jan.xlsx");
        let dashboard = dashboard_at(dir.path());

        let docs = dashboard.compliance_documents().await;
        assert_eq!(docs.irs.len(), 1);
        assert_eq!(docs.irs[0].file_name, "990N 2025.pdf");
        assert!(docs.wa_sos.is_empty());
        assert_eq!(docs.insurance.len(), 1);
        assert_eq!(docs.bank_recs.len(), 1);
    }
}
