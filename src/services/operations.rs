//! Team operations accessors: rosters, uniforms, volunteers and raw
//! document text.

use std::path::PathBuf;
use std::sync::Arc;

use super::{load_or_default, Dashboard};
use crate::parsers::{roster, uniforms, volunteers};
use crate::processor::{extract, markup};
use crate::resolver::LogicalDoc;
use crate::types::{RosterData, UniformInventory, VolunteerSummary};

const VOLUNTEER_SUMMARY_KEY: &str = "volunteer-summary";

impl Dashboard {
    pub async fn rosters(&self) -> Arc<RosterData> {
        let this = self.clone();
        load_or_default("Rosters", move || {
            let path = this.resolver.resolve(LogicalDoc::Rosters);
            this.cache.cached_parse(&path, roster::parse_roster_file)
        })
        .await
    }

    /// The rosters document as markup, for display alongside the parsed
    /// lists.
    pub async fn roster_markup(&self) -> Arc<String> {
        let this = self.clone();
        load_or_default("Roster markup", move || {
            let path = this.resolver.resolve(LogicalDoc::Rosters);
            let key = format!("{}:html", path.display());
            this.cache.cached_parse_keyed(&key, &path, markup::to_markup)
        })
        .await
    }

    pub async fn uniform_inventory(&self) -> Arc<UniformInventory> {
        let this = self.clone();
        load_or_default("Uniform inventory", move || {
            let path = this.resolver.resolve(LogicalDoc::UniformInventory);
            this.cache.cached_parse(&path, uniforms::parse_uniform_file)
        })
        .await
    }

    pub async fn volunteer_summary(&self) -> Arc<VolunteerSummary> {
        let this = self.clone();
        load_or_default("Volunteer needs", move || {
            let paths = this.resolver.volunteer_files();
            this.cache.cached_multi_parse(
                &paths,
                volunteers::parse_volunteer_files,
                VOLUNTEER_SUMMARY_KEY,
            )
        })
        .await
    }

    /// Plain text of any document under the data root.
    pub async fn document_text(&self, relative: &str) -> Arc<String> {
        let this = self.clone();
        let path: PathBuf = self.resolver.resolve_relative(relative);
        load_or_default("Document text", move || {
            let key = format!("{}:text", path.display());
            this.cache.cached_parse_keyed(&key, &path, extract::to_plain_text)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{dashboard_at, touch};
    use super::*;
    use crate::processor::markup::tests::{bold_para, para, write_docx};

    const PLAYER_ROW: &str =
        r#"<w:p><w:r><w:t>Alex Smith</w:t><w:tab/><w:t>7</w:t><w:tab/><w:t>12</w:t></w:r></w:p>"#;

    #[tokio::test]
    async fn test_rosters_and_markup_share_source() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{}{}{}{}", bold_para("Varsity"), PLAYER_ROW, para("JV Gold"), para("Dan Wu"));
        write_docx(dir.path(), LogicalDoc::Rosters.relative_path(), &body);
        let dashboard = dashboard_at(dir.path());

        let first = dashboard.rosters().await;
        assert_eq!(first.varsity.len(), 1);
        assert_eq!(first.jv_gold.len(), 1);
        assert!(Arc::ptr_eq(&first, &dashboard.rosters().await));

        let html = dashboard.roster_markup().await;
        assert!(html.starts_with("<p><strong>Varsity</strong></p>"));
        assert_eq!(dashboard.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_operations_sources() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());

        assert_eq!(*dashboard.rosters().await, RosterData::default());
        assert!(dashboard.roster_markup().await.is_empty());
        assert_eq!(*dashboard.uniform_inventory().await, UniformInventory::default());
        assert_eq!(dashboard.volunteer_summary().await.total_needs, 0);
    }

    #[tokio::test]
    async fn test_document_text() {
        let dir = tempfile::tempdir().unwrap();
        let notes = touch(dir.path(), "Secretary /notes.txt");
        std::fs::write(&notes, "Board notes").unwrap();
        let dashboard = dashboard_at(dir.path());

        assert_eq!(*dashboard.document_text("Secretary /notes.txt").await, "Board notes");
        assert!(dashboard.document_text("Secretary /missing.txt").await.is_empty());
        touch(dir.path(), "Uniforms/photo.png");
        assert!(dashboard.document_text("Uniforms/photo.png").await.is_empty());
    }
}
