//! Agenda structuring over converted markup.
//!
//! Converted agendas are a flat run of paragraphs, lists and tables. Section
//! headers are paragraphs that are bold from end to end. Everything before
//! the first header is meeting metadata (date, time, location, attendance);
//! each header owns the elements up to the next header.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{AgendaSection, StructuredAgenda};

/// Word autocorrects "2/5" and "3/4" into single fraction glyphs, which
/// breaks date ranges like "3/2-3/4".
const FRACTIONS: [(char, &str); 15] = [
    ('\u{00BD}', "1/2"),
    ('\u{2153}', "1/3"),
    ('\u{2154}', "2/3"),
    ('\u{00BC}', "1/4"),
    ('\u{00BE}', "3/4"),
    ('\u{2155}', "1/5"),
    ('\u{2156}', "2/5"),
    ('\u{2157}', "3/5"),
    ('\u{2158}', "4/5"),
    ('\u{2159}', "1/6"),
    ('\u{215A}', "5/6"),
    ('\u{215B}', "1/8"),
    ('\u{215C}', "3/8"),
    ('\u{215D}', "5/8"),
    ('\u{215E}', "7/8"),
];

const TITLE_MARKER: &str = "board meeting agenda";

fn leading_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<li>(\d[^<]*?)(\s*[-–]\s)").expect("valid regex"))
}

fn bold_paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^<p[^>]*>\s*<strong>(.*?)</strong>\s*</p>").expect("valid regex")
    })
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)&[a-z]+;").expect("valid regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

/// Replace fraction glyphs with ASCII `n/d`.
pub fn defractionate(html: &str) -> String {
    html.chars().fold(String::with_capacity(html.len()), |mut out, c| {
        match FRACTIONS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(c),
        }
        out
    })
}

/// Bold a leading date (`<li>3/2 - ...`) in list items that start with a
/// digit.
pub fn bold_leading_dates(html: &str) -> String {
    leading_date_re()
        .replace_all(html, "<li><strong>$1</strong>$2")
        .into_owned()
}

/// Split markup into its top-level elements. Text outside any element stays
/// attached to the preceding element; text before the first is dropped.
pub fn split_top_level(html: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut depth: usize = 0;
    let mut rest = html;
    let mut offset = 0;

    while let Some(pos) = rest.find('<') {
        let at = offset + pos;
        let Some(close) = html[at..].find('>') else {
            break;
        };
        let tag = &html[at..at + close + 1];

        if tag.starts_with("</") {
            depth = depth.saturating_sub(1);
        } else if !tag.ends_with("/>") && !tag.starts_with("<!") && !tag.starts_with("<?") {
            if depth == 0 {
                starts.push(at);
            }
            depth += 1;
        }

        offset = at + close + 1;
        rest = &html[offset..];
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            &html[start..end]
        })
        .collect()
}

/// A paragraph whose whole content is one bold span with visible text.
pub fn is_section_header(element: &str) -> bool {
    let Some(c) = bold_paragraph_re().captures(element) else {
        return false;
    };
    let inner = &c[1];
    if inner.contains("</strong>") {
        return false;
    }
    let without_entities = entity_re().replace_all(inner, "");
    !tag_re().replace_all(&without_entities, "").trim().is_empty()
}

/// Normalize and split agenda markup into metadata and sections.
pub fn structure_agenda(raw: &str) -> StructuredAgenda {
    let html = bold_leading_dates(&defractionate(raw));
    let elements = split_top_level(&html);

    let first_header = elements
        .iter()
        .position(|e| is_section_header(e))
        .unwrap_or(elements.len());
    let (meta, body) = elements.split_at(first_header);

    let skip_title = meta
        .first()
        .is_some_and(|e| e.to_lowercase().contains(TITLE_MARKER));
    let metadata = meta
        .iter()
        .skip(usize::from(skip_title))
        .map(|e| e.to_string())
        .collect();

    let mut sections: Vec<AgendaSection> = Vec::new();
    for element in body {
        if is_section_header(element) {
            sections.push(AgendaSection {
                header: element.to_string(),
                body: Vec::new(),
            });
        } else if let Some(section) = sections.last_mut() {
            section.body.push(element.to_string());
        }
    }

    StructuredAgenda { metadata, sections }
}

pub fn render_agenda(agenda: &StructuredAgenda) -> String {
    let mut out = String::new();
    if !agenda.metadata.is_empty() {
        out.push_str(&format!(
            r#"<div class="meeting-meta">{}</div>"#,
            agenda.metadata.concat()
        ));
    }
    for section in &agenda.sections {
        out.push_str(r#"<div class="agenda-section">"#);
        out.push_str(&format!(
            r#"<div class="agenda-section-header">{}</div>"#,
            section.header
        ));
        if !section.body.is_empty() {
            out.push_str(&format!(
                r#"<div class="agenda-section-body">{}</div>"#,
                section.body.concat()
            ));
        }
        out.push_str("</div>");
    }
    out
}

/// Structured agenda markup; markup with no elements passes through.
pub fn structure_meeting_html(raw: &str) -> String {
    let agenda = structure_agenda(raw);
    if agenda.metadata.is_empty() && agenda.sections.is_empty() && split_top_level(raw).is_empty() {
        return raw.to_string();
    }
    render_agenda(&agenda)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defractionate() {
        assert_eq!(defractionate("Games 3/2-3¾"), "Games 3/2-33/4");
        assert_eq!(defractionate("Tryouts ⅖"), "Tryouts 2/5");
        assert_eq!(defractionate("plain"), "plain");
    }

    #[test]
    fn test_bold_leading_dates() {
        assert_eq!(
            bold_leading_dates("<li>3/2 - First practice</li>"),
            "<li><strong>3/2</strong> - First practice</li>"
        );
        assert_eq!(
            bold_leading_dates("<li>10/14 – Banquet</li><li>No date here</li>"),
            "<li><strong>10/14</strong> – Banquet</li><li>No date here</li>"
        );
        // Already bold
        let bold = "<li><strong>3/2</strong> - Practice</li>";
        assert_eq!(bold_leading_dates(bold), bold);
    }

    #[test]
    fn test_fractions_run_before_date_bolding() {
        let html = "<ul><li>3/2-3¾ - Spring break</li></ul>";
        let agenda = structure_agenda(&format!("<p><strong>Calendar</strong></p>{}", html));
        assert_eq!(
            agenda.sections[0].body[0],
            "<ul><li><strong>3/2-33/4</strong> - Spring break</li></ul>"
        );
    }

    #[test]
    fn test_split_top_level_keeps_nesting() {
        let html = "<p>a</p><table><tr><td><p>x</p></td></tr></table><ul><li>b</li></ul><p>c<br />d</p>";
        let parts = split_top_level(html);
        assert_eq!(
            parts,
            vec![
                "<p>a</p>",
                "<table><tr><td><p>x</p></td></tr></table>",
                "<ul><li>b</li></ul>",
                "<p>c<br />d</p>"
            ]
        );
    }

    #[test]
    fn test_section_header_detection() {
        assert!(is_section_header("<p><strong>Treasurer Report</strong></p>"));
        assert!(is_section_header("<p> <strong>Old Business</strong> </p>"));
        assert!(!is_section_header("<p><strong>&nbsp;</strong></p>"));
        assert!(!is_section_header("<p><strong>Note:</strong> bring receipts</p>"));
        assert!(!is_section_header("<p><strong>A</strong> and <strong>B</strong></p>"));
        assert!(!is_section_header("<ul><li><strong>x</strong></li></ul>"));
    }

    #[test]
    fn test_structure_agenda() {
        let raw = concat!(
            "<p>THS Baseball Boosters Board Meeting Agenda</p>",
            "<p>January 14, 2026 at 7pm</p>",
            "<p>Library</p>",
            "<p><strong>Call to Order</strong></p>",
            "<p><strong>Treasurer Report</strong></p>",
            "<ul><li>Balance</li></ul>",
            "<p>Discussion</p>",
        );
        let agenda = structure_agenda(raw);
        assert_eq!(agenda.metadata, vec!["<p>January 14, 2026 at 7pm</p>", "<p>Library</p>"]);
        assert_eq!(agenda.sections.len(), 2);
        assert!(agenda.sections[0].body.is_empty());
        assert_eq!(agenda.sections[1].body.len(), 2);

        let html = render_agenda(&agenda);
        assert!(html.starts_with(r#"<div class="meeting-meta"><p>January 14"#));
        assert_eq!(html.matches(r#"<div class="agenda-section">"#).count(), 2);
        assert_eq!(html.matches("agenda-section-body").count(), 1);
    }

    #[test]
    fn test_no_headers_is_all_metadata() {
        let agenda = structure_agenda("<p>Only</p><p>text</p>");
        assert_eq!(agenda.metadata.len(), 2);
        assert!(agenda.sections.is_empty());
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(structure_meeting_html("no markup"), "no markup");
        assert_eq!(structure_meeting_html(""), "");
    }
}
