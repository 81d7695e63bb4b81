//! Word document (.docx) to HTML-style markup.
//!
//! A DOCX is a ZIP archive; `word/document.xml` holds the body and
//! `word/styles.xml` maps style ids to display names. The body is walked
//! with quick-xml into paragraphs and tables, then rendered:
//!
//! - paragraph styles map to tags through a fixed table (Heading 1-3 → h1-h3,
//!   list styles and numbered paragraphs → li, grouped into one `<ul>`)
//! - adjacent runs with the same formatting are merged; bold → `<strong>`,
//!   italic → `<em>`
//! - tabs inside runs become `\t`, line breaks `<br />`
//! - empty paragraphs are dropped from markup
//!
//! Plain text is one paragraph per block followed by a blank line, with tabs
//! preserved (the roster scanner splits on them).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphKind {
    Normal,
    Heading(u8),
    ListItem,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
}

type Cell = Vec<Block>;
type Row = Vec<Cell>;

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Paragraph { kind: ParagraphKind, runs: Vec<Run> },
    Table(Vec<Row>),
}

impl Block {
    fn is_empty_paragraph(&self) -> bool {
        match self {
            Block::Paragraph { runs, .. } => runs.iter().all(|r| r.text.is_empty()),
            Block::Table(_) => false,
        }
    }

    fn is_list_item(&self) -> bool {
        matches!(
            self,
            Block::Paragraph {
                kind: ParagraphKind::ListItem,
                ..
            }
        )
    }
}

/// Map a style display name to a paragraph kind. Names compare
/// case-insensitively with spaces removed, so "Heading 1" and the bare id
/// "Heading1" agree.
fn kind_for_style(name: &str) -> Option<ParagraphKind> {
    let normalized: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    match normalized.as_str() {
        "heading1" | "title" => Some(ParagraphKind::Heading(1)),
        "heading2" | "subtitle" => Some(ParagraphKind::Heading(2)),
        "heading3" => Some(ParagraphKind::Heading(3)),
        "listparagraph" | "listbullet" | "listnumber" => Some(ParagraphKind::ListItem),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convert a .docx file to markup.
pub fn to_markup(path: &Path) -> Result<String, IngestError> {
    let blocks = read_blocks(path)?;
    let mut out = String::new();
    render_blocks(&blocks, &mut out);
    Ok(out)
}

/// Extract the raw text of a .docx file.
pub fn to_plain_text(path: &Path) -> Result<String, IngestError> {
    let blocks = read_blocks(path)?;
    let mut out = String::new();
    render_plain(&blocks, &mut out);
    Ok(out)
}

fn read_blocks(path: &Path) -> Result<Vec<Block>, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| IngestError::Document(format!("DOCX zip {}: {}", path.display(), e)))?;

    let styles = match archive.by_name("word/styles.xml") {
        Ok(mut entry) => {
            let mut xml = String::new();
            entry.read_to_string(&mut xml)?;
            parse_styles(&xml)
        }
        Err(_) => HashMap::new(),
    };

    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| IngestError::Document(format!("DOCX missing document.xml: {}", e)))?
        .read_to_string(&mut document)?;

    parse_document(&document, &styles)
}

// ---------------------------------------------------------------------------
// XML walking
// ---------------------------------------------------------------------------

fn attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Toggle properties (`<w:b/>`, `<w:i w:val="0"/>`) are on unless turned off.
fn toggle_on(e: &BytesStart) -> bool {
    !matches!(attr(e, b"val").as_deref(), Some("0") | Some("false") | Some("none"))
}

/// styleId → style name.
fn parse_styles(xml: &str) -> HashMap<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut styles = HashMap::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                current = attr(e, b"styleId");
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (current.as_ref(), attr(e, b"val")) {
                    styles.insert(id.clone(), name);
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("DOCX styles.xml unreadable, using style ids: {}", e);
                break;
            }
            _ => {}
        }
    }
    styles
}

struct OpenParagraph {
    style: Option<ParagraphKind>,
    numbered: bool,
    runs: Vec<Run>,
}

#[derive(Default)]
struct DocumentWalker<'a> {
    styles: Option<&'a HashMap<String, String>>,
    body: Vec<Block>,
    tables: Vec<Vec<Row>>,
    paragraph: Option<OpenParagraph>,
    run: Option<Run>,
    in_paragraph_props: bool,
    in_run_props: bool,
    in_text: bool,
}

impl<'a> DocumentWalker<'a> {
    fn push_block(&mut self, block: Block) {
        if let Some(cell) = self
            .tables
            .last_mut()
            .and_then(|t| t.last_mut())
            .and_then(|r| r.last_mut())
        {
            cell.push(block);
            return;
        }
        self.body.push(block);
    }

    fn style_kind(&self, style_id: &str) -> Option<ParagraphKind> {
        let name = self
            .styles
            .and_then(|s| s.get(style_id))
            .map(String::as_str)
            .unwrap_or(style_id);
        kind_for_style(name)
    }

    fn start(&mut self, e: &BytesStart, empty: bool) {
        match e.local_name().as_ref() {
            b"p" if !empty => {
                self.paragraph = Some(OpenParagraph {
                    style: None,
                    numbered: false,
                    runs: Vec::new(),
                });
            }
            b"pPr" if !empty => self.in_paragraph_props = true,
            b"pStyle" if self.in_paragraph_props => {
                let kind = attr(e, b"val").and_then(|id| self.style_kind(&id));
                if let Some(p) = self.paragraph.as_mut() {
                    p.style = kind;
                }
            }
            b"numPr" if self.in_paragraph_props => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.numbered = true;
                }
            }
            b"r" if !empty && self.paragraph.is_some() => self.run = Some(Run::default()),
            b"rPr" if !empty => self.in_run_props = true,
            b"b" if self.in_run_props => {
                if let Some(r) = self.run.as_mut() {
                    r.bold = toggle_on(e);
                }
            }
            b"i" if self.in_run_props => {
                if let Some(r) = self.run.as_mut() {
                    r.italic = toggle_on(e);
                }
            }
            b"t" if !empty => self.in_text = true,
            b"tab" if !self.in_run_props => {
                if let Some(r) = self.run.as_mut() {
                    r.text.push('\t');
                }
            }
            b"br" | b"cr" if !self.in_run_props => {
                if let Some(r) = self.run.as_mut() {
                    r.text.push('\n');
                }
            }
            b"tbl" if !empty => self.tables.push(Vec::new()),
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    table.push(Vec::new());
                }
            }
            b"tc" => {
                if let Some(row) = self.tables.last_mut().and_then(|t| t.last_mut()) {
                    row.push(Vec::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, local: &[u8]) {
        match local {
            b"pPr" => self.in_paragraph_props = false,
            b"rPr" => self.in_run_props = false,
            b"t" => self.in_text = false,
            b"r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.paragraph.as_mut()) {
                    p.runs.push(run);
                }
            }
            b"p" => {
                if let Some(p) = self.paragraph.take() {
                    let kind = match (p.style, p.numbered) {
                        (Some(ParagraphKind::Heading(n)), _) => ParagraphKind::Heading(n),
                        (Some(k), false) => k,
                        (_, true) => ParagraphKind::ListItem,
                        (None, false) => ParagraphKind::Normal,
                    };
                    self.push_block(Block::Paragraph { kind, runs: p.runs });
                }
            }
            b"tbl" => {
                if let Some(rows) = self.tables.pop() {
                    self.push_block(Block::Table(rows));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            if let Some(r) = self.run.as_mut() {
                r.text.push_str(text);
            }
        }
    }
}

fn parse_document(xml: &str, styles: &HashMap<String, String>) -> Result<Vec<Block>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = DocumentWalker {
        styles: Some(styles),
        ..Default::default()
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => walker.start(e, false),
            Ok(Event::Empty(ref e)) => walker.start(e, true),
            Ok(Event::End(ref e)) => walker.end(e.local_name().as_ref()),
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| IngestError::Document(format!("DOCX text: {}", err)))?;
                walker.text(&text);
            }
            Ok(Event::CData(ref e)) => walker.text(&String::from_utf8_lossy(e)),
            Ok(Event::Eof) => break,
            Err(e) => return Err(IngestError::Document(format!("DOCX XML: {}", e))),
            _ => {}
        }
    }

    Ok(walker.body)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

fn render_runs(runs: &[Run]) -> String {
    let mut merged: Vec<Run> = Vec::new();
    for run in runs.iter().filter(|r| !r.text.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.bold == run.bold && last.italic == run.italic => {
                last.text.push_str(&run.text)
            }
            _ => merged.push(run.clone()),
        }
    }

    merged
        .iter()
        .map(|r| {
            let mut html = escape_html(&r.text).replace('\n', "<br />");
            if r.italic {
                html = format!("<em>{}</em>", html);
            }
            if r.bold {
                html = format!("<strong>{}</strong>", html);
            }
            html
        })
        .collect()
}

fn render_blocks(blocks: &[Block], out: &mut String) {
    let mut in_list = false;
    for block in blocks.iter().filter(|b| !b.is_empty_paragraph()) {
        let is_item = block.is_list_item();
        if is_item && !in_list {
            out.push_str("<ul>");
            in_list = true;
        } else if !is_item && in_list {
            out.push_str("</ul>");
            in_list = false;
        }

        match block {
            Block::Paragraph { kind, runs } => {
                let tag = match kind {
                    ParagraphKind::Normal => "p".to_string(),
                    ParagraphKind::Heading(n) => format!("h{}", n),
                    ParagraphKind::ListItem => "li".to_string(),
                };
                out.push_str(&format!("<{tag}>{}</{tag}>", render_runs(runs)));
            }
            Block::Table(rows) => {
                out.push_str("<table>");
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        out.push_str("<td>");
                        render_blocks(cell, out);
                        out.push_str("</td>");
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</table>");
            }
        }
    }
    if in_list {
        out.push_str("</ul>");
    }
}

fn render_plain(blocks: &[Block], out: &mut String) {
    for block in blocks {
        match block {
            Block::Paragraph { runs, .. } => {
                for run in runs {
                    out.push_str(&run.text);
                }
                out.push_str("\n\n");
            }
            Block::Table(rows) => {
                for cell in rows.iter().flatten() {
                    render_plain(cell, out);
                }
            }
        }
    }
}
