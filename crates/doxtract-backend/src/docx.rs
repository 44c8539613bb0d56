//! DOCX (Microsoft Word) document reader
//!
//! Manual ZIP + XML parsing. DOCX files are ZIP archives containing:
//! - `word/document.xml`: Main content (paragraphs, tables, drawings)
//! - `word/styles.xml`: Style definitions (outline levels for headings)
//! - `word/_rels/document.xml.rels`: Relationships (image targets)
//! - `word/media/*`: Embedded image payloads
//! - `word/header*.xml`, `word/footer*.xml`: Header/footer parts
//! - `word/endnotes.xml`: Endnote text
//! - `docProps/core.xml`: Metadata (title, author, timestamps)
//!
//! The reader flattens the body into an ordered [`Element`] stream with
//! stable sequence indices and resolves image relationships to their
//! binary payloads. It never classifies: style ids and outline levels
//! travel on the elements as raw hints for the core classifier.

use crate::traits::{DocumentReader, RawDocument};
use chrono::{DateTime, Utc};
use doxtract_core::{
    DoxtractError, Element, ElementPayload, Endnote, HeaderFooter, HeaderFooterKind,
    ProcessingConfig, RawCell, Result, StyleHint,
};
use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Extract an attribute value by key from an element
#[inline]
fn get_attr(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Reader for `.docx` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxReader;

impl DocxReader {
    /// Create a reader.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Cheap validity probe: the archive opens and contains
    /// `word/document.xml`.
    #[must_use]
    pub fn is_valid_docx(path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let Ok(mut archive) = ZipArchive::new(file) else {
            return false;
        };
        let found = archive.by_name("word/document.xml").is_ok();
        found
    }

    fn read_archive<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        config: &ProcessingConfig,
    ) -> Result<RawDocument> {
        // word/document.xml is the one part that must exist.
        let document_xml = read_zip_string(archive, "word/document.xml")?.ok_or_else(|| {
            DoxtractError::Backend("missing word/document.xml; not a DOCX archive".to_string())
        })?;

        let relationships = read_zip_string(archive, "word/_rels/document.xml.rels")?
            .map(|xml| parse_relationships(&xml))
            .transpose()?
            .unwrap_or_default();

        let styles = read_zip_string(archive, "word/styles.xml")?
            .map(|xml| parse_styles_xml(&xml))
            .transpose()?
            .unwrap_or_default();

        let media = load_media(archive)?;

        let mut warnings = Vec::new();
        let elements = walk_body(
            &document_xml,
            &styles,
            &relationships,
            &media,
            config,
            &mut warnings,
        )?;
        debug!("read {} body elements", elements.len());

        let (headers_footers, endnote_list) = if config.include_headers_footers {
            (
                read_headers_footers(archive)?,
                read_zip_string(archive, "word/endnotes.xml")?
                    .map(|xml| parse_endnotes(&xml))
                    .transpose()?
                    .unwrap_or_default(),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        let (title, author, created, modified) = read_zip_string(archive, "docProps/core.xml")?
            .map_or((None, None, None, None), |xml| parse_core_metadata(&xml));

        Ok(RawDocument {
            elements,
            headers_footers,
            endnotes: endnote_list,
            title,
            author,
            created,
            modified,
            warnings,
        })
    }
}

impl DocumentReader for DocxReader {
    fn read_file(&self, path: &Path, config: &ProcessingConfig) -> Result<RawDocument> {
        let file = File::open(path).map_err(DoxtractError::Io)?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| DoxtractError::Backend(format!("failed to open DOCX as ZIP: {e}")))?;
        Self::read_archive(&mut archive, config)
    }

    fn read_bytes(&self, bytes: &[u8], config: &ProcessingConfig) -> Result<RawDocument> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DoxtractError::Backend(format!("failed to open DOCX as ZIP: {e}")))?;
        Self::read_archive(&mut archive, config)
    }
}

/// Read one archive entry as a UTF-8 string; `Ok(None)` when absent.
fn read_zip_string<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    let Ok(mut entry) = archive.by_name(name) else {
        return Ok(None);
    };
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(DoxtractError::Io)?;
    Ok(Some(content))
}

/// Parse `word/_rels/document.xml.rels` into id → target mappings
/// (e.g. "rId7" → "media/image1.png").
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut relationships = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let id = get_attr(&e, b"Id");
                let target = get_attr(&e, b"Target");
                if let (Some(id), Some(target)) = (id, target) {
                    relationships.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DoxtractError::Backend(format!(
                    "error parsing relationships: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Parse `word/styles.xml` into style id → 1-based outline level.
///
/// `w:outlineLvl` is 0-based in the file; level 0 means Heading 1.
fn parse_styles_xml(xml: &str) -> Result<HashMap<String, u8>> {
    let mut styles = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut current_style_id = String::new();
    let mut current_outline: Option<u8> = None;
    let mut in_style = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:style" => {
                in_style = true;
                current_outline = None;
                current_style_id = get_attr(&e, b"w:styleId").unwrap_or_default();
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:outlineLvl" && in_style => {
                current_outline = get_attr(&e, b"w:val")
                    .and_then(|v| v.parse::<u8>().ok())
                    .map(|level| level.saturating_add(1));
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => {
                if let Some(level) = current_outline {
                    if !current_style_id.is_empty() {
                        styles.insert(current_style_id.clone(), level);
                    }
                }
                in_style = false;
                current_style_id.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DoxtractError::Backend(format!(
                    "error parsing styles.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(styles)
}

/// Load every `word/media/*` payload up front, keyed by archive path.
fn load_media<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<HashMap<String, Vec<u8>>> {
    let names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("word/media/"))
        .map(String::from)
        .collect();

    let mut media = HashMap::with_capacity(names.len());
    for name in names {
        let mut entry = archive
            .by_name(&name)
            .map_err(|e| DoxtractError::Backend(format!("failed to read media {name}: {e}")))?;
        let mut data = Vec::new();
        entry.read_to_end(&mut data).map_err(DoxtractError::Io)?;
        media.insert(name, data);
    }
    Ok(media)
}

/// Paragraph accumulation state while walking the body.
#[derive(Debug, Default)]
struct ParagraphState {
    text: String,
    style_id: Option<String>,
    /// Relationship ids of images anchored in this paragraph.
    image_rel_ids: Vec<String>,
    /// Footnote/endnote reference ids in this paragraph.
    note_refs: Vec<String>,
}

/// Table cell accumulation state.
#[derive(Debug, Default)]
struct CellState {
    text: String,
    grid_span: usize,
    v_merge: Option<bool>,
}

/// Walk `word/document.xml` and emit the flat element stream.
#[allow(clippy::too_many_lines)] // single XML event loop, kept together
fn walk_body(
    xml: &str,
    styles: &HashMap<String, u8>,
    relationships: &HashMap<String, String>,
    media: &HashMap<String, Vec<u8>>,
    config: &ProcessingConfig,
    warnings: &mut Vec<String>,
) -> Result<Vec<Element>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut elements: Vec<Element> = Vec::new();
    let mut seq: usize = 0;

    let mut in_body = false;
    let mut in_text = false;
    // Nested tables are flattened into the enclosing cell's text.
    let mut table_depth = 0usize;

    let mut paragraph: Option<ParagraphState> = None;
    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    let mut current_row: Vec<RawCell> = Vec::new();
    let mut current_cell: Option<CellState> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:body" => in_body = true,
                b"w:p" if in_body => {
                    if table_depth == 0 {
                        paragraph = Some(ParagraphState::default());
                    }
                }
                b"w:tbl" if in_body => {
                    table_depth += 1;
                    if table_depth == 1 {
                        rows = Vec::new();
                    }
                }
                b"w:tr" if table_depth == 1 => current_row = Vec::new(),
                b"w:tc" if table_depth == 1 => {
                    current_cell = Some(CellState {
                        grid_span: 1,
                        ..CellState::default()
                    });
                }
                b"w:t" if in_body => in_text = true,
                // a:blip may carry children (a:extLst) and arrive as a
                // Start event rather than Empty
                b"a:blip" => {
                    if let (Some(p), Some(rel_id)) = (paragraph.as_mut(), get_attr(&e, b"r:embed"))
                    {
                        p.image_rel_ids.push(rel_id);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:pStyle" => {
                    if table_depth == 0 {
                        if let (Some(p), Some(style_id)) =
                            (paragraph.as_mut(), get_attr(&e, b"w:val"))
                        {
                            p.style_id = Some(style_id);
                        }
                    }
                }
                b"w:gridSpan" => {
                    if let (Some(cell), Some(span)) = (
                        current_cell.as_mut(),
                        get_attr(&e, b"w:val").and_then(|v| v.parse::<usize>().ok()),
                    ) {
                        cell.grid_span = span.max(1);
                    }
                }
                b"w:vMerge" => {
                    if let Some(cell) = current_cell.as_mut() {
                        // val="restart" opens a merge; absent or
                        // "continue" continues one.
                        let is_restart = get_attr(&e, b"w:val").as_deref() == Some("restart");
                        cell.v_merge = Some(is_restart);
                    }
                }
                b"a:blip" => {
                    if let (Some(p), Some(rel_id)) = (paragraph.as_mut(), get_attr(&e, b"r:embed"))
                    {
                        p.image_rel_ids.push(rel_id);
                    }
                }
                b"w:footnoteReference" | b"w:endnoteReference" => {
                    if let (Some(p), Some(id)) = (paragraph.as_mut(), get_attr(&e, b"w:id")) {
                        p.note_refs.push(id);
                    }
                }
                b"w:br" => {
                    if let Some(cell) = current_cell.as_mut() {
                        cell.text.push('\n');
                    } else if let Some(p) = paragraph.as_mut() {
                        p.text.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text: Cow<'_, str> = e.unescape().unwrap_or(Cow::Borrowed(""));
                if let Some(cell) = current_cell.as_mut() {
                    cell.text.push_str(&text);
                } else if let Some(p) = paragraph.as_mut() {
                    p.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:body" => in_body = false,
                b"w:t" => in_text = false,
                b"w:p" if in_body => {
                    if table_depth == 0 {
                        if let Some(p) = paragraph.take() {
                            emit_paragraph(
                                p,
                                styles,
                                relationships,
                                media,
                                config,
                                &mut elements,
                                &mut seq,
                                warnings,
                            );
                        }
                    } else if let Some(cell) = current_cell.as_mut() {
                        // Paragraph boundary inside a cell.
                        cell.text.push('\n');
                    }
                }
                b"w:tc" if table_depth == 1 => {
                    if let Some(cell) = current_cell.take() {
                        current_row.push(RawCell {
                            text: cell.text.trim().to_string(),
                            grid_span: cell.grid_span,
                            v_merge: cell.v_merge,
                        });
                    }
                }
                b"w:tr" if table_depth == 1 => {
                    rows.push(std::mem::take(&mut current_row));
                }
                b"w:tbl" if in_body => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 {
                        elements.push(Element {
                            seq,
                            style: StyleHint::none(),
                            payload: ElementPayload::Table {
                                rows: std::mem::take(&mut rows),
                            },
                        });
                        seq += 1;
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DoxtractError::Backend(format!(
                    "error parsing document.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(elements)
}

/// Emit a finished paragraph, then any images and note references
/// anchored in it, preserving document order.
#[allow(clippy::too_many_arguments)]
fn emit_paragraph(
    p: ParagraphState,
    styles: &HashMap<String, u8>,
    relationships: &HashMap<String, String>,
    media: &HashMap<String, Vec<u8>>,
    config: &ProcessingConfig,
    elements: &mut Vec<Element>,
    seq: &mut usize,
    warnings: &mut Vec<String>,
) {
    let has_text = !p.text.trim().is_empty();
    let has_style = p.style_id.is_some();

    if has_text || has_style {
        let outline_level = p
            .style_id
            .as_deref()
            .and_then(|id| styles.get(id))
            .copied();
        elements.push(Element {
            seq: *seq,
            style: StyleHint {
                style_name: p.style_id,
                outline_level,
            },
            payload: ElementPayload::Paragraph { text: p.text },
        });
        *seq += 1;
    }

    for rel_id in p.image_rel_ids {
        let Some(target) = relationships.get(&rel_id) else {
            warnings.push(format!("image relationship {rel_id} has no target"));
            continue;
        };
        let path = format!("word/{}", target.trim_start_matches('/'));
        let Some(data) = media.get(&path) else {
            warnings.push(format!("image payload {path} not found in archive"));
            continue;
        };
        if data.len() > config.max_image_bytes() {
            let warning = format!(
                "image {path} exceeds the {} MB cap and was skipped",
                config.max_image_size_mb
            );
            warn!("{warning}");
            warnings.push(warning);
            continue;
        }
        let format = target
            .rsplit('.')
            .next()
            .map_or_else(|| "bin".to_string(), str::to_lowercase);
        elements.push(Element {
            seq: *seq,
            style: StyleHint::none(),
            payload: ElementPayload::Image {
                data: data.clone(),
                format,
            },
        });
        *seq += 1;
    }

    for id in p.note_refs {
        elements.push(Element {
            seq: *seq,
            style: StyleHint::none(),
            payload: ElementPayload::FootnoteRef { id },
        });
        *seq += 1;
    }
}

/// Read and order header/footer parts.
fn read_headers_footers<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<HeaderFooter>> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| {
            (name.starts_with("word/header") || name.starts_with("word/footer"))
                && name.ends_with(".xml")
        })
        .map(String::from)
        .collect();
    names.sort();

    let mut parts = Vec::new();
    for name in names {
        let Some(xml) = read_zip_string(archive, &name)? else {
            continue;
        };
        let text = collect_text(&xml)?;
        if text.is_empty() {
            continue;
        }
        let kind = if name.starts_with("word/header") {
            HeaderFooterKind::Header
        } else {
            HeaderFooterKind::Footer
        };
        parts.push(HeaderFooter { kind, text });
    }
    Ok(parts)
}

/// Parse `word/endnotes.xml`. Ids below 1 are the separator and
/// continuation pseudo-notes and are skipped.
fn parse_endnotes(xml: &str) -> Result<Vec<Endnote>> {
    let mut endnotes = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:endnote" => {
                    current_id = get_attr(&e, b"w:id");
                    current_text.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().unwrap_or(Cow::Borrowed(""));
                current_text.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:endnote" => {
                    if let Some(id) = current_id.take() {
                        let is_pseudo = id.parse::<i64>().is_ok_and(|n| n < 1);
                        let text = current_text.trim().to_string();
                        if !is_pseudo && !text.is_empty() {
                            endnotes.push(Endnote { id, text });
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DoxtractError::Backend(format!(
                    "error parsing endnotes.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(endnotes)
}

/// Concatenate every `w:t` run in a part, space-separated.
fn collect_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => {
                in_text = false;
                out.push(' ');
            }
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().unwrap_or(Cow::Borrowed(""));
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DoxtractError::Backend(format!("error parsing part: {e}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(doxtract_core::text::normalize_whitespace(&out))
}

/// Extract title/author/created/modified from `docProps/core.xml`.
fn parse_core_metadata(
    xml: &str,
) -> (
    Option<String>,
    Option<String>,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
) {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut title = None;
    let mut author = None;
    let mut created = None;
    let mut modified = None;
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = match e.name().as_ref() {
                    b"dc:title" => Some("title"),
                    b"dc:creator" => Some("creator"),
                    b"dcterms:created" => Some("created"),
                    b"dcterms:modified" => Some("modified"),
                    _ => None,
                };
            }
            Ok(Event::Text(e)) => {
                if let Some(field) = current {
                    let text = e.unescape().unwrap_or(Cow::Borrowed("")).to_string();
                    match field {
                        "title" => title = Some(text),
                        "creator" => author = Some(text),
                        "created" => created = parse_w3c_datetime(&text),
                        "modified" => modified = parse_w3c_datetime(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    (title, author, created, modified)
}

fn parse_w3c_datetime(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_warnings() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0"?>
            <Relationships>
                <Relationship Id="rId1" Type="image" Target="media/image1.png"/>
                <Relationship Id="rId2" Type="styles" Target="styles.xml"/>
            </Relationships>"#;
        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.get("rId1").map(String::as_str), Some("media/image1.png"));
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_parse_styles_outline_levels() {
        let xml = r#"<w:styles>
            <w:style w:styleId="Heading1">
                <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
            </w:style>
            <w:style w:styleId="CorpTitle">
                <w:pPr><w:outlineLvl w:val="2"/></w:pPr>
            </w:style>
            <w:style w:styleId="Normal"><w:pPr/></w:style>
        </w:styles>"#;
        let styles = parse_styles_xml(xml).unwrap();
        // outlineLvl is 0-based in the file, 1-based in the hint
        assert_eq!(styles.get("Heading1"), Some(&1));
        assert_eq!(styles.get("CorpTitle"), Some(&3));
        assert!(!styles.contains_key("Normal"));
    }

    #[test]
    fn test_walk_body_paragraphs_and_styles() {
        let xml = r#"<w:document><w:body>
            <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
                <w:r><w:t>Intro</w:t></w:r></w:p>
            <w:p><w:r><w:t>Body </w:t></w:r><w:r><w:t>text</w:t></w:r></w:p>
            <w:p><w:r><w:t>   </w:t></w:r></w:p>
        </w:body></w:document>"#;
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::from([("Heading1".to_string(), 1u8)]),
            &HashMap::new(),
            &HashMap::new(),
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();

        // The whitespace-only paragraph is dropped.
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].style.style_name.as_deref(), Some("Heading1"));
        assert_eq!(elements[0].style.outline_level, Some(1));
        assert_eq!(elements[0].text(), Some("Intro"));
        assert_eq!(elements[1].text(), Some("Body text"));
        assert_eq!(elements[1].seq, 1);
    }

    #[test]
    fn test_walk_body_table_with_spans() {
        let xml = r#"<w:document><w:body>
            <w:tbl>
                <w:tr>
                    <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr>
                        <w:p><w:r><w:t>merged</w:t></w:r></w:p></w:tc>
                </w:tr>
                <w:tr>
                    <w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc>
                    <w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc>
                </w:tr>
            </w:tbl>
        </w:body></w:document>"#;
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(elements.len(), 1);
        let ElementPayload::Table { rows } = &elements[0].payload else {
            panic!("expected table payload");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].text, "merged");
        assert_eq!(rows[0][0].grid_span, 2);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1][1].text, "b");
    }

    #[test]
    fn test_walk_body_vmerge_states() {
        let xml = r#"<w:document><w:body>
            <w:tbl>
                <w:tr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr>
                    <w:p><w:r><w:t>span</w:t></w:r></w:p></w:tc></w:tr>
                <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr>
            </w:tbl>
        </w:body></w:document>"#;
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();
        let ElementPayload::Table { rows } = &elements[0].payload else {
            panic!("expected table payload");
        };
        assert_eq!(rows[0][0].v_merge, Some(true));
        assert_eq!(rows[1][0].v_merge, Some(false));
    }

    #[test]
    fn test_walk_body_image_anchor() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Figure follows</w:t></w:r>
                <w:r><w:drawing><a:blip r:embed="rId1"/></w:drawing></w:r></w:p>
        </w:body></w:document>"#;
        let rels = HashMap::from([("rId1".to_string(), "media/image1.png".to_string())]);
        let media = HashMap::from([("word/media/image1.png".to_string(), vec![0x89u8, 0x50])]);
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::new(),
            &rels,
            &media,
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), Some("Figure follows"));
        let ElementPayload::Image { data, format } = &elements[1].payload else {
            panic!("expected image payload");
        };
        assert_eq!(data, &vec![0x89u8, 0x50]);
        assert_eq!(format, "png");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_oversized_image_skipped_with_warning() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:drawing><a:blip r:embed="rId1"/></w:drawing></w:r></w:p>
        </w:body></w:document>"#;
        let rels = HashMap::from([("rId1".to_string(), "media/big.png".to_string())]);
        let media = HashMap::from([(
            "word/media/big.png".to_string(),
            vec![0u8; 2 * 1024 * 1024],
        )]);
        let config = ProcessingConfig {
            max_image_size_mb: 1,
            ..ProcessingConfig::default()
        };
        let mut warnings = no_warnings();
        let elements = walk_body(xml, &HashMap::new(), &rels, &media, &config, &mut warnings)
            .unwrap();

        assert!(elements.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("cap"));
    }

    #[test]
    fn test_missing_relationship_warns_and_continues() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>text</w:t><w:drawing><a:blip r:embed="rId9"/></w:drawing></w:r></w:p>
        </w:body></w:document>"#;
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_footnote_reference_emitted() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>claim</w:t></w:r>
                <w:r><w:endnoteReference w:id="2"/></w:r></w:p>
        </w:body></w:document>"#;
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(elements.len(), 2);
        assert!(matches!(
            &elements[1].payload,
            ElementPayload::FootnoteRef { id } if id == "2"
        ));
    }

    #[test]
    fn test_parse_endnotes_skips_pseudo_notes() {
        let xml = r#"<w:endnotes>
            <w:endnote w:id="-1"><w:p><w:r><w:t>separator</w:t></w:r></w:p></w:endnote>
            <w:endnote w:id="2"><w:p><w:r><w:t>real note</w:t></w:r></w:p></w:endnote>
        </w:endnotes>"#;
        let endnotes = parse_endnotes(xml).unwrap();
        assert_eq!(endnotes.len(), 1);
        assert_eq!(endnotes[0].id, "2");
        assert_eq!(endnotes[0].text, "real note");
    }

    #[test]
    fn test_parse_core_metadata() {
        let xml = r#"<cp:coreProperties>
            <dc:title>Annual Report</dc:title>
            <dc:creator>Jane Doe</dc:creator>
            <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-15T10:30:00Z</dcterms:created>
            <dcterms:modified xsi:type="dcterms:W3CDTF">2024-01-20T14:45:00Z</dcterms:modified>
        </cp:coreProperties>"#;
        let (title, author, created, modified) = parse_core_metadata(xml);
        assert_eq!(title.as_deref(), Some("Annual Report"));
        assert_eq!(author.as_deref(), Some("Jane Doe"));
        assert!(created.is_some());
        assert!(modified.unwrap() > created.unwrap());
    }

    #[test]
    fn test_nested_table_flattens_into_cell() {
        let xml = r#"<w:document><w:body>
            <w:tbl><w:tr><w:tc>
                <w:p><w:r><w:t>outer</w:t></w:r></w:p>
                <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
            </w:tc></w:tr></w:tbl>
        </w:body></w:document>"#;
        let mut warnings = no_warnings();
        let elements = walk_body(
            xml,
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            &ProcessingConfig::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(elements.len(), 1);
        let ElementPayload::Table { rows } = &elements[0].payload else {
            panic!("expected table payload");
        };
        assert!(rows[0][0].text.contains("outer"));
        assert!(rows[0][0].text.contains("inner"));
    }
}
