// WordprocessingML document model: the OPC zip package plus an owned element
// tree for word/document.xml. Only the main document part is parsed; every
// other package part is carried through untouched so the template's styles,
// numbering and media survive population byte-for-byte.
use anyhow::{anyhow, Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader as XmlReader, Writer as XmlWriter};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipArchive;

const DOCUMENT_ENTRY: &str = "word/document.xml";

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => self.name.as_str(),
        }
    }

    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            existing.1 = value.to_string();
            return;
        }
        self.attrs.push((name.to_string(), value.to_string()));
    }

    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text of all direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(text) = node {
                out.push_str(text);
            }
        }
        out
    }

    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        self.children.push(XmlNode::Text(text.to_string()));
    }
}

/// Styling applied to a run appended by the field writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub underline: bool,
}

impl RunStyle {
    pub const PLAIN: RunStyle = RunStyle {
        bold: false,
        underline: false,
    };
    pub const BOLD: RunStyle = RunStyle {
        bold: true,
        underline: false,
    };
    pub const UNDERLINE: RunStyle = RunStyle {
        bold: false,
        underline: true,
    };
}

/// A loaded .docx: ordered package entries plus the parsed main document.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    entries: Vec<(String, Vec<u8>)>,
    root: XmlElement,
}

impl DocxDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to open template {}", path.display()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).context("not a valid docx package")?;
        let mut entries = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }
        let document_xml = entries
            .iter()
            .find(|(name, _)| name == DOCUMENT_ENTRY)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| anyhow!("docx package has no {DOCUMENT_ENTRY}"))?;
        let xml = String::from_utf8(document_xml).context("document.xml is not UTF-8")?;
        let root = parse_document(&xml)?;
        Ok(Self { entries, root })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let document_xml = serialize_document(&self.root)?;
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        // Media entries are already compressed; store them as-is like Word does.
        let stored = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in &self.entries {
            let options = if name.starts_with("word/media/") {
                stored
            } else {
                deflated
            };
            zip.start_file(name.as_str(), options)?;
            if name == DOCUMENT_ENTRY {
                zip.write_all(&document_xml)?;
            } else {
                zip.write_all(data)?;
            }
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn body(&self) -> Result<&XmlElement> {
        self.root
            .child_elements()
            .find(|element| element.is("body"))
            .ok_or_else(|| anyhow!("document has no body"))
    }

    fn body_mut(&mut self) -> Result<&mut XmlElement> {
        self.root
            .child_elements_mut()
            .find(|element| element.is("body"))
            .ok_or_else(|| anyhow!("document has no body"))
    }

    /// Body-level paragraphs, in order. Paragraphs nested inside tables or
    /// text boxes are not included.
    pub fn paragraphs(&self) -> Vec<&XmlElement> {
        self.body()
            .map(|body| body.child_elements().filter(|el| el.is("p")).collect())
            .unwrap_or_default()
    }

    pub fn paragraphs_mut(&mut self) -> Vec<&mut XmlElement> {
        match self.body_mut() {
            Ok(body) => body
                .child_elements_mut()
                .filter(|el| el.is("p"))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Body-level tables, in order.
    pub fn tables(&self) -> Vec<&XmlElement> {
        self.body()
            .map(|body| body.child_elements().filter(|el| el.is("tbl")).collect())
            .unwrap_or_default()
    }

    /// Body-level table by position.
    pub fn table_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        self.body_mut()
            .ok()?
            .child_elements_mut()
            .filter(|el| el.is("tbl"))
            .nth(index)
    }

    /// Append an explicit page-break run to the last body paragraph, creating
    /// a paragraph to hold the break when the body has none.
    pub fn append_page_break(&mut self) -> Result<()> {
        let body = self.body_mut()?;
        let has_paragraph = body.child_elements().any(|el| el.is("p"));
        if !has_paragraph {
            body.push_element(XmlElement::new("w:p"));
        }
        let paragraph = body
            .child_elements_mut()
            .filter(|el| el.is("p"))
            .last()
            .expect("paragraph just ensured");
        let mut run = XmlElement::new("w:r");
        let mut brk = XmlElement::new("w:br");
        brk.set_attr("w:type", "page");
        run.push_element(brk);
        paragraph.push_element(run);
        Ok(())
    }

    /// Append every body-level node of `other` to this document's body,
    /// excluding section properties (which would introduce a blank page).
    pub fn append_body_from(&mut self, other: &DocxDocument) -> Result<()> {
        let incoming: Vec<XmlNode> = other
            .body()?
            .children
            .iter()
            .filter(|node| match node {
                XmlNode::Element(element) => !element.is("sectPr"),
                XmlNode::Text(_) => true,
            })
            .cloned()
            .collect();
        let body = self.body_mut()?;
        body.children.extend(incoming);
        Ok(())
    }

    /// Visit every text element (`w:t`) in the whole document, including ones
    /// inside text boxes and other constructs outside the normal flow.
    pub fn for_each_text_element(&mut self, mut visit: impl FnMut(&mut XmlElement)) {
        visit_text_elements(&mut self.root, &mut visit);
    }
}

fn visit_text_elements(element: &mut XmlElement, visit: &mut impl FnMut(&mut XmlElement)) {
    if element.is("t") {
        visit(element);
        return;
    }
    for child in element.child_elements_mut() {
        visit_text_elements(child, visit);
    }
}

/// Visible text of a paragraph: run text plus tabs and line breaks, the way
/// the printed form reads.
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut out = String::new();
    collect_text(paragraph, &mut out);
    out
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Text(_) => {}
            XmlNode::Element(child) => match child.local_name() {
                "t" => out.push_str(&child.text()),
                "tab" => out.push('\t'),
                "br" | "cr" => out.push('\n'),
                // Property blocks hold tab-stop definitions, not content.
                "pPr" | "rPr" => {}
                _ => collect_text(child, out),
            },
        }
    }
}

/// Remove a paragraph's content while keeping its paragraph properties.
pub fn clear_paragraph(paragraph: &mut XmlElement) {
    paragraph.children.retain(|node| match node {
        XmlNode::Element(element) => element.is("pPr"),
        XmlNode::Text(_) => false,
    });
}

/// Append a styled run. Tabs and newlines inside `text` become `w:tab` and
/// `w:br` elements; plain segments become `w:t` nodes.
pub fn add_run(paragraph: &mut XmlElement, text: &str, style: RunStyle) {
    let mut run = XmlElement::new("w:r");
    if style.bold || style.underline {
        let mut props = XmlElement::new("w:rPr");
        if style.bold {
            props.push_element(XmlElement::new("w:b"));
        }
        if style.underline {
            let mut underline = XmlElement::new("w:u");
            underline.set_attr("w:val", "single");
            props.push_element(underline);
        }
        run.push_element(props);
    }
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush_text_segment(&mut run, &mut segment);
                run.push_element(XmlElement::new("w:tab"));
            }
            '\n' => {
                flush_text_segment(&mut run, &mut segment);
                run.push_element(XmlElement::new("w:br"));
            }
            other => segment.push(other),
        }
    }
    flush_text_segment(&mut run, &mut segment);
    paragraph.push_element(run);
}

fn flush_text_segment(run: &mut XmlElement, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    let mut text = XmlElement::new("w:t");
    if segment.trim() != segment.as_str() {
        text.set_attr("xml:space", "preserve");
    }
    text.set_text(segment);
    segment.clear();
    run.push_element(text);
}

/// Table cell at (row, col), counting `w:tr`/`w:tc` children only.
pub fn table_cell_mut<'a>(
    table: &'a mut XmlElement,
    row: usize,
    col: usize,
) -> Option<&'a mut XmlElement> {
    let row = table
        .child_elements_mut()
        .filter(|el| el.is("tr"))
        .nth(row)?;
    row.child_elements_mut().filter(|el| el.is("tc")).nth(col)
}

pub fn table_row_count(table: &XmlElement) -> usize {
    table.child_elements().filter(|el| el.is("tr")).count()
}

pub fn table_row_cell_count(table: &XmlElement, row: usize) -> usize {
    table
        .child_elements()
        .filter(|el| el.is("tr"))
        .nth(row)
        .map(|row| row.child_elements().filter(|el| el.is("tc")).count())
        .unwrap_or(0)
}

/// Replace a cell's content with a single plain paragraph holding `text`.
/// Cell properties are kept; existing paragraphs are dropped.
pub fn set_cell_text(cell: &mut XmlElement, text: &str) {
    cell.children.retain(|node| match node {
        XmlNode::Element(element) => element.is("tcPr"),
        XmlNode::Text(_) => false,
    });
    let mut paragraph = XmlElement::new("w:p");
    add_run(&mut paragraph, text, RunStyle::PLAIN);
    cell.push_element(paragraph);
}

fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e, &reader)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| anyhow!("unbalanced end tag in document.xml"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().context("bad text node")?.into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(anyhow!("document.xml parse error: {err}")),
        }
        buf.clear();
    }

    root.ok_or_else(|| anyhow!("document.xml has no root element"))
}

fn element_from_start(
    e: &BytesStart<'_>,
    reader: &XmlReader<&[u8]>,
) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = XmlElement::new(&name);
    for attr in e.attributes().with_checks(false) {
        let attr = attr.context("bad attribute")?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader)
            .context("bad attribute value")?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_some() {
                return Err(anyhow!("multiple root elements in document.xml"));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn serialize_document(root: &XmlElement) -> Result<Vec<u8>> {
    let mut writer = XmlWriter::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write_element(&mut writer, root)?;
    Ok(writer.into_inner().into_inner())
}

fn write_element(writer: &mut XmlWriter<Cursor<Vec<u8>>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(nested) => write_element(writer, nested)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_BODY: &str = r#"<w:p><w:r><w:t>Mutual Fund:</w:t></w:r></w:p><w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#;

    fn docx_bytes(body: &str) -> Vec<u8> {
        crate::test_support::docx_package(body)
    }

    #[test]
    fn loads_paragraphs_and_preserves_foreign_entries() {
        let doc = DocxDocument::from_bytes(&docx_bytes(MINIMAL_BODY)).expect("load");
        let paragraphs = doc.paragraphs();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraph_text(paragraphs[0]), "Mutual Fund:");

        let bytes = doc.to_bytes().expect("serialize");
        let reread = DocxDocument::from_bytes(&bytes).expect("reload");
        let names: Vec<&str> = reread.entries.iter().map(|(name, _)| name.as_str()).collect();
        assert!(names.contains(&"[Content_Types].xml"));
        assert!(names.contains(&"word/document.xml"));
        // Untouched parts survive byte-for-byte.
        let original_rels = doc
            .entries
            .iter()
            .find(|(name, _)| name == "_rels/.rels")
            .map(|(_, data)| data.clone())
            .expect("rels entry");
        let rewritten_rels = reread
            .entries
            .iter()
            .find(|(name, _)| name == "_rels/.rels")
            .map(|(_, data)| data.clone())
            .expect("rels entry");
        assert_eq!(original_rels, rewritten_rels);
    }

    #[test]
    fn paragraph_text_renders_tabs_and_breaks() {
        let body = r#"<w:p><w:r><w:t>Mutual Fund</w:t><w:tab/><w:t>Date:</w:t><w:br/><w:t>end</w:t></w:r></w:p>"#;
        let doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        assert_eq!(paragraph_text(doc.paragraphs()[0]), "Mutual Fund\tDate:\nend");
    }

    #[test]
    fn tab_stop_definitions_do_not_leak_into_text() {
        let body = r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="4320"/></w:tabs></w:pPr><w:r><w:t>Mutual Fund:</w:t></w:r></w:p>"#;
        let doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        assert_eq!(paragraph_text(doc.paragraphs()[0]), "Mutual Fund:");
    }

    #[test]
    fn clear_keeps_paragraph_properties() {
        let body = r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>old</w:t></w:r></w:p>"#;
        let mut doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        if let Some(paragraph) = doc.paragraphs_mut().into_iter().next() {
            clear_paragraph(paragraph);
            add_run(paragraph, "new value", RunStyle::UNDERLINE);
        }
        let paragraph = doc.paragraphs()[0];
        assert!(paragraph.child_elements().any(|el| el.is("pPr")));
        assert_eq!(paragraph_text(paragraph), "new value");
        let run = paragraph
            .child_elements()
            .find(|el| el.is("r"))
            .expect("run");
        let props = run.child_elements().find(|el| el.is("rPr")).expect("rPr");
        assert!(props.child_elements().any(|el| el.is("u")));
        assert!(!props.child_elements().any(|el| el.is("b")));
    }

    #[test]
    fn styled_run_splits_tabs_into_elements() {
        let mut paragraph = XmlElement::new("w:p");
        add_run(&mut paragraph, "Fund\t\tDate: 01-01-2026", RunStyle::BOLD);
        let run = paragraph.child_elements().next().expect("run");
        let tabs = run.child_elements().filter(|el| el.is("tab")).count();
        assert_eq!(tabs, 2);
        let props = run.child_elements().find(|el| el.is("rPr")).expect("rPr");
        assert!(props.child_elements().any(|el| el.is("b")));
        assert_eq!(paragraph_text(&paragraph), "Fund\t\tDate: 01-01-2026");
    }

    #[test]
    fn leading_and_trailing_spaces_are_preserved() {
        let mut paragraph = XmlElement::new("w:p");
        add_run(&mut paragraph, "  Mutual Fund: ", RunStyle::BOLD);
        let run = paragraph.child_elements().next().expect("run");
        let text = run.child_elements().find(|el| el.is("t")).expect("w:t");
        assert_eq!(
            text.attrs.iter().find(|(key, _)| key == "xml:space").map(|(_, v)| v.as_str()),
            Some("preserve")
        );
        let bytes = serialize_document(&paragraph).expect("serialize");
        let xml = String::from_utf8(bytes).expect("utf8");
        assert!(xml.contains(r#"<w:t xml:space="preserve">  Mutual Fund: </w:t>"#));
    }

    #[test]
    fn page_break_lands_on_last_paragraph() {
        let body = r#"<w:p><w:r><w:t>one</w:t></w:r></w:p><w:p><w:r><w:t>two</w:t></w:r></w:p>"#;
        let mut doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        doc.append_page_break().expect("page break");
        let paragraphs = doc.paragraphs();
        let last = paragraphs.last().expect("last paragraph");
        let has_break = last.child_elements().any(|run| {
            run.is("r")
                && run.child_elements().any(|el| {
                    el.is("br")
                        && el.attrs.iter().any(|(key, value)| key == "w:type" && value == "page")
                })
        });
        assert!(has_break);
        // First paragraph untouched.
        assert_eq!(paragraph_text(paragraphs[0]), "one");
    }

    #[test]
    fn page_break_creates_paragraph_when_body_has_none() {
        let body = r#"<w:sectPr/>"#;
        let mut doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        doc.append_page_break().expect("page break");
        assert_eq!(doc.paragraphs().len(), 1);
    }

    #[test]
    fn append_body_skips_section_properties() {
        let mut target = DocxDocument::from_bytes(&docx_bytes(MINIMAL_BODY)).expect("load");
        let source = DocxDocument::from_bytes(&docx_bytes(
            r#"<w:p><w:r><w:t>second page</w:t></w:r></w:p><w:sectPr><w:pgSz w:w="1" w:h="1"/></w:sectPr>"#,
        ))
        .expect("load");
        target.append_body_from(&source).expect("append");
        assert_eq!(target.paragraphs().len(), 2);
        let sect_count = target
            .body()
            .expect("body")
            .child_elements()
            .filter(|el| el.is("sectPr"))
            .count();
        assert_eq!(sect_count, 1);
    }

    #[test]
    fn cell_text_replaces_content_and_keeps_cell_properties() {
        let body = r#"<w:tbl><w:tr><w:tc><w:tcPr><w:tcW w:w="100"/></w:tcPr><w:p><w:r><w:t>old</w:t></w:r></w:p><w:p/></w:tc></w:tr></w:tbl><w:p/>"#;
        let mut doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        {
            let table = doc.table_mut(0).expect("table");
            let cell = table_cell_mut(table, 0, 0).expect("cell");
            set_cell_text(cell, "12345/67");
        }
        let tables = doc.tables();
        let cell = tables[0]
            .child_elements()
            .find(|el| el.is("tr"))
            .and_then(|row| row.child_elements().find(|el| el.is("tc")))
            .expect("cell");
        assert!(cell.child_elements().any(|el| el.is("tcPr")));
        let cell_paragraphs: Vec<&XmlElement> =
            cell.child_elements().filter(|el| el.is("p")).collect();
        assert_eq!(cell_paragraphs.len(), 1);
        assert_eq!(paragraph_text(cell_paragraphs[0]), "12345/67");
    }

    #[test]
    fn text_visitor_reaches_nested_nodes() {
        let body = r#"<w:p><w:r><w:t>New ARN:</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>EUIN Name:</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        let mut doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        let mut seen = Vec::new();
        doc.for_each_text_element(|text| seen.push(text.text()));
        assert_eq!(seen, vec!["New ARN:".to_string(), "EUIN Name:".to_string()]);
    }

    #[test]
    fn escaped_characters_round_trip() {
        let body = r#"<w:p><w:r><w:t>Sub-Distributor&#8217;s ARN &amp; Code</w:t></w:r></w:p>"#;
        let doc = DocxDocument::from_bytes(&docx_bytes(body)).expect("load");
        assert_eq!(
            paragraph_text(doc.paragraphs()[0]),
            "Sub-Distributor\u{2019}s ARN & Code"
        );
        let bytes = doc.to_bytes().expect("serialize");
        let reread = DocxDocument::from_bytes(&bytes).expect("reload");
        assert_eq!(
            paragraph_text(reread.paragraphs()[0]),
            "Sub-Distributor\u{2019}s ARN & Code"
        );
    }
}
