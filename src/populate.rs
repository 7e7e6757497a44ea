// Template population: locate labeled fields in a loaded form, write styled
// values into them, and compose one output page per record (or per group of
// records for the tabular form).
//
// The templates carry no placeholder syntax; fields are found by matching
// the form's own printed labels. A label that cannot be found is skipped so
// that template wording drift degrades to a blank field instead of failing
// the whole batch.
use crate::docx::{
    add_run, clear_paragraph, paragraph_text, set_cell_text, table_cell_mut,
    table_row_cell_count, table_row_count, DocxDocument, RunStyle,
};
use crate::records::CanonicalRecord;
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::{debug, warn};

/// The tabular form groups this many records on one physical page.
pub const RECORDS_PER_PAGE: usize = 6;

/// Header fund label when a page's records span more than one scheme.
const MULTIPLE_FUNDS_LABEL: &str = "Multiple";

const FOLIO_PAN_SPACER: &str = "                                                                                                          ";
const ACK_RECEIPT_SPACER: &str = "                               \t\t                                       Date of Receipt:\t";

/// Accepted spellings for each free-floating label of the tabular form.
/// Historical template revisions reworded several of them; every variant
/// maps to the same logical field.
const NEW_BROKER_CODE_LABELS: &[&str] = &["New ARN-.", "New ARN:", "New ARN -"];
const SUB_BROKER_CODE_LABELS: &[&str] = &["Sub-Distributor's ARN"];
const ADVISOR_CODE_LABELS: &[&str] = &["EUIN No.: E", "EUIN No.:", "EUIN No:", "EUIN No", "EUIN"];
const NEW_BROKER_NAME_LABELS: &[&str] = &["ARN Name:"];
const SUB_BROKER_NAME_LABELS: &[&str] = &["Sub-Distributor's name :"];
const ADVISOR_NAME_LABELS: &[&str] = &["EUIN Name:"];
const SIGNATURE_LABELS: &[&str] = &[
    "Signature of ARN/EUIN Holder:",
    "Signature of ARN/ EUIN Holder:",
];
const STAFF_INFO_LABELS: &[&str] = &[
    "Name, Designation, Employee code of new distributor (if non individual)",
    "Name, Designation, Employee code of new distributor",
];

/// Advisor-code labels already end in the single-letter prefix; replacement
/// must re-synthesize the label to avoid doubling it.
const PREFIXED_ADVISOR_LABEL: &str = "EUIN No.: E";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Older single-record-per-page form, labels as standalone paragraphs.
    Legacy,
    /// Current tabular form, up to six records per page.
    Current,
}

/// Structural signature: the tabular form has at least three body tables, or
/// a header paragraph carrying both the fund and date tokens.
pub fn detect_template_kind(doc: &DocxDocument) -> TemplateKind {
    let has_signature = doc.tables().len() >= 3
        || doc.paragraphs().iter().any(|paragraph| {
            let text = paragraph_text(paragraph);
            text.contains("Mutual Fund") && text.contains("Date")
        });
    if has_signature {
        TemplateKind::Current
    } else {
        TemplateKind::Legacy
    }
}

/// Fill one legacy page. Each located label paragraph is rewritten as a bold
/// label run followed by an underlined value run.
pub fn populate_legacy_page(doc: &mut DocxDocument, record: &CanonicalRecord) {
    let mut fields_populated = 0usize;
    for paragraph in doc.paragraphs_mut() {
        let text = paragraph_text(paragraph);
        let trimmed = text.trim();
        if trimmed == "Mutual Fund:" {
            clear_paragraph(paragraph);
            add_run(paragraph, "  Mutual Fund: ", RunStyle::BOLD);
            add_run(paragraph, &record.scheme_name, RunStyle::UNDERLINE);
            fields_populated += 1;
        } else if text.contains("Folio No:*") && text.contains("PAN:*") {
            clear_paragraph(paragraph);
            add_run(paragraph, "      Folio No:* ", RunStyle::BOLD);
            add_run(paragraph, &record.folio_number, RunStyle::UNDERLINE);
            add_run(paragraph, FOLIO_PAN_SPACER, RunStyle::PLAIN);
            add_run(paragraph, "PAN:* ", RunStyle::BOLD);
            add_run(paragraph, &record.pan_number, RunStyle::UNDERLINE);
            fields_populated += 1;
        } else if trimmed == "Investor [First Holder only]:" {
            clear_paragraph(paragraph);
            add_run(paragraph, "  Investor [First Holder only]: ", RunStyle::BOLD);
            add_run(paragraph, record.investor_name.trim(), RunStyle::UNDERLINE);
            fields_populated += 1;
        } else if trimmed == "Mutual Fund :" {
            // Acknowledgement slip at the bottom of the form.
            clear_paragraph(paragraph);
            add_run(paragraph, "Mutual Fund : ", RunStyle::BOLD);
            add_run(paragraph, &record.scheme_name, RunStyle::UNDERLINE);
            fields_populated += 1;
        } else if text.contains("Folio No :") && text.contains("Date of Receipt:") {
            clear_paragraph(paragraph);
            add_run(paragraph, "Folio No : ", RunStyle::BOLD);
            add_run(paragraph, &record.folio_number, RunStyle::UNDERLINE);
            add_run(paragraph, ACK_RECEIPT_SPACER, RunStyle::PLAIN);
            fields_populated += 1;
        }
    }
    debug!("legacy page populated, {fields_populated} field(s) written");
}

/// Fill one tabular-form page with up to six records. Header fields come
/// from the chunk's first record; the fund line shows the shared scheme name
/// when the chunk is uniform and a fixed marker otherwise.
pub fn populate_current_page(doc: &mut DocxDocument, chunk: &[CanonicalRecord]) -> Result<()> {
    let first = chunk
        .first()
        .ok_or_else(|| anyhow!("cannot populate a page from an empty record group"))?;
    let header_fund = chunk_fund_name(chunk);

    for paragraph in doc.paragraphs_mut() {
        let text = paragraph_text(paragraph);
        let trimmed = text.trim().to_string();
        if trimmed.contains("Mutual Fund") && trimmed.contains("Date") {
            clear_paragraph(paragraph);
            add_run(
                paragraph,
                &format!("{header_fund} Mutual Fund\t\t\t\tDate: {}", first.date),
                RunStyle::PLAIN,
            );
        } else if trimmed.starts_with("Date:") && !trimmed.contains("Mutual Fund") {
            clear_paragraph(paragraph);
            add_run(paragraph, &format!("Date: {}", first.date), RunStyle::PLAIN);
        } else if trimmed.to_lowercase().starts_with("place") {
            clear_paragraph(paragraph);
            add_run(paragraph, &format!("Place: {}", first.place), RunStyle::PLAIN);
        }
    }

    let replacements: Vec<(&[&str], &str)> = vec![
        (NEW_BROKER_CODE_LABELS, first.new_broker_code.as_str()),
        (SUB_BROKER_CODE_LABELS, first.new_sub_broker_code.as_str()),
        (ADVISOR_CODE_LABELS, first.new_advisor_code.as_str()),
        (NEW_BROKER_NAME_LABELS, first.new_broker_name.as_str()),
        // The sub-distributor name slot stays blank; only ink fills it.
        (SUB_BROKER_NAME_LABELS, ""),
        (ADVISOR_NAME_LABELS, first.advisor_name.as_str()),
        (SIGNATURE_LABELS, first.signature_holder_info.as_str()),
        (STAFF_INFO_LABELS, first.staff_info.as_str()),
    ];
    replace_labeled_text(doc, &replacements);

    fill_folio_table(doc, chunk);
    fill_broker_table(doc, first);
    fill_holders_table(doc, first);
    Ok(())
}

fn chunk_fund_name(chunk: &[CanonicalRecord]) -> String {
    let first = match chunk.first() {
        Some(record) => record.scheme_name.as_str(),
        None => return String::new(),
    };
    if chunk.iter().all(|record| record.scheme_name == first) {
        first.to_string()
    } else {
        MULTIPLE_FUNDS_LABEL.to_string()
    }
}

/// Replace free-floating label text nodes anywhere in the document,
/// including inside text boxes. A node is replaced only when its trimmed
/// text equals one of the label's variants exactly, which keeps an already
/// filled-in form from being filled twice.
fn replace_labeled_text(doc: &mut DocxDocument, replacements: &[(&[&str], &str)]) {
    let mut replaced = 0usize;
    doc.for_each_text_element(|node| {
        let current = node.text().replace('\u{a0}', " ");
        let current = current.trim();
        for (variants, value) in replacements {
            if let Some(token) = variants.iter().find(|token| current == token.trim()) {
                let token = token.trim();
                if token.contains(PREFIXED_ADVISOR_LABEL) {
                    node.set_text(&format!("EUIN No.: {value}"));
                } else {
                    node.set_text(&format!("{token} {value}"));
                }
                replaced += 1;
                return;
            }
        }
    });
    debug!("replaced {replaced} labeled text node(s)");
}

/// Table 0: folio/scheme list, one data row per record below the header row.
fn fill_folio_table(doc: &mut DocxDocument, chunk: &[CanonicalRecord]) {
    let table = match doc.table_mut(0) {
        Some(table) => table,
        None => {
            debug!("folio table missing, skipping");
            return;
        }
    };
    let rows = table_row_count(table);
    for (index, record) in chunk.iter().take(RECORDS_PER_PAGE).enumerate() {
        let row = index + 1;
        if row >= rows {
            debug!("folio table has no row {row}, skipping remaining records");
            break;
        }
        if let Some(cell) = table_cell_mut(table, row, 0) {
            set_cell_text(cell, &record.folio_number);
        }
        if let Some(cell) = table_cell_mut(table, row, 1) {
            set_cell_text(cell, &record.scheme_name);
        }
    }
}

/// Table 1: the broker detail row, left to right: old code/name, new
/// code/name, sub-broker, advisor code.
fn fill_broker_table(doc: &mut DocxDocument, record: &CanonicalRecord) {
    let table = match doc.table_mut(1) {
        Some(table) => table,
        None => {
            debug!("broker table missing, skipping");
            return;
        }
    };
    if table_row_count(table) < 2 || table_row_cell_count(table, 1) < 6 {
        debug!("broker table has unexpected shape, skipping");
        return;
    }
    let values = [
        record.old_broker_code.as_str(),
        record.old_broker_name.as_str(),
        record.new_broker_code.as_str(),
        record.new_broker_name.as_str(),
        record.new_sub_broker_code.as_str(),
        record.new_advisor_code.as_str(),
    ];
    for (col, value) in values.iter().enumerate() {
        if let Some(cell) = table_cell_mut(table, 1, col) {
            set_cell_text(cell, value);
        }
    }
}

/// Table 2: investor holder names; signatures are left for ink.
fn fill_holders_table(doc: &mut DocxDocument, record: &CanonicalRecord) {
    let table = match doc.table_mut(2) {
        Some(table) => table,
        None => {
            debug!("holders table missing, skipping");
            return;
        }
    };
    if table_row_count(table) < 3 || table_row_cell_count(table, 1) < 4 {
        debug!("holders table has unexpected shape, skipping");
        return;
    }
    let holders = [
        record.investor_name.as_str(),
        record.second_holder_name.as_str(),
        record.third_holder_name.as_str(),
    ];
    for (offset, value) in holders.iter().enumerate() {
        if let Some(cell) = table_cell_mut(table, 1, offset + 1) {
            set_cell_text(cell, value);
        }
    }
}

/// Populate one page, choosing the layout by structural signature and
/// degrading to the legacy writer when the tabular writer fails.
fn populate_page_auto(doc: &mut DocxDocument, chunk: &[CanonicalRecord]) {
    match detect_template_kind(doc) {
        TemplateKind::Current => {
            if let Err(err) = populate_current_page(doc, chunk) {
                warn!("tabular population failed, degrading to legacy layout: {err}");
                if let Some(record) = chunk.first() {
                    populate_legacy_page(doc, record);
                }
            }
        }
        TemplateKind::Legacy => {
            if let Some(record) = chunk.first() {
                populate_legacy_page(doc, record);
            }
        }
    }
}

/// Compose the full output document from the template at `template_path`.
/// Returns the document and the number of physical pages produced. Page
/// order is exactly input order; for the tabular form records are grouped
/// six per page in order.
pub fn compose_document(
    template_path: &Path,
    records: &[CanonicalRecord],
) -> Result<(DocxDocument, usize)> {
    if records.is_empty() {
        return Err(anyhow!("no records to compose"));
    }
    let base = DocxDocument::open(template_path)?;
    let group_size = match detect_template_kind(&base) {
        TemplateKind::Current => RECORDS_PER_PAGE,
        TemplateKind::Legacy => 1,
    };
    let mut chunks = records.chunks(group_size);

    let mut output = base;
    let first_chunk = chunks.next().expect("records is non-empty");
    populate_page_auto(&mut output, first_chunk);

    let mut pages = 1usize;
    for chunk in chunks {
        // Text mutation makes a populated instance single-use; every later
        // page starts from a fresh template copy.
        output.append_page_break()?;
        let mut page = DocxDocument::open(template_path)?;
        populate_page_auto(&mut page, chunk);
        output.append_body_from(&page)?;
        pages += 1;
    }
    debug!("composed {pages} page(s) from {} record(s)", records.len());
    Ok((output, pages))
}

/// Compose and write the output file. Returns the page count.
pub fn generate_document(
    template_path: &Path,
    records: &[CanonicalRecord],
    output_path: &Path,
) -> Result<usize> {
    let (document, pages) = compose_document(template_path, records)?;
    document.save(output_path)?;
    Ok(pages)
}
