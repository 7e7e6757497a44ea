// Record normalization: spreadsheet rows become canonical form-fillable records.
use crate::config::FormDefaults;
use calamine::{open_workbook_auto, Data, Reader};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// One form-fillable unit, assembled from a single spreadsheet row plus
/// configured defaults. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub scheme_name: String,
    pub folio_number: String,
    pub investor_name: String,
    pub pan_number: String,
    pub old_broker_code: String,
    pub old_broker_name: String,
    pub new_broker_code: String,
    pub new_broker_name: String,
    pub new_sub_broker_code: String,
    pub new_advisor_code: String,
    pub advisor_name: String,
    pub signature_holder_info: String,
    pub staff_info: String,
    pub place: String,
    pub date: String,
    pub second_holder_name: String,
    pub third_holder_name: String,
}

#[derive(Debug, Error)]
pub enum RecordError {
    /// The workbook could not be opened or parsed at the file level. The
    /// whole read fails closed: no records, never a partial list.
    #[error("could not read spreadsheet: {0}")]
    Unreadable(String),
    /// The workbook read fine but no row passed the retention check.
    #[error("no data rows found in spreadsheet")]
    NoRecords,
}

/// Expected columns, data starting at row 2 (row 1 is headers):
///   A: Scheme Name
///   B: Folio No
///   C: PAN or scheme-name override
///   D: Investor [First Holder only]
///   E: Old ARN Number
///   F: Old ARN Name
pub fn read_records(
    path: &Path,
    defaults: &FormDefaults,
) -> Result<Vec<CanonicalRecord>, RecordError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|err| RecordError::Unreadable(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RecordError::Unreadable("workbook has no sheets".to_string()))?
        .map_err(|err| RecordError::Unreadable(err.to_string()))?;

    let mut records = Vec::new();
    for (index, row) in range.rows().enumerate() {
        if index == 0 {
            continue;
        }
        let cells: Vec<String> = (0..6)
            .map(|col| normalize_cell(row.get(col).unwrap_or(&Data::Empty)))
            .collect();
        match record_from_cells(&cells, defaults) {
            Some(record) => records.push(record),
            None => debug!("skipping empty sheet row {}", index + 1),
        }
    }

    if records.is_empty() {
        return Err(RecordError::NoRecords);
    }
    Ok(records)
}

/// Build one record from the six normalized cell values, or `None` when the
/// row carries no informative field and must be dropped.
pub fn record_from_cells(cells: &[String], defaults: &FormDefaults) -> Option<CanonicalRecord> {
    let cell = |col: usize| cells.get(col).map(String::as_str).unwrap_or("");
    let scheme_a = cell(0);
    let folio_number = cell(1);
    let column_c = cell(2);
    let investor_name = cell(3);
    let old_broker_code = cell(4);
    let old_broker_name = cell(5);

    // Column C is ambiguous: a PAN-shaped value is a tax id, anything else
    // non-empty overrides the scheme name from column A.
    let pan_number = pan_from(column_c).unwrap_or_default();
    let scheme_name = if pan_number.is_empty() && !column_c.is_empty() {
        column_c
    } else {
        scheme_a
    };

    let has_data =
        !scheme_name.is_empty() || !folio_number.is_empty() || !investor_name.is_empty();
    if !has_data {
        return None;
    }

    Some(CanonicalRecord {
        scheme_name: scheme_name.to_string(),
        folio_number: folio_number.to_string(),
        investor_name: investor_name.to_string(),
        pan_number,
        old_broker_code: old_broker_code.to_string(),
        old_broker_name: old_broker_name.to_string(),
        new_broker_code: defaults.new_broker_code.clone(),
        new_broker_name: defaults.new_broker_name.clone(),
        new_sub_broker_code: String::new(),
        new_advisor_code: format_advisor_code(&defaults.advisor_code),
        advisor_name: defaults.advisor_name.clone(),
        signature_holder_info: String::new(),
        staff_info: String::new(),
        place: defaults.place.clone(),
        date: chrono::Local::now().format("%d-%m-%Y").to_string(),
        second_holder_name: String::new(),
        third_holder_name: String::new(),
    })
}

/// Coerce a cell to a trimmed string. Absent cells and cells whose
/// stringified value reads "None" are both treated as empty, an inherited
/// quirk of the upstream extract.
pub fn normalize_cell(cell: &Data) -> String {
    let text = match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed == "None" {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn pan_regex() -> &'static Regex {
    static PAN: OnceLock<Regex> = OnceLock::new();
    PAN.get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("pan pattern"))
}

/// Normalize and validate a PAN-shaped value (5 letters, 4 digits, 1 letter
/// after space-stripping and upper-casing). Returns the normalized PAN.
pub fn pan_from(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if pan_regex().is_match(&compact) {
        Some(compact)
    } else {
        None
    }
}

/// Render an advisor (EUIN) code with exactly one leading `E`, regardless of
/// whether the source value already carried one.
pub fn format_advisor_code(code: &str) -> String {
    let clean: String = code
        .trim()
        .chars()
        .filter(|ch| *ch != 'E' && *ch != 'e')
        .collect();
    if clean.is_empty() {
        String::new()
    } else {
        format!("E{clean}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> FormDefaults {
        FormDefaults::default()
    }

    fn cells(values: [&str; 6]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn pan_shaped_value_is_classified_as_pan() {
        let record = record_from_cells(
            &cells(["Axis Bluechip", "12345/67", "ABCDE1234F", "R Sharma", "ARN-001", "Old Broker"]),
            &defaults(),
        )
        .expect("row retained");
        assert_eq!(record.pan_number, "ABCDE1234F");
        assert_eq!(record.scheme_name, "Axis Bluechip");
    }

    #[test]
    fn pan_matching_ignores_spaces_and_case() {
        assert_eq!(pan_from(" abcde 1234 f "), Some("ABCDE1234F".to_string()));
        assert_eq!(pan_from("ABCDE12345"), None);
        assert_eq!(pan_from(""), None);
    }

    #[test]
    fn non_pan_column_c_overrides_scheme_name() {
        let record = record_from_cells(
            &cells(["Axis Bluechip", "12345/67", "Axis Midcap Fund", "R Sharma", "", ""]),
            &defaults(),
        )
        .expect("row retained");
        assert_eq!(record.scheme_name, "Axis Midcap Fund");
        assert_eq!(record.pan_number, "");
    }

    #[test]
    fn empty_column_c_falls_back_to_column_a() {
        let record = record_from_cells(
            &cells(["Axis Bluechip", "12345/67", "", "R Sharma", "", ""]),
            &defaults(),
        )
        .expect("row retained");
        assert_eq!(record.scheme_name, "Axis Bluechip");
    }

    #[test]
    fn all_empty_row_is_dropped() {
        assert!(record_from_cells(&cells(["", "", "", "", "", ""]), &defaults()).is_none());
    }

    #[test]
    fn none_literal_counts_as_empty() {
        assert_eq!(normalize_cell(&Data::String("None".to_string())), "");
        assert_eq!(normalize_cell(&Data::String("  None  ".to_string())), "");
        // A row made entirely of "None" cells is dropped like an empty one.
        let row = cells(["None", "None", "None", "None", "None", "None"]);
        let normalized: Vec<String> = row
            .iter()
            .map(|value| normalize_cell(&Data::String(value.clone())))
            .collect();
        assert!(record_from_cells(&normalized, &defaults()).is_none());
    }

    #[test]
    fn single_informative_field_retains_row() {
        let record =
            record_from_cells(&cells(["", "98765/43", "", "", "", ""]), &defaults()).expect("kept");
        assert_eq!(record.folio_number, "98765/43");
        assert_eq!(record.new_broker_code, "310082");
        assert_eq!(record.new_advisor_code, "E588234");
        assert_eq!(record.place, "Bengaluru, Karnataka");
    }

    #[test]
    fn numeric_cells_are_stringified() {
        assert_eq!(normalize_cell(&Data::Float(310082.0)), "310082");
        assert_eq!(normalize_cell(&Data::Int(42)), "42");
    }

    #[test]
    fn reads_records_from_workbook_skipping_blank_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("extract.xlsx");
        let rows = vec![
            vec!["Scheme Name", "Folio No", "PAN", "Investor", "Old ARN", "Old ARN Name"],
            vec!["Axis Bluechip Fund", "12345/67", "ABCDE1234F", "R Sharma", "ARN-0042", "Old Broker Ltd"],
            vec!["", "", "", "", "", ""],
            vec!["None", "None", "None", "None", "None", "None"],
            vec!["HDFC Top 100 Fund", "98765/43", "", "S Rao", "ARN-0099", "Other Broker"],
        ];
        std::fs::write(&path, crate::test_support::xlsx_package(&rows)).expect("write xlsx");

        let records = read_records(&path, &defaults()).expect("read records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].folio_number, "12345/67");
        assert_eq!(records[0].pan_number, "ABCDE1234F");
        assert_eq!(records[0].old_broker_code, "ARN-0042");
        assert_eq!(records[1].scheme_name, "HDFC Top 100 Fund");
        assert_eq!(records[1].new_advisor_code, "E588234");
    }

    #[test]
    fn unreadable_workbook_fails_closed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a workbook").expect("write file");
        match read_records(&path, &defaults()) {
            Err(RecordError::Unreadable(_)) => {}
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn header_only_workbook_reports_no_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.xlsx");
        let rows = vec![vec![
            "Scheme Name", "Folio No", "PAN", "Investor", "Old ARN", "Old ARN Name",
        ]];
        std::fs::write(&path, crate::test_support::xlsx_package(&rows)).expect("write xlsx");
        match read_records(&path, &defaults()) {
            Err(RecordError::NoRecords) => {}
            other => panic!("expected NoRecords, got {other:?}"),
        }
    }

    #[test]
    fn advisor_code_formatting_is_idempotent() {
        assert_eq!(format_advisor_code("588234"), "E588234");
        assert_eq!(format_advisor_code("E588234"), "E588234");
        assert_eq!(format_advisor_code("e588234"), "E588234");
        assert_eq!(format_advisor_code(""), "");
    }
}
