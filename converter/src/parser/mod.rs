//! CSV export loader with encoding and delimiter auto-detection.
//!
//! Turns the control export into [`Row`]s keyed by header name. No
//! OpenControl-specific logic here beyond checking that the configured
//! columns exist.

use encoding_rs::Encoding;
use std::collections::HashMap;
use std::path::Path;

use crate::config::ColumnNames;
use crate::error::{CsvError, CsvResult};

/// One data row: header name to cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based position among the data rows
    pub number: usize,
    fields: HashMap<String, String>,
}

impl Row {
    pub fn new(number: usize, fields: HashMap<String, String>) -> Self {
        Self { number, fields }
    }

    /// Build a row from `(header, value)` pairs.
    pub fn from_pairs<K, V>(number: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { number, fields }
    }

    /// Cell value, `None` when the column does not exist.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Cell value, empty when the column does not exist.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct LoadedCsv {
    pub rows: Vec<Row>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: u8,
    /// Column headers
    pub headers: Vec<String>,
}

/// Guess the encoding of bytes that are not valid UTF-8 using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" | "" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode raw bytes to text, honouring a byte-order mark.
///
/// Returns the text and the name of the encoding used.
pub fn decode_content(bytes: &[u8]) -> CsvResult<(String, String)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_string(), "UTF-8".to_string()));
    }

    let label = detect_encoding(bytes);
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::WINDOWS_1252);
    decode_with(encoding, bytes).or_else(|_| decode_with(encoding_rs::WINDOWS_1252, bytes))
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> CsvResult<(String, String)> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(CsvError::Encoding(encoding.name().to_string()));
    }
    Ok((text.into_owned(), encoding.name().to_string()))
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [b',', b'\t', b';', b'|'];
    let mut best_sep = b',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load a CSV file with auto-detection of encoding and delimiter.
pub fn load_csv_file<P: AsRef<Path>>(
    path: P,
    columns: &ColumnNames,
    delimiter: Option<u8>,
    row_limit: Option<usize>,
) -> CsvResult<LoadedCsv> {
    let bytes = std::fs::read(path.as_ref())?;
    load_bytes(&bytes, columns, delimiter, row_limit)
}

/// Load CSV bytes; see [`load_csv_file`].
pub fn load_bytes(
    bytes: &[u8],
    columns: &ColumnNames,
    delimiter: Option<u8>,
    row_limit: Option<usize>,
) -> CsvResult<LoadedCsv> {
    let (content, encoding) = decode_content(bytes)?;
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let (headers, rows) = parse_rows(&content, delimiter, row_limit)?;

    for required in columns.required() {
        if !headers.iter().any(|h| h == required) {
            return Err(CsvError::MissingColumn(required.to_string()));
        }
    }

    Ok(LoadedCsv {
        rows,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse decoded CSV text into header names and rows.
///
/// Every record becomes a row, including ones whose cells are all blank.
/// Reading stops once `row_limit` data rows have been read.
pub fn parse_rows(
    content: &str,
    delimiter: u8,
    row_limit: Option<usize>,
) -> CsvResult<(Vec<String>, Vec<Row>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::EmptyFile);
    }

    let mut rows = Vec::new();
    let mut records = reader.records();

    while row_limit.map_or(true, |limit| rows.len() < limit) {
        let Some(record) = records.next() else {
            break;
        };
        let record = record?;

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();

        rows.push(Row::new(rows.len() + 1, fields));
    }

    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Control,Control Part,System Element,Remediation Plan,Test Artifact (NIST 800-53A)";

    fn load(csv: &str) -> CsvResult<LoadedCsv> {
        load_bytes(csv.as_bytes(), &ColumnNames::default(), None, None)
    }

    #[test]
    fn test_simple_csv() {
        let csv = format!("{}\nAU-4,,AWS prod,Logs retained.,\nAC-2,a,GitLab,Accounts.,", HEADER);
        let loaded = load(&csv).unwrap();

        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.rows[0].get("Control"), Some("AU-4"));
        assert_eq!(loaded.rows[0].get("System Element"), Some("AWS prod"));
        assert_eq!(loaded.rows[1].get("Control Part"), Some("a"));
        assert_eq!(loaded.rows[1].number, 2);
        assert_eq!(loaded.delimiter, b',');
    }

    #[test]
    fn test_quoted_multiline_cell() {
        let csv = format!("{}\nAU-4,,AWS,\"First line\nsecond line\",", HEADER);
        let loaded = load(&csv).unwrap();

        assert_eq!(loaded.rows.len(), 1);
        assert_eq!(loaded.rows[0].text("Remediation Plan"), "First line\nsecond line");
    }

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(format!("{}\nAU-4,,AWS,Text,", HEADER).as_bytes());
        let loaded = load_bytes(&bytes, &ColumnNames::default(), None, None).unwrap();

        assert_eq!(loaded.headers[0], "Control");
        assert_eq!(loaded.rows[0].get("Control"), Some("AU-4"));
    }

    #[test]
    fn test_tab_separated_export() {
        let tsv = "Control\tSystem Element\tRemediation Plan\nAU-4\tAWS\tText";
        let loaded = load(tsv).unwrap();

        assert_eq!(loaded.delimiter, b'\t');
        assert_eq!(loaded.rows[0].get("Remediation Plan"), Some("Text"));
        assert_eq!(loaded.rows[0].get("Control Part"), None);
    }

    #[test]
    fn test_row_limit_stops_reading() {
        let csv = format!("{}\nAU-1,,A,x,\nAU-2,,A,y,\nAU-3,,A,z,", HEADER);
        let loaded = load_bytes(csv.as_bytes(), &ColumnNames::default(), None, Some(2)).unwrap();

        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.rows[1].get("Control"), Some("AU-2"));
    }

    #[test]
    fn test_row_limit_zero_reads_nothing() {
        let csv = format!("{}\nAU-1,,A,x,", HEADER);
        let loaded = load_bytes(csv.as_bytes(), &ColumnNames::default(), None, Some(0)).unwrap();
        assert!(loaded.rows.is_empty());
    }

    #[test]
    fn test_blank_rows_are_kept() {
        let csv = format!("{}\nAU-1,,A,x,\n,,,,\nAU-2,,A,y,", HEADER);
        let loaded = load(&csv).unwrap();

        assert_eq!(loaded.rows.len(), 3);
        assert_eq!(loaded.rows[1].number, 2);
        assert_eq!(loaded.rows[1].get("Control"), Some(""));
        assert_eq!(loaded.rows[2].get("Control"), Some("AU-2"));
        assert_eq!(loaded.rows[2].number, 3);
    }

    #[test]
    fn test_row_limit_counts_blank_rows() {
        let csv = format!("{}\nAU-1,,A,x,\n,,,,\nAU-2,,A,y,", HEADER);
        let loaded = load_bytes(csv.as_bytes(), &ColumnNames::default(), None, Some(2)).unwrap();

        assert_eq!(loaded.rows.len(), 2);
        assert!(loaded.rows.iter().all(|r| r.get("Control") != Some("AU-2")));
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let csv = format!("{}\nAU-1,,A", HEADER);
        let loaded = load(&csv).unwrap();
        assert_eq!(loaded.rows[0].get("Remediation Plan"), Some(""));
    }

    #[test]
    fn test_missing_required_column() {
        let err = load("Control,Remediation Plan\nAU-1,x").unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn(ref c) if c == "System Element"));
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(load("").unwrap_err(), CsvError::EmptyFile));
        assert!(matches!(load("  \n").unwrap_err(), CsvError::EmptyFile));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a|b|c"), b'|');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let (decoded, _) = decode_content(bytes).unwrap();
        assert!(decoded.starts_with("Soci"));
    }
}
