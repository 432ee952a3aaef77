// ==========================================
// JobTracker Import Engine - File Parsers
// ==========================================
// Reference tokenizers: bytes + declared kind -> sequence of raw rows.
// The engine itself is agnostic to the source format; everything after
// this module only sees RawRow / CellValue. Supported: JSON, NDJSON,
// CSV, XLSX (first worksheet, first row as headers).
// ==========================================

use crate::importer::cell_coercer::CellValue;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;

// ==========================================
// RawRow - tokenizer output
// ==========================================
// Ordered column -> cell mapping. Column order of the source file is
// preserved so downstream scans are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        Self {
            columns: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: CellValue) {
        self.columns.push((name.into(), value));
    }

    /// First cell stored under the exact column name.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.columns.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// A row where every cell is null/blank text carries no information.
    pub fn is_blank(&self) -> bool {
        self.columns.iter().all(|(_, value)| value.is_blank())
    }
}

// ==========================================
// FileKind
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    NdJson,
    Csv,
    Xlsx,
}

impl FileKind {
    /// Map a file extension onto a kind; the caller decides what to do
    /// with unknown extensions.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileKind::Json),
            "ndjson" | "jsonl" => Some(FileKind::NdJson),
            "csv" => Some(FileKind::Csv),
            "xlsx" | "xls" => Some(FileKind::Xlsx),
            _ => None,
        }
    }
}

// ==========================================
// CSV parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // tolerate ragged rows
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawRow::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.push(header.clone(), CellValue::Text(value.trim().to_string()));
                }
            }
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

// ==========================================
// JSON / NDJSON parsers
// ==========================================
pub struct JsonParser;

impl JsonParser {
    pub fn parse(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;

        // Accept a bare array or the usual export envelopes.
        let array = match &value {
            serde_json::Value::Array(items) => items.as_slice(),
            serde_json::Value::Object(map) => ["applications", "candidatures", "interviews", "entretiens"]
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_array()))
                .map(|a| a.as_slice())
                .ok_or_else(|| {
                    ImportError::JsonParseError(
                        "expected an array of objects or an 'applications' array".to_string(),
                    )
                })?,
            _ => {
                return Err(ImportError::JsonParseError(
                    "expected an array of objects".to_string(),
                ))
            }
        };

        let mut rows = Vec::new();
        for item in array {
            if let serde_json::Value::Object(obj) = item {
                let row = object_to_row(obj);
                if !row.is_blank() {
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }
}

pub struct NdJsonParser;

impl NdJsonParser {
    pub fn parse(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let text = String::from_utf8_lossy(bytes);
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(line)?;
            if let serde_json::Value::Object(obj) = value {
                let row = object_to_row(&obj);
                if !row.is_blank() {
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }
}

/// Flatten one JSON object into a row. A nested interview array (the
/// legacy export shape) is unrolled into indexed columns so the
/// repeated-group detector picks it up like any spreadsheet family.
fn object_to_row(obj: &serde_json::Map<String, serde_json::Value>) -> RawRow {
    let mut row = RawRow::new();
    for (key, value) in obj {
        let is_interview_list = (key == "interviews" || key == "entretiens") && value.is_array();
        if is_interview_list {
            if let Some(items) = value.as_array() {
                for (i, item) in items.iter().enumerate() {
                    if let serde_json::Value::Object(sub) = item {
                        for (sub_key, sub_value) in sub {
                            row.push(format!("{} {}", sub_key, i + 1), scalar_cell(sub_value));
                        }
                    }
                }
            }
        } else {
            row.push(key.clone(), scalar_cell(value));
        }
    }
    row
}

fn scalar_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        // Nested structures we do not model: keep their JSON text.
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// Excel parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    pub fn parse(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook: Xlsx<_> = Xlsx::new(cursor)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names.first().cloned().ok_or(ImportError::EmptyWorkbook)?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows_iter = range.rows();
        let header_row = rows_iter.next().ok_or(ImportError::EmptyWorkbook)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in rows_iter {
            let mut row = RawRow::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.push(header.clone(), excel_cell(cell));
                }
            }
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Surface the raw serial so the coercer's serial-date path applies.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

// ==========================================
// Universal parser (declared-kind dispatch)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, bytes: &[u8], kind: FileKind) -> ImportResult<Vec<RawRow>> {
        match kind {
            FileKind::Json => JsonParser.parse(bytes),
            FileKind::NdJson => NdJsonParser.parse(bytes),
            FileKind::Csv => CsvParser.parse(bytes),
            FileKind::Xlsx => ExcelParser.parse(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_basic() {
        let csv = "Entreprise,Poste,Statut\nAcme,Dev,pending\nGlobex,PM,positive\n";
        let rows = CsvParser.parse(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Entreprise"),
            Some(&CellValue::Text("Acme".to_string()))
        );
        assert_eq!(rows[0].keys(), vec!["Entreprise", "Poste", "Statut"]);
    }

    #[test]
    fn test_csv_skips_blank_rows() {
        let csv = "Entreprise,Poste\nAcme,Dev\n,\nGlobex,PM\n";
        let rows = CsvParser.parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_json_bare_array() {
        let json = r#"[{"entreprise": "Acme", "poste": "Dev", "age": 3}]"#;
        let rows = JsonParser.parse(json.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("age"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_json_envelope() {
        let json = r#"{"applications": [{"entreprise": "Acme"}], "export_date": "2025-01-01"}"#;
        let rows = JsonParser.parse(json.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);

        let json = r#"{"candidatures": [{"entreprise": "Acme"}]}"#;
        assert_eq!(JsonParser.parse(json.as_bytes()).unwrap().len(), 1);

        let json = r#"{"something_else": 4}"#;
        assert!(JsonParser.parse(json.as_bytes()).is_err());
    }

    #[test]
    fn test_json_nested_interviews_flattened() {
        let json = r#"[{
            "entreprise": "Acme",
            "poste": "Dev",
            "interviews": [
                {"date_entretien": "2025-01-20", "type_entretien": "technique"},
                {"date_entretien": "2025-02-01"}
            ]
        }]"#;
        let rows = JsonParser.parse(json.as_bytes()).unwrap();

        let keys = rows[0].keys();
        assert!(keys.contains(&"date_entretien 1"));
        assert!(keys.contains(&"type_entretien 1"));
        assert!(keys.contains(&"date_entretien 2"));
    }

    #[test]
    fn test_ndjson() {
        let ndjson = "{\"entreprise\": \"Acme\"}\n\n{\"entreprise\": \"Globex\"}\n";
        let rows = NdJsonParser.parse(ndjson.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_extension("CSV"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_extension("jsonl"), Some(FileKind::NdJson));
        assert_eq!(FileKind::from_extension("xlsx"), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_extension("pdf"), None);
    }
}
