// ==========================================
// JobTracker Import Engine - Import Errors
// ==========================================
// thiserror taxonomy for the import pipeline. Cell-level coercion never
// errors (it degrades); these variants cover file parsing, dataset-level
// failures and illegal session transitions.
// ==========================================

use thiserror::Error;

/// Import pipeline error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File / tokenizer errors =====
    #[error("unsupported file format: {0} (expected json/ndjson/csv/xlsx)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("JSON parse failed: {0}")]
    JsonParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("the file contains no worksheet or no data rows")]
    EmptyWorkbook,

    // ===== Dataset-level failures =====
    // Deliberate UX guard: an import that normalizes to nothing must fail
    // loudly instead of previewing an empty set.
    #[error("no data found in the file - check the format and column names")]
    NoDataFound,

    // ===== Session errors =====
    #[error("invalid session state for {operation}: session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    // ===== Generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias for the import pipeline
pub type ImportResult<T> = Result<T, ImportError>;
