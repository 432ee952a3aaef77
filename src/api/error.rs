// ==========================================
// JobTracker Import Engine - API Errors
// ==========================================
// User-facing error type: lower-layer errors become short, explicit
// messages (counts and reasons, never a raw backtrace).
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

/// API layer error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no data found in the file - check the format and column names")]
    NoDataFound,

    #[error("operation not allowed: {0}")]
    InvalidState(String),

    #[error("file import failed: {0}")]
    ImportFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::NoDataFound => ApiError::NoDataFound,
            ImportError::InvalidState { operation, state } => ApiError::InvalidState(format!(
                "cannot {} while the session is {}",
                operation, state
            )),
            ImportError::Other(inner) => ApiError::InternalError(inner.to_string()),
            other => ApiError::ImportFailed(other.to_string()),
        }
    }
}

/// Result alias for the API layer
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_mapping() {
        let api_err: ApiError = ImportError::NoDataFound.into();
        assert!(matches!(api_err, ApiError::NoDataFound));
    }

    #[test]
    fn test_invalid_state_message() {
        let api_err: ApiError = ImportError::InvalidState {
            operation: "confirm",
            state: "committing",
        }
        .into();
        match api_err {
            ApiError::InvalidState(msg) => {
                assert!(msg.contains("confirm"));
                assert!(msg.contains("committing"));
            }
            other => panic!("expected InvalidState, got {:?}", other),
        }
    }
}
