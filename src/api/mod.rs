// ==========================================
// JobTracker Import Engine - API Layer
// ==========================================
// User-facing command surface and error mapping.
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
