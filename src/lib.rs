// ==========================================
// JobTracker Import Engine - Core Library
// ==========================================
// Bulk-import normalization for job applications and interviews:
// arbitrary JSON/NDJSON/CSV/XLSX files in, canonical typed records out,
// through a preview/confirm/commit session. Persistence stays behind
// the RecordStore collaborator trait.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - canonical entities and session types
pub mod domain;

// Import layer - tokenizers and the normalization pipeline
pub mod importer;

// Persistence boundary - collaborator trait + in-memory reference
pub mod store;

// Export surface - canonical records to JSON/CSV
pub mod exporter;

// Configuration - injected synonym tables and group settings
pub mod config;

// Logging setup
pub mod logging;

// API layer - user-facing commands
pub mod api;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::{
    ApplicationStatus, CanonicalApplication, CanonicalInterview, CanonicalRecord, ImportPreview,
    ImportResult, InterviewStatus, TargetSchema,
};

// Pipeline components
pub use importer::{
    CellCoercer, CellValue, CoercedValue, FieldResolver, FileKind, GroupDetector, ImportError,
    ImportSession, RawRow, RowNormalizer, TargetType, UniversalFileParser,
};

// Configuration
pub use config::{GroupConfig, ImportConfig, IndexMatching};

// Persistence boundary
pub use store::{MemoryStore, RecordStore, StoreError};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Application name
pub const APP_NAME: &str = "JobTracker Import Engine";
