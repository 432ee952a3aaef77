// ==========================================
// JobTracker Import Engine - Domain Layer
// ==========================================
// Canonical entities and the types carried through an import session.
// ==========================================

pub mod record;
pub mod types;

pub use record::{
    CanonicalApplication, CanonicalInterview, CanonicalRecord, ImportPreview, ImportResult,
    RejectionReason, PREVIEW_SAMPLE_LEN,
};
pub use types::{ApplicationStatus, InterviewStatus, TargetSchema};
