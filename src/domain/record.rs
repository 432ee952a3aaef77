// ==========================================
// JobTracker Import Engine - Canonical Records
// ==========================================
// Target entities of the normalization pipeline, plus the
// preview/result types carried through an import session.
// Wire names follow the JobTracker backend (entreprise, poste, ...).
// ==========================================

use crate::domain::types::{ApplicationStatus, InterviewStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// CanonicalApplication - parent entity
// ==========================================
// One job application. Never mutated after normalization; each commit
// attempt is a fresh pass over the full normalized set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalApplication {
    // ===== Identity =====
    // The row-acceptance filter requires at least one of the two;
    // the persistence side may additionally require both.
    #[serde(rename = "entreprise")]
    pub company: Option<String>,
    #[serde(rename = "poste")]
    pub position: Option<String>,

    // ===== Descriptive fields =====
    #[serde(rename = "type_poste")]
    pub contract_type: Option<String>, // cdi / cdd / stage / alternance / freelance / interim
    #[serde(rename = "lieu")]
    pub location: Option<String>,
    #[serde(rename = "moyen")]
    pub source: Option<String>, // application channel (linkedin, email, ...)
    #[serde(rename = "lien")]
    pub job_url: Option<String>,
    #[serde(rename = "commentaire")]
    pub note: Option<String>,

    // ===== Timeline =====
    // ISO-8601 timestamp. May carry the raw source string when the
    // original value did not parse (degraded, never dropped).
    #[serde(rename = "date_candidature")]
    pub applied_at: String,

    // ===== Outcome =====
    #[serde(rename = "reponse")]
    pub status: ApplicationStatus,

    // ===== Embedded children =====
    // Populated only when the source row carries interview column groups.
    #[serde(rename = "entretiens", default, skip_serializing_if = "Vec::is_empty")]
    pub interviews: Vec<CanonicalInterview>,
}

impl CanonicalApplication {
    /// Row-acceptance filter: a record with neither company nor position
    /// resolved is not emitted.
    pub fn has_identity(&self) -> bool {
        self.company.is_some() || self.position.is_some()
    }
}

// ==========================================
// CanonicalInterview - child entity
// ==========================================
// Either embedded in a parent application row or a top-level row of an
// interview-only import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalInterview {
    // ===== Parent association =====
    // Company name or explicit parent id; used to attach a standalone
    // interview to an existing application.
    #[serde(rename = "entreprise")]
    pub parent_ref: Option<String>,

    // ===== Schedule =====
    // Required for acceptance. ISO-8601, degraded raw string allowed.
    #[serde(rename = "date_entretien")]
    pub scheduled_at: Option<String>,

    // ===== Descriptive fields =====
    #[serde(rename = "type_entretien")]
    pub kind: Option<String>, // rh / technical / manager / final / other
    #[serde(rename = "format_entretien")]
    pub format: Option<String>, // video / phone / in_person
    #[serde(rename = "lieu_lien")]
    pub location: Option<String>,
    pub interviewer: Option<String>,
    #[serde(rename = "commentaire")]
    pub note: Option<String>,

    // ===== Outcome =====
    #[serde(rename = "statut")]
    pub status: InterviewStatus,
}

impl CanonicalInterview {
    /// Child-acceptance invariant: an interview without a schedule is
    /// meaningless and is dropped.
    pub fn has_schedule(&self) -> bool {
        self.scheduled_at.is_some()
    }
}

// ==========================================
// CanonicalRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_type", rename_all = "snake_case")]
pub enum CanonicalRecord {
    Application(CanonicalApplication),
    Interview(CanonicalInterview),
}

impl CanonicalRecord {
    pub fn as_application(&self) -> Option<&CanonicalApplication> {
        match self {
            CanonicalRecord::Application(app) => Some(app),
            CanonicalRecord::Interview(_) => None,
        }
    }

    pub fn as_interview(&self) -> Option<&CanonicalInterview> {
        match self {
            CanonicalRecord::Application(_) => None,
            CanonicalRecord::Interview(itw) => Some(itw),
        }
    }
}

// ==========================================
// ImportPreview
// ==========================================
// Ephemeral: lives only inside the import session between the
// normalization pass and confirm/cancel. Never partially committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    /// Raw rows handed to the session, before any filtering.
    pub total_rows: usize,
    /// First records, bounded for display.
    pub sample: Vec<CanonicalRecord>,
    /// The complete normalized set submitted on confirm.
    pub full: Vec<CanonicalRecord>,
}

/// Preview sample bound.
pub const PREVIEW_SAMPLE_LEN: usize = 10;

// ==========================================
// ImportResult
// ==========================================
// Produced once per commit attempt; immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub imported_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            imported_count: 0,
            skipped_count: 0,
            errors: vec![message.into()],
        }
    }
}

// ==========================================
// RejectionReason - internal row filter outcome
// ==========================================
// Rows are silently dropped from the caller's point of view, but every
// drop is an explicit Err internally so sessions can count and log them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Application row with neither company nor position resolved.
    MissingIdentity,
    /// Interview row without a schedule date.
    MissingSchedule,
    /// Row resolved to no usable field at all.
    EmptyRow,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MissingIdentity => "missing company/position",
            RejectionReason::MissingSchedule => "missing interview date",
            RejectionReason::EmptyRow => "no recognizable field",
        }
    }
}
