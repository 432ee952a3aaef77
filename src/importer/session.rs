// ==========================================
// JobTracker Import Engine - Import Session
// ==========================================
// Stateful orchestrator spanning preview through commit for one import
// action. Explicit state machine:
//   Idle -> Previewing -> Committing -> {Completed | Failed} -> Idle
// Illegal transitions are rejected, which is also what enforces the
// single-in-flight-commit invariant. All state is in memory; nothing
// is persisted by the session itself.
// ==========================================

use crate::config::ImportConfig;
use crate::domain::record::{ImportPreview, ImportResult, PREVIEW_SAMPLE_LEN};
use crate::domain::types::TargetSchema;
use crate::importer::error::ImportError;
use crate::importer::file_parser::RawRow;
use crate::importer::row_normalizer::RowNormalizer;
use crate::store::RecordStore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// ==========================================
// SessionState
// ==========================================
#[derive(Debug)]
pub enum SessionState {
    Idle,
    Previewing(ImportPreview),
    Committing,
    Completed(ImportResult),
    Failed(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Previewing(_) => "previewing",
            SessionState::Committing => "committing",
            SessionState::Completed(_) => "completed",
            SessionState::Failed(_) => "failed",
        }
    }
}

// ==========================================
// ImportSession
// ==========================================
pub struct ImportSession<S: RecordStore> {
    session_id: Uuid,
    config: ImportConfig,
    store: S,
    state: SessionState,
    /// Rows dropped by the acceptance filter for the current preview;
    /// folded into the final result's skipped count.
    pending_skipped: usize,
}

impl<S: RecordStore> ImportSession<S> {
    pub fn new(config: ImportConfig, store: S) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            config,
            store,
            state: SessionState::Idle,
            pending_skipped: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Normalize a parsed dataset and enter Previewing.
    ///
    /// Rows are processed sequentially in source order, which keeps the
    /// preview ordering and skip indexes deterministic. Zero accepted
    /// rows fails the session instead of previewing an empty set.
    pub fn begin_preview(
        &mut self,
        rows: Vec<RawRow>,
        schema: TargetSchema,
    ) -> Result<&ImportPreview, ImportError> {
        match self.state {
            SessionState::Idle | SessionState::Completed(_) | SessionState::Failed(_) => {}
            SessionState::Previewing(_) | SessionState::Committing => {
                return Err(ImportError::InvalidState {
                    operation: "load",
                    state: self.state.name(),
                });
            }
        }

        let normalizer = RowNormalizer::new(&self.config);
        let total_rows = rows.len();
        let mut accepted = Vec::new();
        let mut skipped = 0usize;

        for (idx, row) in rows.iter().enumerate() {
            match normalizer.normalize_row(row, schema) {
                Ok(record) => accepted.push(record),
                Err(reason) => {
                    skipped += 1;
                    debug!(
                        session_id = %self.session_id,
                        row = idx + 1,
                        reason = reason.as_str(),
                        "row skipped"
                    );
                }
            }
        }

        info!(
            session_id = %self.session_id,
            schema = %schema,
            total = total_rows,
            accepted = accepted.len(),
            skipped = skipped,
            "dataset normalized"
        );

        if accepted.is_empty() {
            let err = ImportError::NoDataFound;
            warn!(session_id = %self.session_id, "no usable rows, session failed");
            self.state = SessionState::Failed(err.to_string());
            self.pending_skipped = 0;
            return Err(err);
        }

        let sample = accepted.iter().take(PREVIEW_SAMPLE_LEN).cloned().collect();
        self.pending_skipped = skipped;
        self.state = SessionState::Previewing(ImportPreview {
            total_rows,
            sample,
            full: accepted,
        });

        match &self.state {
            SessionState::Previewing(preview) => Ok(preview),
            _ => unreachable!("state was just set to Previewing"),
        }
    }

    /// Current preview, if any.
    pub fn preview(&self) -> Option<&ImportPreview> {
        match &self.state {
            SessionState::Previewing(preview) => Some(preview),
            _ => None,
        }
    }

    /// Send the full normalized set to the persistence collaborator.
    ///
    /// Only legal from Previewing - a second confirm while a commit is
    /// in flight is rejected, not queued. A collaborator failure fails
    /// the session and is reported through the returned ImportResult
    /// (success = false, the failure message as sole error entry).
    pub async fn confirm(&mut self) -> Result<ImportResult, ImportError> {
        let preview = match std::mem::replace(&mut self.state, SessionState::Committing) {
            SessionState::Previewing(preview) => preview,
            other => {
                let state = other.name();
                self.state = other;
                return Err(ImportError::InvalidState {
                    operation: "confirm",
                    state,
                });
            }
        };

        info!(
            session_id = %self.session_id,
            records = preview.full.len(),
            "commit started"
        );

        match self.store.commit(&preview.full).await {
            Ok(mut result) => {
                result.skipped_count += self.pending_skipped;
                info!(
                    session_id = %self.session_id,
                    imported = result.imported_count,
                    skipped = result.skipped_count,
                    errors = result.errors.len(),
                    "commit finished"
                );
                self.state = SessionState::Completed(result.clone());
                Ok(result)
            }
            Err(store_err) => {
                let message = store_err.to_string();
                error!(session_id = %self.session_id, error = %message, "commit failed");
                self.state = SessionState::Failed(message.clone());
                let mut result = ImportResult::failure(message);
                result.skipped_count = self.pending_skipped;
                Ok(result)
            }
        }
    }

    /// Discard the preview. Side-effect free; only meaningful while
    /// Previewing.
    pub fn cancel(&mut self) {
        if matches!(self.state, SessionState::Previewing(_)) {
            info!(session_id = %self.session_id, "preview cancelled");
            self.state = SessionState::Idle;
            self.pending_skipped = 0;
        }
    }

    /// Failure message of a Failed session.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
