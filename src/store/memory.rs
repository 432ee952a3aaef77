// ==========================================
// JobTracker Import Engine - In-Memory Store
// ==========================================
// Reference RecordStore used by tests and the demo binary. Mirrors the
// production backend's commit semantics: per-row validation, duplicate
// skipping with a leading summary entry, error list capped at 10.
// ==========================================

use crate::domain::record::{CanonicalInterview, CanonicalRecord, ImportResult};
use crate::store::{RecordStore, StoreError};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

const MAX_REPORTED_ERRORS: usize = 10;

#[derive(Debug, Default)]
pub struct MemoryStore {
    applications: Mutex<Vec<crate::domain::record::CanonicalApplication>>,
    interviews: Mutex<Vec<CanonicalInterview>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applications(&self) -> Vec<crate::domain::record::CanonicalApplication> {
        self.applications.lock().unwrap().clone()
    }

    pub fn interviews(&self) -> Vec<CanonicalInterview> {
        self.interviews.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn commit(&self, records: &[CanonicalRecord]) -> Result<ImportResult, StoreError> {
        let mut applications = self.applications.lock().unwrap();
        let mut interviews = self.interviews.lock().unwrap();

        let mut imported = 0;
        let mut skipped = 0;
        let mut duplicates = 0;
        let mut errors = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            match record {
                CanonicalRecord::Application(app) => {
                    // The store is stricter than the engine's acceptance
                    // filter: both identity fields are required here.
                    if app.company.is_none() || app.position.is_none() {
                        errors.push(format!("row {}: company and position required", idx + 1));
                        skipped += 1;
                        continue;
                    }

                    let is_duplicate = applications.iter().any(|existing| {
                        eq_ignore_case(&existing.company, &app.company)
                            && eq_ignore_case(&existing.position, &app.position)
                    });
                    if is_duplicate {
                        debug!(row = idx + 1, "duplicate application skipped");
                        duplicates += 1;
                        continue;
                    }

                    // Embedded interviews land in the interview store with
                    // their parent reference; only the parent counts as
                    // imported.
                    for child in &app.interviews {
                        interviews.push(child.clone());
                    }
                    applications.push(app.clone());
                    imported += 1;
                }
                CanonicalRecord::Interview(itw) => {
                    let parent_found = itw.parent_ref.as_deref().map(|parent| {
                        applications.iter().any(|app| {
                            app.company
                                .as_deref()
                                .is_some_and(|c| c.eq_ignore_ascii_case(parent))
                        })
                    });
                    if parent_found != Some(true) {
                        errors.push(format!("row {}: no matching application", idx + 1));
                        skipped += 1;
                        continue;
                    }

                    let is_duplicate = interviews.iter().any(|existing| {
                        existing.parent_ref == itw.parent_ref
                            && same_day(&existing.scheduled_at, &itw.scheduled_at)
                    });
                    if is_duplicate {
                        debug!(row = idx + 1, "duplicate interview skipped");
                        duplicates += 1;
                        continue;
                    }

                    interviews.push(itw.clone());
                    imported += 1;
                }
            }
        }

        if duplicates > 0 {
            errors.insert(0, format!("{} duplicate record(s) skipped", duplicates));
        }
        errors.truncate(MAX_REPORTED_ERRORS);

        Ok(ImportResult {
            success: true,
            imported_count: imported,
            skipped_count: skipped + duplicates,
            errors,
        })
    }
}

fn eq_ignore_case(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Same calendar day on the ISO prefix; degraded non-ISO strings only
/// ever match themselves.
fn same_day(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let day = |s: &str| s.get(..10).map(|d| d.to_string()).unwrap_or_else(|| s.to_string());
            day(a) == day(b)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::CanonicalApplication;
    use crate::domain::types::{ApplicationStatus, InterviewStatus};

    fn application(company: &str, position: &str) -> CanonicalRecord {
        CanonicalRecord::Application(CanonicalApplication {
            company: Some(company.to_string()),
            position: Some(position.to_string()),
            contract_type: None,
            location: None,
            source: None,
            job_url: None,
            note: None,
            applied_at: "2025-01-15".to_string(),
            status: ApplicationStatus::Pending,
            interviews: Vec::new(),
        })
    }

    fn interview(parent: &str, scheduled_at: &str) -> CanonicalRecord {
        CanonicalRecord::Interview(CanonicalInterview {
            parent_ref: Some(parent.to_string()),
            scheduled_at: Some(scheduled_at.to_string()),
            kind: None,
            format: None,
            location: None,
            interviewer: None,
            note: None,
            status: InterviewStatus::Planned,
        })
    }

    #[tokio::test]
    async fn test_commit_empty_set() {
        let store = MemoryStore::new();
        let result = store.commit(&[]).await.unwrap();

        assert!(result.success);
        assert_eq!(result.imported_count, 0);
        assert_eq!(result.skipped_count, 0);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_commit_applications() {
        let store = MemoryStore::new();
        let result = store
            .commit(&[application("Acme", "Dev"), application("Globex", "PM")])
            .await
            .unwrap();

        assert_eq!(result.imported_count, 2);
        assert_eq!(store.applications().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_application_skipped() {
        let store = MemoryStore::new();
        store.commit(&[application("Acme", "Dev")]).await.unwrap();
        let result = store.commit(&[application("ACME", "dev")]).await.unwrap();

        assert_eq!(result.imported_count, 0);
        assert_eq!(result.skipped_count, 1);
        assert!(result.errors[0].contains("duplicate"));
    }

    #[tokio::test]
    async fn test_incomplete_application_reported() {
        let store = MemoryStore::new();
        let mut record = application("Acme", "Dev");
        if let CanonicalRecord::Application(app) = &mut record {
            app.position = None;
        }
        let result = store.commit(&[record]).await.unwrap();

        assert_eq!(result.imported_count, 0);
        assert_eq!(result.skipped_count, 1);
        assert!(result.errors[0].contains("row 1"));
    }

    #[tokio::test]
    async fn test_standalone_interview_needs_parent() {
        let store = MemoryStore::new();

        let orphan = store.commit(&[interview("Acme", "2025-01-20")]).await.unwrap();
        assert_eq!(orphan.imported_count, 0);
        assert_eq!(orphan.skipped_count, 1);

        store.commit(&[application("Acme", "Dev")]).await.unwrap();
        let attached = store.commit(&[interview("acme", "2025-01-20")]).await.unwrap();
        assert_eq!(attached.imported_count, 1);
    }

    #[tokio::test]
    async fn test_same_day_interview_duplicate() {
        let store = MemoryStore::new();
        store.commit(&[application("Acme", "Dev")]).await.unwrap();
        store
            .commit(&[interview("Acme", "2025-01-20T10:00:00")])
            .await
            .unwrap();

        let result = store
            .commit(&[interview("Acme", "2025-01-20T16:00:00")])
            .await
            .unwrap();
        assert_eq!(result.imported_count, 0);
        assert_eq!(result.skipped_count, 1);
    }
}
