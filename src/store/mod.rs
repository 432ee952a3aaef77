// ==========================================
// JobTracker Import Engine - Persistence Boundary
// ==========================================
// The engine never owns persisted state: committing the normalized set
// goes through this collaborator trait. Transport (REST, database,
// file) is the implementor's business; the engine only needs the
// commit signature and the ImportResult shape back.
// ==========================================

use crate::domain::record::{CanonicalRecord, ImportResult};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Persistence collaborator error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("persistence rejected the batch: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// RecordStore Trait
// ==========================================
// Contract notes:
// - the whole normalized set arrives in a single call; partial-failure
//   semantics (per-row skips, duplicates) are the implementor's and are
//   reported through the returned ImportResult's counts and errors
// - committing an empty set must return imported_count = 0 without
//   erroring
// - the engine performs no deduplication; importing the same dataset
//   twice is two independent commits
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn commit(&self, records: &[CanonicalRecord]) -> Result<ImportResult, StoreError>;
}

// A shared reference commits like the store it points at, so one store
// can outlive several sessions.
#[async_trait]
impl<'a, S: RecordStore + ?Sized> RecordStore for &'a S {
    async fn commit(&self, records: &[CanonicalRecord]) -> Result<ImportResult, StoreError> {
        (**self).commit(records).await
    }
}
