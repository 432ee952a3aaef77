// ==========================================
// JobTracker Import Engine - Import API
// ==========================================
// User-facing command surface, independent of any particular UI:
// load_file / preview / confirm / cancel. Wraps the tokenizers and the
// import session; the persistence collaborator is injected.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfig;
use crate::domain::record::{ImportPreview, ImportResult};
use crate::domain::types::TargetSchema;
use crate::importer::file_parser::{FileKind, UniversalFileParser};
use crate::importer::session::ImportSession;
use crate::store::RecordStore;
use tracing::info;

pub struct ImportApi<S: RecordStore> {
    session: ImportSession<S>,
}

impl<S: RecordStore> ImportApi<S> {
    pub fn new(config: ImportConfig, store: S) -> Self {
        Self {
            session: ImportSession::new(config, store),
        }
    }

    /// Built-in synonym tables and group settings.
    pub fn with_defaults(store: S) -> Self {
        Self::new(ImportConfig::default(), store)
    }

    /// Tokenize the file content and build a preview of the normalized
    /// dataset. Nothing is persisted until confirm.
    pub fn load_file(
        &mut self,
        bytes: &[u8],
        kind: FileKind,
        schema: TargetSchema,
    ) -> ApiResult<ImportPreview> {
        let rows = UniversalFileParser.parse(bytes, kind)?;
        info!(
            session_id = %self.session.session_id(),
            rows = rows.len(),
            "file tokenized"
        );
        let preview = self.session.begin_preview(rows, schema)?;
        Ok(preview.clone())
    }

    /// Current preview, if the session holds one.
    pub fn preview(&self) -> Option<&ImportPreview> {
        self.session.preview()
    }

    /// Commit the full normalized set through the persistence
    /// collaborator. A collaborator failure is reported in the returned
    /// result (success = false), not as an Err; Err is reserved for
    /// illegal calls (nothing previewed, commit already running).
    pub async fn confirm(&mut self) -> ApiResult<ImportResult> {
        let result = self.session.confirm().await?;
        Ok(result)
    }

    /// Drop the current preview without side effects.
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    pub fn state_name(&self) -> &'static str {
        self.session.state_name()
    }

    pub fn store(&self) -> &S {
        self.session.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_csv_load_and_confirm() {
        let mut api = ImportApi::with_defaults(MemoryStore::new());

        let csv = "Entreprise,Poste,Réponse\nAcme,Dev,✅ Acceptée\nGlobex,PM,\n";
        let preview = api
            .load_file(csv.as_bytes(), FileKind::Csv, TargetSchema::Application)
            .unwrap();
        assert_eq!(preview.full.len(), 2);

        let result = api.confirm().await.unwrap();
        assert!(result.success);
        assert_eq!(result.imported_count, 2);
        assert_eq!(api.store().applications().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_discards_everything() {
        let mut api = ImportApi::with_defaults(MemoryStore::new());
        let csv = "Entreprise,Poste\nAcme,Dev\n";
        api.load_file(csv.as_bytes(), FileKind::Csv, TargetSchema::Application)
            .unwrap();

        api.cancel();
        assert!(api.preview().is_none());
        let err = api.confirm().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
        assert!(api.store().applications().is_empty());
    }

    #[test]
    fn test_garbage_file_reports_no_data() {
        let mut api = ImportApi::with_defaults(MemoryStore::new());
        let csv = "a,b\n1,2\n";
        let err = api
            .load_file(csv.as_bytes(), FileKind::Csv, TargetSchema::Application)
            .unwrap_err();
        assert!(matches!(err, ApiError::NoDataFound));
    }
}
