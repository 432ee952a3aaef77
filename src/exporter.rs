// ==========================================
// JobTracker Import Engine - Export Surface
// ==========================================
// Canonical records back out: a JSON envelope with embedded interviews,
// or the legacy ';'-separated CSV sheet. XLSX export is intentionally
// absent (the workbook dependency is a reader).
// ==========================================

use crate::domain::record::{CanonicalApplication, CanonicalInterview, CanonicalRecord};
use crate::importer::error::ImportError;
use chrono::Utc;
use csv::WriterBuilder;

/// JSON export envelope: applications (with their interviews embedded)
/// plus standalone interviews when the set carries any.
pub fn export_json(records: &[CanonicalRecord]) -> serde_json::Value {
    let applications: Vec<&CanonicalApplication> =
        records.iter().filter_map(|r| r.as_application()).collect();
    let interviews: Vec<&CanonicalInterview> =
        records.iter().filter_map(|r| r.as_interview()).collect();

    let mut envelope = serde_json::json!({
        "export_date": Utc::now().to_rfc3339(),
        "total_applications": applications.len(),
        "applications": applications,
    });
    if !interviews.is_empty() {
        envelope["interviews"] = serde_json::json!(interviews);
    }
    envelope
}

/// Legacy CSV sheet: ';' delimiter, every field quoted, dates truncated
/// to the day.
pub fn export_csv(records: &[CanonicalRecord]) -> Result<String, ImportError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record([
        "Entreprise",
        "Poste",
        "Type",
        "Lieu",
        "Moyen",
        "Date Candidature",
        "Lien",
        "Statut",
        "Commentaire",
    ])?;

    for record in records {
        let Some(app) = record.as_application() else {
            continue;
        };
        writer.write_record([
            app.company.as_deref().unwrap_or(""),
            app.position.as_deref().unwrap_or(""),
            app.contract_type.as_deref().unwrap_or(""),
            app.location.as_deref().unwrap_or(""),
            app.source.as_deref().unwrap_or(""),
            day_of(&app.applied_at),
            app.job_url.as_deref().unwrap_or(""),
            app.status.as_str(),
            app.note.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::CsvParseError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::CsvParseError(e.to_string()))
}

/// Calendar-day prefix of an ISO timestamp; degraded strings shorter
/// than a date are kept whole.
fn day_of(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ApplicationStatus;

    fn acme() -> CanonicalRecord {
        CanonicalRecord::Application(CanonicalApplication {
            company: Some("Acme".to_string()),
            position: Some("Dev".to_string()),
            contract_type: Some("cdi".to_string()),
            location: Some("Paris".to_string()),
            source: None,
            job_url: None,
            note: None,
            applied_at: "2025-01-15T10:30:00+00:00".to_string(),
            status: ApplicationStatus::Positive,
            interviews: Vec::new(),
        })
    }

    #[test]
    fn test_json_envelope() {
        let envelope = export_json(&[acme()]);
        assert_eq!(envelope["total_applications"], 1);
        assert_eq!(envelope["applications"][0]["entreprise"], "Acme");
        assert!(envelope.get("interviews").is_none());
    }

    #[test]
    fn test_csv_shape() {
        let csv = export_csv(&[acme()]).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Entreprise\";\"Poste\""));

        let row = lines.next().unwrap();
        assert!(row.contains("\"Acme\""));
        // Day-truncated date.
        assert!(row.contains("\"2025-01-15\""));
        assert!(!row.contains("10:30"));
        assert!(row.contains("\"positive\""));
    }

    #[test]
    fn test_csv_skips_interview_records() {
        use crate::domain::record::CanonicalInterview;
        use crate::domain::types::InterviewStatus;

        let itw = CanonicalRecord::Interview(CanonicalInterview {
            parent_ref: Some("Acme".to_string()),
            scheduled_at: Some("2025-01-20".to_string()),
            kind: None,
            format: None,
            location: None,
            interviewer: None,
            note: None,
            status: InterviewStatus::Planned,
        });
        let csv = export_csv(&[itw]).unwrap();
        assert_eq!(csv.lines().count(), 1); // header only
    }
}
