// ==========================================
// JobTracker Import Engine - Row Normalizer
// ==========================================
// Turns one raw row into a canonical record: resolve every column,
// coerce every value, unnest embedded interview groups, then apply the
// row-acceptance filter. Malformed cells degrade their value; they
// never abort the row. Rejections are explicit internally
// (RejectionReason) even though callers only see accepted records.
// ==========================================

use crate::config::{ApplicationField, ImportConfig, InterviewField};
use crate::domain::record::{CanonicalApplication, CanonicalInterview, CanonicalRecord, RejectionReason};
use crate::domain::types::{ApplicationStatus, InterviewStatus, TargetSchema};
use crate::importer::cell_coercer::{CellCoercer, CellValue, CoercedValue, TargetType};
use crate::importer::field_resolver::FieldResolver;
use crate::importer::file_parser::RawRow;
use crate::importer::group_detector::{GroupDetector, InterviewGroupKeys};
use chrono::Utc;

pub struct RowNormalizer<'a> {
    resolver: FieldResolver<'a>,
    detector: GroupDetector<'a>,
    coercer: CellCoercer,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self {
            resolver: FieldResolver::new(config),
            detector: GroupDetector::new(&config.group),
            coercer: CellCoercer,
        }
    }

    /// Normalize one raw row against the target schema.
    pub fn normalize_row(
        &self,
        row: &RawRow,
        schema: TargetSchema,
    ) -> Result<CanonicalRecord, RejectionReason> {
        match schema {
            TargetSchema::Application => self
                .normalize_application(row)
                .map(CanonicalRecord::Application),
            TargetSchema::Interview => self
                .normalize_interview(row)
                .map(CanonicalRecord::Interview),
        }
    }

    fn normalize_application(
        &self,
        row: &RawRow,
    ) -> Result<CanonicalApplication, RejectionReason> {
        let mut company = None;
        let mut position = None;
        let mut contract_type = None;
        let mut location = None;
        let mut source = None;
        let mut job_url = None;
        let mut note = None;
        let mut applied_at = None;
        let mut status = None;
        let mut resolved_any = false;

        for (name, value) in row.iter() {
            let Some(field) = self.resolver.resolve_application(name) else {
                continue;
            };
            resolved_any = true;
            match field {
                ApplicationField::Company => assign_text(&mut company, &self.coercer, value),
                ApplicationField::Position => assign_text(&mut position, &self.coercer, value),
                ApplicationField::ContractType => {
                    assign_text(&mut contract_type, &self.coercer, value)
                }
                ApplicationField::Location => assign_text(&mut location, &self.coercer, value),
                ApplicationField::Source => assign_text(&mut source, &self.coercer, value),
                ApplicationField::JobUrl => assign_text(&mut job_url, &self.coercer, value),
                ApplicationField::Note => assign_text(&mut note, &self.coercer, value),
                ApplicationField::AppliedAt => {
                    if applied_at.is_none() {
                        applied_at = self
                            .coercer
                            .coerce(value, TargetType::Date)
                            .into_timestamp();
                    }
                }
                ApplicationField::Status => {
                    if status.is_none() {
                        if let CoercedValue::ApplicationStatus(tag) =
                            self.coercer.coerce(value, TargetType::ApplicationStatus)
                        {
                            // Only a non-blank cell pins the status; blank
                            // cells fall back to the default below.
                            if !value.is_blank() {
                                status = Some(tag);
                            }
                        }
                    }
                }
            }
        }

        // Embedded interview column families.
        let keys = row.keys();
        let groups = self.detector.detect(&keys);
        let mut interviews = Vec::new();
        for group in groups.values() {
            if let Some(child) = self.materialize_child(row, group, company.as_deref()) {
                interviews.push(child);
            }
        }

        // Row-acceptance filter.
        if company.is_none() && position.is_none() {
            return Err(if resolved_any || !interviews.is_empty() {
                RejectionReason::MissingIdentity
            } else {
                RejectionReason::EmptyRow
            });
        }

        Ok(CanonicalApplication {
            company,
            position,
            contract_type,
            location,
            source,
            job_url,
            note,
            applied_at: applied_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            status: status.unwrap_or(ApplicationStatus::Pending),
            interviews,
        })
    }

    /// Build one embedded interview from a detected column group. A group
    /// whose date cell is blank or missing yields nothing - an interview
    /// without a date is dropped, the rest of the row is unaffected.
    fn materialize_child(
        &self,
        row: &RawRow,
        group: &InterviewGroupKeys,
        parent_company: Option<&str>,
    ) -> Option<CanonicalInterview> {
        let scheduled_at = row
            .get(&group.date_key)
            .and_then(|value| self.coercer.coerce(value, TargetType::Date).into_timestamp());
        scheduled_at.as_ref()?;

        let text_of = |key: &Option<String>| {
            key.as_deref()
                .and_then(|k| row.get(k))
                .and_then(|value| self.coercer.coerce(value, TargetType::Text).into_text())
        };

        let kind = text_of(&group.kind_key).and_then(|raw| self.coercer.canonical_interview_kind(&raw));
        let format = text_of(&group.format_key)
            .and_then(|raw| self.coercer.canonical_interview_format(&raw));

        let status = group
            .status_key
            .as_deref()
            .and_then(|k| row.get(k))
            .filter(|value| !value.is_blank())
            .map(|value| {
                match self.coercer.coerce(value, TargetType::InterviewStatus) {
                    CoercedValue::InterviewStatus(tag) => tag,
                    _ => InterviewStatus::Planned,
                }
            })
            .unwrap_or(InterviewStatus::Planned);

        Some(CanonicalInterview {
            parent_ref: parent_company.map(|c| c.to_string()),
            scheduled_at,
            kind,
            format,
            location: text_of(&group.location_key),
            interviewer: text_of(&group.interviewer_key),
            note: text_of(&group.note_key),
            status,
        })
    }

    fn normalize_interview(&self, row: &RawRow) -> Result<CanonicalInterview, RejectionReason> {
        let mut parent_ref = None;
        let mut scheduled_at = None;
        let mut kind = None;
        let mut format = None;
        let mut location = None;
        let mut interviewer = None;
        let mut note = None;
        let mut status = None;
        let mut resolved_any = false;

        for (name, value) in row.iter() {
            let Some(field) = self.resolver.resolve_interview(name) else {
                continue;
            };
            resolved_any = true;
            match field {
                InterviewField::ParentRef => assign_text(&mut parent_ref, &self.coercer, value),
                InterviewField::ScheduledAt => {
                    if scheduled_at.is_none() {
                        scheduled_at = self
                            .coercer
                            .coerce(value, TargetType::Date)
                            .into_timestamp();
                    }
                }
                InterviewField::Kind => {
                    if kind.is_none() {
                        kind = self
                            .coercer
                            .coerce(value, TargetType::Text)
                            .into_text()
                            .and_then(|raw| self.coercer.canonical_interview_kind(&raw));
                    }
                }
                InterviewField::Format => {
                    if format.is_none() {
                        format = self
                            .coercer
                            .coerce(value, TargetType::Text)
                            .into_text()
                            .and_then(|raw| self.coercer.canonical_interview_format(&raw));
                    }
                }
                InterviewField::Location => assign_text(&mut location, &self.coercer, value),
                InterviewField::Interviewer => assign_text(&mut interviewer, &self.coercer, value),
                InterviewField::Note => assign_text(&mut note, &self.coercer, value),
                InterviewField::Status => {
                    if status.is_none() && !value.is_blank() {
                        if let CoercedValue::InterviewStatus(tag) =
                            self.coercer.coerce(value, TargetType::InterviewStatus)
                        {
                            status = Some(tag);
                        }
                    }
                }
            }
        }

        // A schedule is mandatory; a parent reference alone is not enough
        // to make a row useful.
        if scheduled_at.is_none() {
            return Err(if resolved_any {
                RejectionReason::MissingSchedule
            } else {
                RejectionReason::EmptyRow
            });
        }

        Ok(CanonicalInterview {
            parent_ref,
            scheduled_at,
            kind,
            format,
            location,
            interviewer,
            note,
            status: status.unwrap_or(InterviewStatus::Planned),
        })
    }
}

/// First non-null text occurrence wins when several columns resolve to
/// the same field.
fn assign_text(slot: &mut Option<String>, coercer: &CellCoercer, value: &CellValue) {
    if slot.is_none() {
        *slot = coercer.coerce(value, TargetType::Text).into_text();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::RawRow;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn normalize(row: RawRow, schema: TargetSchema) -> Result<CanonicalRecord, RejectionReason> {
        let config = ImportConfig::default();
        RowNormalizer::new(&config).normalize_row(&row, schema)
    }

    #[test]
    fn test_basic_application_row() {
        let row = RawRow::from_pairs([
            ("Entreprise", text("Acme")),
            ("Poste", text("Dev")),
            ("Lieu", text("Paris")),
            ("Réponse", text("❌ Refusé")),
            ("date_candidature", text("2025-01-15")),
        ]);
        let record = normalize(row, TargetSchema::Application).unwrap();
        let app = record.as_application().unwrap();

        assert_eq!(app.company.as_deref(), Some("Acme"));
        assert_eq!(app.position.as_deref(), Some("Dev"));
        assert_eq!(app.location.as_deref(), Some("Paris"));
        assert_eq!(app.status, ApplicationStatus::Negative);
        assert_eq!(app.applied_at, "2025-01-15");
        assert!(app.interviews.is_empty());
    }

    #[test]
    fn test_embedded_interview_groups() {
        // The empty date of index 2 discards that group; index 1 survives.
        let row = RawRow::from_pairs([
            ("Entreprise", text("Acme")),
            ("Poste", text("Dev")),
            ("Date Entretien 1", text("2025-01-20")),
            ("Type Entretien 1", text("Technique")),
            ("Date Entretien 2", text("")),
        ]);
        let record = normalize(row, TargetSchema::Application).unwrap();
        let app = record.as_application().unwrap();

        assert_eq!(app.interviews.len(), 1);
        let child = &app.interviews[0];
        assert_eq!(child.scheduled_at.as_deref(), Some("2025-01-20"));
        assert_eq!(child.kind.as_deref(), Some("technical"));
        assert_eq!(child.parent_ref.as_deref(), Some("Acme"));
        assert_eq!(child.status, InterviewStatus::Planned);
    }

    #[test]
    fn test_identity_filter_rejects() {
        let row = RawRow::from_pairs([
            ("Lieu", text("Paris")),
            ("Commentaire", text("looked promising")),
        ]);
        assert_eq!(
            normalize(row, TargetSchema::Application),
            Err(RejectionReason::MissingIdentity)
        );
    }

    #[test]
    fn test_unrecognized_row_is_empty() {
        let row = RawRow::from_pairs([("couleur", text("bleu")), ("animal", text("chat"))]);
        assert_eq!(
            normalize(row, TargetSchema::Application),
            Err(RejectionReason::EmptyRow)
        );
    }

    #[test]
    fn test_company_only_is_accepted() {
        let row = RawRow::from_pairs([("Entreprise", text("Acme"))]);
        let record = normalize(row, TargetSchema::Application).unwrap();
        let app = record.as_application().unwrap();
        assert_eq!(app.company.as_deref(), Some("Acme"));
        assert_eq!(app.position, None);
    }

    #[test]
    fn test_unparseable_date_degrades() {
        let row = RawRow::from_pairs([
            ("Entreprise", text("Acme")),
            ("Poste", text("Dev")),
            ("date_candidature", text("mi-janvier")),
        ]);
        let record = normalize(row, TargetSchema::Application).unwrap();
        let app = record.as_application().unwrap();
        // Degraded, not dropped: the raw string is retained.
        assert_eq!(app.applied_at, "mi-janvier");
    }

    #[test]
    fn test_applied_at_defaults_to_now() {
        let row = RawRow::from_pairs([("Entreprise", text("Acme"))]);
        let record = normalize(row, TargetSchema::Application).unwrap();
        let app = record.as_application().unwrap();
        // Resolvable as RFC 3339, i.e. a real "now", not an empty string.
        assert!(chrono::DateTime::parse_from_rfc3339(&app.applied_at).is_ok());
    }

    #[test]
    fn test_standalone_interview_row() {
        let row = RawRow::from_pairs([
            ("Entreprise", text("Acme")),
            ("Date Entretien", text("2025-01-20 14:00:00")),
            ("Format", text("Visio")),
            ("Statut", text("✅ Effectué")),
        ]);
        let record = normalize(row, TargetSchema::Interview).unwrap();
        let itw = record.as_interview().unwrap();

        assert_eq!(itw.parent_ref.as_deref(), Some("Acme"));
        assert_eq!(itw.scheduled_at.as_deref(), Some("2025-01-20T14:00:00"));
        assert_eq!(itw.format.as_deref(), Some("video"));
        assert_eq!(itw.status, InterviewStatus::Completed);
    }

    #[test]
    fn test_interview_without_date_rejected() {
        let row = RawRow::from_pairs([("Entreprise", text("Acme")), ("Recruteur", text("Jo"))]);
        assert_eq!(
            normalize(row, TargetSchema::Interview),
            Err(RejectionReason::MissingSchedule)
        );
    }
}
