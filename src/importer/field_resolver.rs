// ==========================================
// JobTracker Import Engine - Field Resolver
// ==========================================
// Maps a raw column name (arbitrary case/accents/language) to a
// canonical field using the injected per-schema synonym tables.
// Deterministic and explainable: first matching rule wins, table order
// is part of the contract. Unknown headers resolve to None and the
// caller ignores the column.
// ==========================================

use crate::config::{ApplicationField, HeaderPattern, ImportConfig, InterviewField, SynonymTable};
use crate::importer::cell_coercer::fold_text;

pub struct FieldResolver<'a> {
    application: &'a SynonymTable<ApplicationField>,
    interview: &'a SynonymTable<InterviewField>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self {
            application: &config.application_fields,
            interview: &config.interview_fields,
        }
    }

    /// Normalized form a header is matched under: trim + lowercase +
    /// diacritic fold.
    pub fn normalize_header(raw: &str) -> String {
        fold_text(raw)
    }

    pub fn resolve_application(&self, raw_name: &str) -> Option<ApplicationField> {
        resolve_in(self.application, raw_name)
    }

    pub fn resolve_interview(&self, raw_name: &str) -> Option<InterviewField> {
        resolve_in(self.interview, raw_name)
    }
}

fn resolve_in<F: Copy>(table: &SynonymTable<F>, raw_name: &str) -> Option<F> {
    let folded = fold_text(raw_name);
    if folded.is_empty() {
        return None;
    }

    for rule in table.rules() {
        let matched = match &rule.pattern {
            HeaderPattern::Exact(token) => folded == *token,
            HeaderPattern::ContainsAll(tokens) => {
                tokens.iter().all(|token| folded.contains(token.as_str()))
            }
        };
        if matched {
            return Some(rule.field);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_config() -> ImportConfig {
        ImportConfig::default()
    }

    #[test]
    fn test_company_case_and_diacritics() {
        let config = resolver_config();
        let resolver = FieldResolver::new(&config);

        for header in ["Entreprise", "entreprise", "ENTREPRISE", "Société", "company"] {
            assert_eq!(
                resolver.resolve_application(header),
                Some(ApplicationField::Company),
                "{}",
                header
            );
        }
    }

    #[test]
    fn test_compound_date_headers() {
        let config = resolver_config();
        let resolver = FieldResolver::new(&config);

        for header in [
            "date_candidature",
            "Date de candidature",
            "Date (Postulé)",
            "DATE CANDIDATURE",
        ] {
            assert_eq!(
                resolver.resolve_application(header),
                Some(ApplicationField::AppliedAt),
                "{}",
                header
            );
        }
        // Plain "date" still resolves through the generic exact rule.
        assert_eq!(
            resolver.resolve_application("Date"),
            Some(ApplicationField::AppliedAt)
        );
    }

    #[test]
    fn test_unknown_header_is_ignored() {
        let config = resolver_config();
        let resolver = FieldResolver::new(&config);

        assert_eq!(resolver.resolve_application("couleur préférée"), None);
        assert_eq!(resolver.resolve_application(""), None);
        assert_eq!(resolver.resolve_interview("salaire"), None);
    }

    #[test]
    fn test_interview_headers() {
        let config = resolver_config();
        let resolver = FieldResolver::new(&config);

        assert_eq!(
            resolver.resolve_interview("Date Entretien"),
            Some(InterviewField::ScheduledAt)
        );
        assert_eq!(
            resolver.resolve_interview("date_entretien"),
            Some(InterviewField::ScheduledAt)
        );
        assert_eq!(
            resolver.resolve_interview("Entreprise"),
            Some(InterviewField::ParentRef)
        );
        assert_eq!(
            resolver.resolve_interview("Recruteur"),
            Some(InterviewField::Interviewer)
        );
        assert_eq!(
            resolver.resolve_interview("Lieu/Lien"),
            Some(InterviewField::Location)
        );
    }

    #[test]
    fn test_status_aliases() {
        let config = resolver_config();
        let resolver = FieldResolver::new(&config);

        for header in ["reponse", "Réponse", "Statut", "status"] {
            assert_eq!(
                resolver.resolve_application(header),
                Some(ApplicationField::Status),
                "{}",
                header
            );
        }
    }
}
