// ==========================================
// JobTracker Import Engine - Import Configuration
// ==========================================
// Injected, immutable configuration for the normalization pipeline:
// per-schema synonym tables and repeated-group detection settings.
// Built once (usually via Default) and passed to the session by value;
// nothing here is global mutable state.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Canonical field names
// ==========================================

/// Resolution targets for the application schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationField {
    Company,
    Position,
    ContractType,
    Location,
    Source,
    AppliedAt,
    JobUrl,
    Note,
    Status,
}

/// Resolution targets for the interview schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewField {
    ParentRef,
    ScheduledAt,
    Kind,
    Format,
    Location,
    Interviewer,
    Status,
    Note,
}

// ==========================================
// Synonym rules
// ==========================================
// Patterns are written in normalized form (lowercase, no diacritics);
// the resolver normalizes raw headers before matching. Table order is
// part of the contract: first matching rule wins, so compound rules
// must precede the generic exact ones they overlap with.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPattern {
    /// Whole normalized header equals the token.
    Exact(String),
    /// Normalized header contains every listed token (compound headers
    /// like "Date de candidature (postulé le)").
    ContainsAll(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct SynonymRule<F> {
    pub pattern: HeaderPattern,
    pub field: F,
}

#[derive(Debug, Clone)]
pub struct SynonymTable<F> {
    rules: Vec<SynonymRule<F>>,
}

impl<F: Copy> SynonymTable<F> {
    pub fn new(rules: Vec<SynonymRule<F>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SynonymRule<F>] {
        &self.rules
    }
}

/// Shorthand for building an Exact rule set over one field.
fn exact<F: Copy>(field: F, names: &[&str]) -> Vec<SynonymRule<F>> {
    names
        .iter()
        .map(|name| SynonymRule {
            pattern: HeaderPattern::Exact((*name).to_string()),
            field,
        })
        .collect()
}

fn contains_all<F>(field: F, tokens: &[&str]) -> SynonymRule<F> {
    SynonymRule {
        pattern: HeaderPattern::ContainsAll(tokens.iter().map(|t| (*t).to_string()).collect()),
        field,
    }
}

// ==========================================
// Repeated-group detection settings
// ==========================================

/// How the group detector matches the index inside a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexMatching {
    /// Source-faithful: the normalized header merely contains the digit
    /// string. Known to false-positive on unrelated numeric tokens.
    #[default]
    Contains,
    /// Stricter: the index must be the trailing token of the header.
    TrailingToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Highest embedded-interview index scanned for; bounds the scan to a
    /// small constant so cost stays linear in row-key count.
    pub max_index: u32,
    pub index_matching: IndexMatching,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_index: 5,
            index_matching: IndexMatching::default(),
        }
    }
}

// ==========================================
// ImportConfig
// ==========================================

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub application_fields: SynonymTable<ApplicationField>,
    pub interview_fields: SynonymTable<InterviewField>,
    pub group: GroupConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            application_fields: default_application_table(),
            interview_fields: default_interview_table(),
            group: GroupConfig::default(),
        }
    }
}

/// Built-in application synonyms (French-first, mirroring the legacy
/// export headers, with the English aliases the importer always accepted).
fn default_application_table() -> SynonymTable<ApplicationField> {
    let mut rules = Vec::new();

    // Compound date headers first: "Date de candidature", "Date (Postulé)".
    rules.push(contains_all(
        ApplicationField::AppliedAt,
        &["date", "candidature"],
    ));
    rules.push(contains_all(
        ApplicationField::AppliedAt,
        &["date", "postule"],
    ));

    rules.extend(exact(
        ApplicationField::Company,
        &["entreprise", "company", "societe"],
    ));
    rules.extend(exact(
        ApplicationField::Position,
        &["poste", "position", "job", "titre", "title"],
    ));
    rules.extend(exact(
        ApplicationField::ContractType,
        &["type_poste", "type", "contrat", "contract", "type de contrat"],
    ));
    rules.extend(exact(
        ApplicationField::Location,
        &["lieu", "location", "ville", "city"],
    ));
    rules.extend(exact(
        ApplicationField::Source,
        &["moyen", "source", "canal", "method", "channel"],
    ));
    rules.extend(exact(
        ApplicationField::AppliedAt,
        &["applied_date", "applied_at", "date"],
    ));
    rules.extend(exact(
        ApplicationField::JobUrl,
        &["lien", "link", "url", "job_url"],
    ));
    rules.extend(exact(
        ApplicationField::Note,
        &["commentaire", "comment", "note", "notes"],
    ));
    rules.extend(exact(
        ApplicationField::Status,
        &["reponse", "statut", "status", "response", "etat"],
    ));

    SynonymTable::new(rules)
}

/// Built-in interview synonyms (standalone interview-only imports).
fn default_interview_table() -> SynonymTable<InterviewField> {
    let mut rules = Vec::new();

    rules.push(contains_all(
        InterviewField::ScheduledAt,
        &["date", "entretien"],
    ));

    rules.extend(exact(
        InterviewField::ParentRef,
        &["candidature_id", "candidature", "parent", "parent_id"],
    ));
    rules.extend(exact(
        InterviewField::ParentRef,
        &["entreprise", "company", "societe"],
    ));
    rules.extend(exact(
        InterviewField::ScheduledAt,
        &["interview_date", "scheduled_at", "date"],
    ));
    rules.extend(exact(
        InterviewField::Kind,
        &["type_entretien", "type", "kind"],
    ));
    rules.extend(exact(InterviewField::Format, &["format_entretien", "format"]));
    rules.extend(exact(
        InterviewField::Location,
        &["lieu_lien", "lieu/lien", "lieu", "location"],
    ));
    rules.extend(exact(
        InterviewField::Interviewer,
        &["interviewer", "recruteur", "contact"],
    ));
    rules.extend(exact(InterviewField::Status, &["statut", "status"]));
    rules.extend(exact(
        InterviewField::Note,
        &["commentaire", "comment", "note", "notes"],
    ));

    SynonymTable::new(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_not_empty() {
        let config = ImportConfig::default();
        assert!(!config.application_fields.rules().is_empty());
        assert!(!config.interview_fields.rules().is_empty());
    }

    #[test]
    fn test_compound_rules_precede_generic_date() {
        // "date" alone must resolve through the exact rule, but compound
        // candidature headers must hit the ContainsAll rule first.
        let config = ImportConfig::default();
        let first = &config.application_fields.rules()[0];
        assert!(matches!(first.pattern, HeaderPattern::ContainsAll(_)));
        assert_eq!(first.field, ApplicationField::AppliedAt);
    }

    #[test]
    fn test_group_config_defaults() {
        let group = GroupConfig::default();
        assert_eq!(group.max_index, 5);
        assert_eq!(group.index_matching, IndexMatching::Contains);
    }
}
