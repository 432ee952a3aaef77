// ==========================================
// JobTracker Import Engine - Repeated-Group Detector
// ==========================================
// Finds embedded interview column families inside one application row:
// "Date Entretien 1", "Type Entretien 1", ..., "Date Entretien N".
// An index exists only if its date key exists - an interview group
// without a date is meaningless and is discarded here. The scan is
// bounded by config.max_index so cost stays linear in row-key count.
// ==========================================

use crate::config::{GroupConfig, IndexMatching};
use crate::importer::cell_coercer::fold_text;
use std::collections::BTreeMap;

// Marker tokens a sibling key must contain, per sub-field.
const DATE_MARKERS: [&str; 2] = ["date", "entretien"];
const KIND_MARKERS: [&str; 1] = ["type"];
const FORMAT_MARKERS: [&str; 1] = ["format"];
const LOCATION_MARKERS: [&str; 1] = ["lieu"];
const INTERVIEWER_MARKERS: [&str; 2] = ["interviewer", "recruteur"];
const STATUS_MARKERS: [&str; 2] = ["statut", "status"];
const NOTE_MARKERS: [&str; 2] = ["commentaire", "note"];

/// Raw column names of one detected interview group. Only the date key is
/// guaranteed; every other sub-field is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewGroupKeys {
    pub date_key: String,
    pub kind_key: Option<String>,
    pub format_key: Option<String>,
    pub location_key: Option<String>,
    pub interviewer_key: Option<String>,
    pub status_key: Option<String>,
    pub note_key: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum MarkerMode {
    All,
    Any,
}

pub struct GroupDetector<'a> {
    config: &'a GroupConfig,
}

impl<'a> GroupDetector<'a> {
    pub fn new(config: &'a GroupConfig) -> Self {
        Self { config }
    }

    /// Scan the row's column names for indexed interview families.
    /// Returned map is index-ordered, which fixes the children's order.
    pub fn detect(&self, row_keys: &[&str]) -> BTreeMap<u32, InterviewGroupKeys> {
        // Fold every key once up front.
        let folded: Vec<(usize, String)> = row_keys
            .iter()
            .enumerate()
            .map(|(pos, key)| (pos, fold_text(key)))
            .collect();

        let mut groups = BTreeMap::new();
        for index in 1..=self.config.max_index {
            // The date family needs every marker token; sibling families
            // match any of their alternative tokens.
            let date_key =
                self.find_key(&folded, row_keys, &DATE_MARKERS, MarkerMode::All, index, &[]);
            let Some(date_key) = date_key else {
                continue;
            };

            // Sibling keys are located the same way, each with its own
            // marker tokens; the date key itself is excluded so e.g. a
            // "statut" marker never re-claims it.
            let taken = [date_key.as_str()];
            let any = MarkerMode::Any;
            groups.insert(
                index,
                InterviewGroupKeys {
                    kind_key: self.find_key(&folded, row_keys, &KIND_MARKERS, any, index, &taken),
                    format_key: self.find_key(&folded, row_keys, &FORMAT_MARKERS, any, index, &taken),
                    location_key: self
                        .find_key(&folded, row_keys, &LOCATION_MARKERS, any, index, &taken),
                    interviewer_key: self
                        .find_key(&folded, row_keys, &INTERVIEWER_MARKERS, any, index, &taken),
                    status_key: self.find_key(&folded, row_keys, &STATUS_MARKERS, any, index, &taken),
                    note_key: self.find_key(&folded, row_keys, &NOTE_MARKERS, any, index, &taken),
                    date_key,
                },
            );
        }
        groups
    }

    /// First key (in column order) whose folded form hits the marker
    /// tokens and matches the index under the configured strictness.
    fn find_key(
        &self,
        folded: &[(usize, String)],
        row_keys: &[&str],
        markers: &[&str],
        mode: MarkerMode,
        index: u32,
        excluded: &[&str],
    ) -> Option<String> {
        let index_token = index.to_string();
        folded
            .iter()
            .find(|(pos, folded_key)| {
                let original = row_keys[*pos];
                if excluded.contains(&original) {
                    return false;
                }
                let marker_hit = match mode {
                    MarkerMode::All => markers.iter().all(|m| folded_key.contains(m)),
                    MarkerMode::Any => markers.iter().any(|m| folded_key.contains(m)),
                };
                marker_hit && self.index_matches(folded_key, &index_token)
            })
            .map(|(pos, _)| row_keys[*pos].to_string())
    }

    fn index_matches(&self, folded_key: &str, index_token: &str) -> bool {
        match self.config.index_matching {
            // Source-faithful: naive containment of the digit string.
            // Known to false-positive on unrelated numeric tokens.
            IndexMatching::Contains => folded_key.contains(index_token),
            IndexMatching::TrailingToken => folded_key
                .rsplit(|c: char| c.is_whitespace() || c == '_' || c == '-')
                .next()
                .map(|last| last == index_token)
                .unwrap_or(false),
        }
    }
}
