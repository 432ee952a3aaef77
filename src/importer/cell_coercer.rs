// ==========================================
// JobTracker Import Engine - Cell Value Coercer
// ==========================================
// Converts one raw cell into a typed value given a declared target type.
// Pure and total: unresolvable enum text degrades to the conservative
// default, unparseable dates pass through as-is. Never errors.
// ==========================================

use crate::domain::types::{ApplicationStatus, InterviewStatus};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// CellValue - tokenizer boundary union
// ==========================================
// Closed tagged union handed over by the tokenizers; the coercer
// pattern-matches exhaustively instead of probing runtime types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// Empty for row-skipping purposes: null or blank text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ==========================================
// Target types and coercion output
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Text,
    Date,
    ApplicationStatus,
    InterviewStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Null,
    Text(String),
    /// ISO-8601 timestamp, or the raw source string when it did not parse.
    Timestamp(String),
    ApplicationStatus(ApplicationStatus),
    InterviewStatus(InterviewStatus),
}

impl CoercedValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            CoercedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_timestamp(self) -> Option<String> {
        match self {
            CoercedValue::Timestamp(s) => Some(s),
            _ => None,
        }
    }
}

// ==========================================
// Text folding
// ==========================================

/// Trim + lowercase + strip Latin diacritics. Shared by the status tables
/// here and by the field resolver's header normalization.
pub(crate) fn fold_text(input: &str) -> String {
    input.trim().to_lowercase().chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

// ==========================================
// CellCoercer
// ==========================================

/// Spreadsheet serial dates count days from this epoch (the usual
/// 1900-system epoch, shifted two days to absorb the leap-year quirk).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Numbers below this are day counts; at or above, epoch milliseconds.
const SERIAL_CUTOFF: f64 = 100_000.0;

pub struct CellCoercer;

impl CellCoercer {
    pub fn coerce(&self, raw: &CellValue, target: TargetType) -> CoercedValue {
        match target {
            TargetType::Text => self.coerce_text(raw),
            TargetType::Date => self.coerce_date(raw),
            TargetType::ApplicationStatus => {
                CoercedValue::ApplicationStatus(self.coerce_application_status(raw))
            }
            TargetType::InterviewStatus => {
                CoercedValue::InterviewStatus(self.coerce_interview_status(raw))
            }
        }
    }

    /// Text: trim, empty becomes Null, scalars are stringified.
    fn coerce_text(&self, raw: &CellValue) -> CoercedValue {
        match raw {
            CellValue::Null => CoercedValue::Null,
            CellValue::Bool(b) => CoercedValue::Text(b.to_string()),
            CellValue::Number(n) => CoercedValue::Text(format_number(*n)),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    CoercedValue::Null
                } else {
                    CoercedValue::Text(trimmed.to_string())
                }
            }
            CellValue::DateTime(dt) => CoercedValue::Text(dt.to_rfc3339()),
        }
    }

    /// Date: typed datetimes and numbers resolve to ISO-8601; strings pass
    /// through (normalized when a tolerant format matches, verbatim when
    /// nothing does - downstream may still reject them, this layer never
    /// throws).
    fn coerce_date(&self, raw: &CellValue) -> CoercedValue {
        match raw {
            CellValue::Null => CoercedValue::Null,
            CellValue::Bool(_) => CoercedValue::Null,
            CellValue::DateTime(dt) => CoercedValue::Timestamp(dt.to_rfc3339()),
            CellValue::Number(n) => match number_to_iso(*n) {
                Some(iso) => CoercedValue::Timestamp(iso),
                None => CoercedValue::Timestamp(format_number(*n)),
            },
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return CoercedValue::Null;
                }
                match parse_date_string(trimmed) {
                    Some(iso) => CoercedValue::Timestamp(iso),
                    None => CoercedValue::Timestamp(trimmed.to_string()),
                }
            }
        }
    }

    /// Application status table. Ordered: canonical tags first (coercion is
    /// idempotent on already-canonical input), then the substring rules,
    /// negative before positive. Unknown text falls back to Pending - a row
    /// is never rejected for its status text.
    fn coerce_application_status(&self, raw: &CellValue) -> ApplicationStatus {
        let text = match raw {
            CellValue::Text(s) => s,
            _ => return ApplicationStatus::Pending,
        };
        let folded = fold_text(text);
        if folded.is_empty() {
            return ApplicationStatus::Pending;
        }

        match folded.as_str() {
            "pending" => return ApplicationStatus::Pending,
            "positive" => return ApplicationStatus::Positive,
            "negative" => return ApplicationStatus::Negative,
            "no_response" => return ApplicationStatus::NoResponse,
            _ => {}
        }

        if contains_any(&folded, &["rejet", "refus", "negativ", "❌"]) {
            ApplicationStatus::Negative
        } else if contains_any(&folded, &["accept", "positiv", "offre", "✅"]) {
            ApplicationStatus::Positive
        } else if contains_any(&folded, &["attente", "pending", "⏳"]) {
            ApplicationStatus::Pending
        } else if contains_any(&folded, &["no_response", "sans reponse", "🔇"]) {
            ApplicationStatus::NoResponse
        } else {
            ApplicationStatus::Pending
        }
    }

    /// Interview status table, same shape; default Planned.
    fn coerce_interview_status(&self, raw: &CellValue) -> InterviewStatus {
        let text = match raw {
            CellValue::Text(s) => s,
            _ => return InterviewStatus::Planned,
        };
        let folded = fold_text(text);
        if folded.is_empty() {
            return InterviewStatus::Planned;
        }

        match folded.as_str() {
            "planned" => return InterviewStatus::Planned,
            "completed" => return InterviewStatus::Completed,
            "cancelled" => return InterviewStatus::Cancelled,
            _ => {}
        }

        if contains_any(&folded, &["realise", "effectu", "completed", "termine", "✅"]) {
            InterviewStatus::Completed
        } else if contains_any(&folded, &["annul", "cancel", "❌"]) {
            InterviewStatus::Cancelled
        } else {
            InterviewStatus::Planned
        }
    }

    /// Canonicalize interview kind vocabulary; unknown values pass through
    /// trimmed (the field stays free-form).
    pub fn canonical_interview_kind(&self, raw: &str) -> Option<String> {
        let folded = fold_text(raw);
        if folded.is_empty() {
            return None;
        }
        let canonical = match folded.as_str() {
            "rh" | "hr" | "ressources humaines" => "rh",
            "technique" | "technical" | "tech" => "technical",
            "manager" | "managerial" => "manager",
            "final" | "finale" => "final",
            "autre" | "other" => "other",
            _ => return Some(raw.trim().to_string()),
        };
        Some(canonical.to_string())
    }

    /// Canonicalize interview format vocabulary; unknown values pass through.
    pub fn canonical_interview_format(&self, raw: &str) -> Option<String> {
        let folded = fold_text(raw);
        if folded.is_empty() {
            return None;
        }
        let canonical = match folded.as_str() {
            "visio" | "video" | "visioconference" | "teams" | "zoom" | "meet" => "video",
            "telephone" | "phone" | "tel" => "phone",
            "presentiel" | "in_person" | "sur site" | "on site" | "onsite" => "in_person",
            _ => return Some(raw.trim().to_string()),
        };
        Some(canonical.to_string())
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Integer-valued floats print without the trailing ".0" so serialized
/// ids and year-like numbers keep their source shape.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Numeric date: spreadsheet serial day count below the cutoff (with the
/// fractional part mapping to time of day), epoch milliseconds above it.
fn number_to_iso(n: f64) -> Option<String> {
    if n < SERIAL_CUTOFF {
        let days = n.floor() as i64;
        let day_fraction = n - n.floor();
        let seconds = (day_fraction * 86_400.0).round() as i64;

        let (y, m, d) = SERIAL_EPOCH;
        let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
        let date = epoch.checked_add_signed(Duration::days(days))?;
        let datetime = date.and_hms_opt(0, 0, 0)? + Duration::seconds(seconds);
        Some(DateTime::<Utc>::from_naive_utc_and_offset(datetime, Utc).to_rfc3339())
    } else {
        // Legacy exports carry epoch milliseconds.
        Utc.timestamp_millis_opt(n as i64)
            .single()
            .map(|dt| dt.to_rfc3339())
    }
}

/// Tolerant date-string handling: already-ISO strings pass through
/// unchanged, space-separated datetimes get their separator normalized,
/// day-first dates convert to ISO. None means "not a date we recognize".
fn parse_date_string(s: &str) -> Option<String> {
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return Some(s.to_string());
    }
    if NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
        return Some(s.to_string());
    }
    if NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok() {
        return Some(s.replacen(' ', "T", 1));
    }
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        return Some(s.to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    None
}
