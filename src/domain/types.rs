// ==========================================
// JobTracker Import Engine - Domain Types
// ==========================================
// Canonical status vocabularies shared by the
// normalization pipeline and the export surface.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Application Status
// ==========================================
// Safe default is Pending: unknown status text never rejects a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending, // waiting for an answer
    Positive,   // offer / positive answer
    Negative,   // rejection
    NoResponse, // employer went silent
}

impl ApplicationStatus {
    /// Canonical wire tag, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Positive => "positive",
            ApplicationStatus::Negative => "negative",
            ApplicationStatus::NoResponse => "no_response",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Interview Status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Planned,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Planned => "planned",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Target Schema
// ==========================================
// An import dataset targets exactly one of the two canonical entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSchema {
    Application,
    Interview,
}

impl fmt::Display for TargetSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSchema::Application => write!(f, "application"),
            TargetSchema::Interview => write!(f, "interview"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
        assert_eq!(InterviewStatus::default(), InterviewStatus::Planned);
    }

    #[test]
    fn test_status_serde_tags() {
        let json = serde_json::to_string(&ApplicationStatus::NoResponse).unwrap();
        assert_eq!(json, "\"no_response\"");

        let status: InterviewStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, InterviewStatus::Cancelled);
    }
}
