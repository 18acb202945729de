// Data models — the types that flow between the store and the pipeline.
//
// Kept free of rusqlite so the moderation core and its tests can use them
// without a database.

use serde::{Deserialize, Serialize};

/// Moderation state of a submission. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    /// Parse the stored column value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SubmissionStatus::Pending),
            "approved" => Some(SubmissionStatus::Approved),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Opaque identifier assigned by the store.
    pub id: String,
    pub author: String,
    /// Raw question text, never rewritten.
    pub text: String,
    pub status: SubmissionStatus,
    /// Comma-joined reasons; only set when rejected.
    pub rejection_reason: Option<String>,
    /// Only set when the toxicity gate ran.
    pub toxicity_score: Option<f64>,
    pub created_at: String,
    pub processed_at: Option<String>,
}

/// The terminal decision written back for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approved {
        toxicity_score: f64,
    },
    /// `toxicity_score` is `None` when the local filter rejected the text
    /// and the gate never ran.
    Rejected {
        reason: String,
        toxicity_score: Option<f64>,
    },
}

impl Decision {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            Decision::Approved { .. } => SubmissionStatus::Approved,
            Decision::Rejected { .. } => SubmissionStatus::Rejected,
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Decision::Approved { .. } => None,
            Decision::Rejected { reason, .. } => Some(reason),
        }
    }

    pub fn toxicity_score(&self) -> Option<f64> {
        match self {
            Decision::Approved { toxicity_score } => Some(*toxicity_score),
            Decision::Rejected { toxicity_score, .. } => *toxicity_score,
        }
    }
}

/// Number of submissions in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// One finished batch run, as kept in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub started_at: String,
    pub finished_at: String,
    pub total: u32,
    pub approved: u32,
    pub rejected: u32,
    pub failed: u32,
}
