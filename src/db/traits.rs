// Store trait — the backend-agnostic interface the moderation pipeline
// talks to.
//
// The pipeline receives an `Arc<dyn SubmissionStore>` at construction and
// never opens a connection itself, so tests can hand it an in-memory
// SQLite store or a fake that injects failures.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Decision, RunRecord, StatusCounts, Submission};

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    // --- Moderation ---

    /// Snapshot of every pending submission, in the order they should be
    /// processed. Rows that turn pending after this call are not included.
    async fn pending_submissions(&self) -> Result<Vec<Submission>>;

    /// Atomically move one pending submission to its terminal state,
    /// stamping `processed_at` on the store side. Fails if the submission
    /// is missing or no longer pending.
    async fn record_decision(&self, id: &str, decision: &Decision) -> Result<()>;

    // --- Intake and readers ---

    /// Create a pending submission and return its id.
    async fn insert_submission(&self, author: &str, text: &str) -> Result<String>;

    async fn get_submission(&self, id: &str) -> Result<Option<Submission>>;

    /// `(author, question)` pairs approved for display.
    async fn approved_questions(&self) -> Result<Vec<(String, String)>>;

    async fn status_counts(&self) -> Result<StatusCounts>;

    // --- Run log ---

    async fn record_run(&self, run: &RunRecord) -> Result<()>;

    async fn last_run(&self) -> Result<Option<RunRecord>>;
}
