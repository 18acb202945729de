// Moderation batch: pending -> (local filter -> toxicity gate) -> store.
//
// The pending set is read once, under a deadline, into memory; the run
// then walks that fixed snapshot strictly in order. Submissions arriving
// mid-run wait for the next run. Each decision is a single conditional
// update in the store, and a failed write is recorded against that item
// while the run moves on to the next one.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::db::models::{Decision, RunRecord, Submission, SubmissionStatus};
use crate::db::SubmissionStore;
use crate::error::ModerationError;
use crate::filter::detectors::Reason;
use crate::filter::LocalFilter;
use crate::toxicity::gate::ToxicityGate;

pub const DEFAULT_SCORE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_STORE_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing knobs for a batch run.
#[derive(Debug, Clone, Copy)]
pub struct ModerationSettings {
    /// Pause after every toxicity-gate call, to stay under the scorer's
    /// rate limit. Items rejected locally are not delayed.
    pub score_delay: Duration,
    /// Deadline for the pending-submission query.
    pub store_read_timeout: Duration,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            score_delay: DEFAULT_SCORE_DELAY,
            store_read_timeout: DEFAULT_STORE_READ_TIMEOUT,
        }
    }
}

/// What happened to one submission during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Approved { toxicity_score: f64 },
    RejectedLocal { reasons: Vec<Reason> },
    RejectedToxic { toxicity_score: f64 },
    /// The decision was made but could not be written; the submission is
    /// still pending in the store.
    WriteFailed {
        intended: SubmissionStatus,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub id: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// End-of-run report. Counts only include decisions that were persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: u32,
    pub approved: u32,
    pub rejected: u32,
    pub failed: u32,
    pub items: Vec<ItemResult>,
}

impl RunSummary {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            total: 0,
            approved: 0,
            rejected: 0,
            failed: 0,
            items: Vec::new(),
        }
    }

    fn push(&mut self, id: &str, outcome: ItemOutcome) {
        self.total += 1;
        match outcome {
            ItemOutcome::Approved { .. } => self.approved += 1,
            ItemOutcome::RejectedLocal { .. } | ItemOutcome::RejectedToxic { .. } => {
                self.rejected += 1
            }
            ItemOutcome::WriteFailed { .. } => self.failed += 1,
        }
        self.items.push(ItemResult {
            id: id.to_string(),
            outcome,
        });
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn to_record(&self) -> RunRecord {
        RunRecord {
            started_at: self.started_at.to_rfc3339(),
            finished_at: self.finished_at.to_rfc3339(),
            total: self.total,
            approved: self.approved,
            rejected: self.rejected,
            failed: self.failed,
        }
    }
}

/// Drives one moderation batch against an injected store and gate.
pub struct Moderator {
    store: Arc<dyn SubmissionStore>,
    filter: LocalFilter,
    gate: ToxicityGate,
    settings: ModerationSettings,
    show_progress: bool,
}

impl Moderator {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        filter: LocalFilter,
        gate: ToxicityGate,
        settings: ModerationSettings,
    ) -> Self {
        Self {
            store,
            filter,
            gate,
            settings,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while the batch runs.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Moderate every submission that is pending right now.
    ///
    /// Fails only if the pending set cannot be read; everything after that
    /// ends up in the returned summary.
    pub async fn run_batch(&self) -> Result<RunSummary, ModerationError> {
        let mut summary = RunSummary::start();

        let deadline = self.settings.store_read_timeout;
        let pending = match tokio::time::timeout(deadline, self.store.pending_submissions()).await
        {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(ModerationError::StoreRead(format!("{e:#}"))),
            Err(_) => return Err(ModerationError::StoreReadTimeout(deadline)),
        };

        info!(count = pending.len(), "Pending submissions fetched");

        let pb = self.progress_bar(pending.len());
        for submission in &pending {
            let outcome = self.moderate_one(submission).await;
            summary.push(&submission.id, outcome);
            pb.inc(1);
        }
        pb.finish_and_clear();

        summary.finished_at = Utc::now();

        if let Err(e) = self.store.record_run(&summary.to_record()).await {
            warn!(error = %e, "Failed to record moderation run");
        }

        info!(
            total = summary.total,
            approved = summary.approved,
            rejected = summary.rejected,
            failed = summary.failed,
            "Moderation run complete"
        );

        Ok(summary)
    }

    async fn moderate_one(&self, submission: &Submission) -> ItemOutcome {
        let verdict = self.filter.check(&submission.text);

        if !verdict.is_clean() {
            let decision = Decision::Rejected {
                reason: verdict.joined_reasons(),
                toxicity_score: None,
            };
            let outcome = ItemOutcome::RejectedLocal {
                reasons: verdict.reasons,
            };
            return self.persist(&submission.id, decision, outcome).await;
        }

        let toxicity = self.gate.check(&submission.text).await;

        let (decision, outcome) = if toxicity.is_toxic {
            (
                Decision::Rejected {
                    reason: format!("toxicity detected: {:.4}", toxicity.score),
                    toxicity_score: Some(toxicity.score),
                },
                ItemOutcome::RejectedToxic {
                    toxicity_score: toxicity.score,
                },
            )
        } else {
            (
                Decision::Approved {
                    toxicity_score: toxicity.score,
                },
                ItemOutcome::Approved {
                    toxicity_score: toxicity.score,
                },
            )
        };

        let outcome = self.persist(&submission.id, decision, outcome).await;

        if !self.settings.score_delay.is_zero() {
            tokio::time::sleep(self.settings.score_delay).await;
        }

        outcome
    }

    async fn persist(&self, id: &str, decision: Decision, outcome: ItemOutcome) -> ItemOutcome {
        match self.store.record_decision(id, &decision).await {
            Ok(()) => {
                info!(
                    id,
                    status = %decision.status(),
                    reason = decision.rejection_reason().unwrap_or(""),
                    toxicity = ?decision.toxicity_score(),
                    "Submission moderated"
                );
                outcome
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to record decision, continuing with next submission");
                ItemOutcome::WriteFailed {
                    intended: decision.status(),
                    error: format!("{e:#}"),
                }
            }
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("  Moderating [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}
