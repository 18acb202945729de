// Run-level failures of a moderation batch.
//
// Only failures that stop a whole run live here. A failed write for one
// submission is recorded in the run summary, and a toxicity-service failure
// never leaves the gate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModerationError {
    /// The pending-submission query did not answer within the read deadline.
    #[error("timed out after {0:?} reading pending submissions")]
    StoreReadTimeout(Duration),

    /// The pending-submission query failed outright.
    #[error("failed to read pending submissions: {0}")]
    StoreRead(String),
}

impl ModerationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ModerationError::StoreReadTimeout(_))
    }
}
