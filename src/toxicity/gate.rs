// Toxicity gate — one scorer call plus a threshold comparison.
//
// The gate fails open: a scorer error, a timeout, or a score outside
// [0, 1] all come back as (0.0, not toxic) with a warning in the log.
// An outage of the classifier therefore approves whatever the local
// filter let through; that trade-off is deliberate and owned by product.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use super::traits::ToxicityScorer;

pub const DEFAULT_TOXICITY_THRESHOLD: f64 = 0.3;
pub const DEFAULT_SCORER_TIMEOUT: Duration = Duration::from_secs(10);

/// Score and verdict for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToxicityVerdict {
    pub score: f64,
    pub is_toxic: bool,
}

impl ToxicityVerdict {
    /// What the gate reports when it could not get a usable score.
    pub const FAIL_OPEN: ToxicityVerdict = ToxicityVerdict {
        score: 0.0,
        is_toxic: false,
    };
}

pub struct ToxicityGate {
    scorer: Arc<dyn ToxicityScorer>,
    threshold: f64,
    timeout: Duration,
}

impl ToxicityGate {
    pub fn new(scorer: Arc<dyn ToxicityScorer>, threshold: f64, timeout: Duration) -> Self {
        Self {
            scorer,
            threshold,
            timeout,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score `text` and compare against the threshold (`score >= threshold`
    /// is toxic). Never fails.
    pub async fn check(&self, text: &str) -> ToxicityVerdict {
        match tokio::time::timeout(self.timeout, self.scorer.score_text(text)).await {
            Ok(Ok(score)) if (0.0..=1.0).contains(&score) => ToxicityVerdict {
                score,
                is_toxic: score >= self.threshold,
            },
            Ok(Ok(score)) => {
                warn!(score, "Toxicity score outside [0, 1], treating as non-toxic");
                ToxicityVerdict::FAIL_OPEN
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Toxicity scoring failed, treating as non-toxic");
                ToxicityVerdict::FAIL_OPEN
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Toxicity scoring timed out, treating as non-toxic"
                );
                ToxicityVerdict::FAIL_OPEN
            }
        }
    }
}
