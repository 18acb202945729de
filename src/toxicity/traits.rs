// Toxicity scorer trait — the seam between the gate and whichever external
// classifier is configured.

use anyhow::Result;
use async_trait::async_trait;

/// Scores a single piece of text for toxicity. Implementations are expected
/// to call out over the network, so they are async and may fail; the gate
/// decides what a failure means.
#[async_trait]
pub trait ToxicityScorer: Send + Sync {
    /// Return a toxicity score from 0.0 (benign) to 1.0 (very toxic).
    async fn score_text(&self, text: &str) -> Result<f64>;
}
