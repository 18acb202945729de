// Google Perspective API implementation.
//
// Only the TOXICITY attribute is requested. The API key travels in the
// `X-Goog-Api-Key` header rather than the query string so it never shows
// up in reqwest error messages or logs.
//
// API docs: https://developers.perspectiveapi.com/s/about-the-api-methods

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::ToxicityScorer;
use crate::output::truncate_chars;

pub const DEFAULT_PERSPECTIVE_URL: &str =
    "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

const TOXICITY_ATTRIBUTE: &str = "TOXICITY";

/// Perspective API toxicity scorer.
pub struct PerspectiveScorer {
    client: Client,
    api_key: String,
    endpoint: String,
    languages: Vec<String>,
}

impl PerspectiveScorer {
    /// Build a scorer whose requests give up after `timeout`.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("askguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            endpoint: DEFAULT_PERSPECTIVE_URL.to_string(),
            languages: Vec::new(),
        })
    }

    /// Point at a different analyze endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Hint the comment languages. Empty lets the service auto-detect.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }
}

#[async_trait]
impl ToxicityScorer for PerspectiveScorer {
    async fn score_text(&self, text: &str) -> Result<f64> {
        let request = analyze_request(text, &self.languages);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call Perspective API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Perspective API returned {}: {}", status, body);
        }

        let result: PerspectiveResponse = response
            .json()
            .await
            .context("Failed to parse Perspective API response")?;

        let toxicity = extract_toxicity(&result)?;

        debug!(
            toxicity,
            text_preview = %truncate_chars(text, 50),
            "Scored text"
        );

        Ok(toxicity)
    }
}

fn analyze_request(text: &str, languages: &[String]) -> PerspectiveRequest {
    let mut requested_attributes = HashMap::new();
    requested_attributes.insert(TOXICITY_ATTRIBUTE.to_string(), AttributeConfig {});

    PerspectiveRequest {
        comment: Comment {
            text: text.to_string(),
        },
        requested_attributes,
        languages: languages.to_vec(),
    }
}

/// Pull the TOXICITY summary score out of a response.
fn extract_toxicity(response: &PerspectiveResponse) -> Result<f64> {
    response
        .attribute_scores
        .get(TOXICITY_ATTRIBUTE)
        .map(|score| score.summary_score.value)
        .context("Perspective API response has no TOXICITY score")
}

// --- Perspective API request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerspectiveRequest {
    comment: Comment,
    requested_attributes: HashMap<String, AttributeConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    languages: Vec<String>,
}

#[derive(Serialize)]
struct Comment {
    text: String,
}

#[derive(Serialize)]
struct AttributeConfig {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerspectiveResponse {
    #[serde(default)]
    attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Deserialize)]
struct SummaryScore {
    value: f64,
}
