use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::filter::FilterConfig;
use crate::pipeline::ModerationSettings;
use crate::toxicity::gate::{DEFAULT_SCORER_TIMEOUT, DEFAULT_TOXICITY_THRESHOLD};
use crate::toxicity::perspective::DEFAULT_PERSPECTIVE_URL;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy. Every tunable has a
/// default; a value that is set but malformed is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub perspective_api_key: String,
    pub perspective_url: String,
    /// Language hints sent to Perspective (empty = auto-detect).
    pub perspective_languages: Vec<String>,
    /// Scores at or above this are rejected as toxic.
    pub toxicity_threshold: f64,
    /// Per-call deadline for the toxicity scorer.
    pub scorer_timeout: Duration,
    pub filter: FilterConfig,
    pub moderation: ModerationSettings,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` uses the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut filter = FilterConfig::default();
        if let Some(list) = get("ASKGUARD_BLACKLIST") {
            filter.blacklist = split_list(&list);
        }
        if let Some(pairs) = get("ASKGUARD_LEET_MAP") {
            filter.leet_map = parse_leet_map(&pairs)?;
        }
        if let Some(v) = get("MIN_LENGTH") {
            filter.min_length = parse_value("MIN_LENGTH", &v)?;
        }
        if let Some(v) = get("MAX_LENGTH") {
            filter.max_length = parse_value("MAX_LENGTH", &v)?;
        }
        if filter.min_length > filter.max_length {
            anyhow::bail!(
                "MIN_LENGTH ({}) is greater than MAX_LENGTH ({})",
                filter.min_length,
                filter.max_length
            );
        }

        let toxicity_threshold = match get("TOXICITY_THRESHOLD") {
            Some(v) => parse_value("TOXICITY_THRESHOLD", &v)?,
            None => DEFAULT_TOXICITY_THRESHOLD,
        };
        if !(0.0..=1.0).contains(&toxicity_threshold) {
            anyhow::bail!("TOXICITY_THRESHOLD must be between 0.0 and 1.0, got {toxicity_threshold}");
        }

        let mut moderation = ModerationSettings::default();
        if let Some(v) = get("SCORE_DELAY_MS") {
            moderation.score_delay = Duration::from_millis(parse_value("SCORE_DELAY_MS", &v)?);
        }
        if let Some(v) = get("STORE_READ_TIMEOUT_SECS") {
            moderation.store_read_timeout =
                Duration::from_secs(parse_value("STORE_READ_TIMEOUT_SECS", &v)?);
        }

        let scorer_timeout = match get("SCORER_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_value("SCORER_TIMEOUT_SECS", &v)?),
            None => DEFAULT_SCORER_TIMEOUT,
        };

        Ok(Self {
            db_path: get("ASKGUARD_DB_PATH").unwrap_or_else(|| "./askguard.db".to_string()),
            perspective_api_key: get("PERSPECTIVE_API_KEY").unwrap_or_default(),
            perspective_url: get("PERSPECTIVE_URL")
                .unwrap_or_else(|| DEFAULT_PERSPECTIVE_URL.to_string()),
            perspective_languages: get("PERSPECTIVE_LANGUAGES")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            toxicity_threshold,
            scorer_timeout,
            filter,
            moderation,
        })
    }

    /// Check that the Perspective API key is configured.
    /// Call this before any operation that needs toxicity scoring.
    pub fn require_perspective(&self) -> Result<()> {
        if self.perspective_api_key.is_empty() {
            anyhow::bail!(
                "PERSPECTIVE_API_KEY not set. Add it to your .env file.\n\
                 Moderation cannot run without the toxicity scorer."
            );
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value for {key}: '{raw}'"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `"4=a,3=e,@=a"` into substitution pairs.
fn parse_leet_map(raw: &str) -> Result<Vec<(char, char)>> {
    split_list(raw)
        .iter()
        .map(|pair| {
            let mut chars = pair.split('=').map(|side| {
                let mut it = side.trim().chars();
                match (it.next(), it.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            });
            match (chars.next().flatten(), chars.next().flatten(), chars.next()) {
                (Some(from), Some(to), None) => Ok((from, to)),
                _ => anyhow::bail!(
                    "Invalid ASKGUARD_LEET_MAP entry '{pair}': expected a single-character pair like 4=a"
                ),
            }
        })
        .collect()
}
