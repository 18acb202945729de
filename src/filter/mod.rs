// Local filter — the no-network heuristic pass over a submission.
//
// Every detector always runs; a verdict carries the full list of reasons
// in detector order rather than stopping at the first hit. Nothing in here
// touches the network or the store, so it can back a client-side
// pre-check as well as the moderation batch.

pub mod blacklist;
pub mod detectors;
pub mod normalize;

use std::sync::LazyLock;

use serde::Serialize;

use self::blacklist::{Blacklist, LeetMap, DEFAULT_BLACKLIST, DEFAULT_LEET_MAP};
use self::detectors::Reason;
pub use self::normalize::normalize;

pub const DEFAULT_MIN_LENGTH: usize = 3;
pub const DEFAULT_MAX_LENGTH: usize = 500;

/// Tunables for the local filter.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Forbidden words and phrases, in any casing or accenting.
    pub blacklist: Vec<String>,
    /// Look-alike substitutions applied to text before blacklist matching.
    pub leet_map: Vec<(char, char)>,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blacklist: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
            leet_map: DEFAULT_LEET_MAP.to_vec(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Outcome of the local filter for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterVerdict {
    pub reasons: Vec<Reason>,
}

impl FilterVerdict {
    pub fn is_clean(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Reasons as stored in the audit trail: `"a, b, c"`.
    pub fn joined_reasons(&self) -> String {
        self.reasons
            .iter()
            .map(Reason::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A compiled local filter. Build once, check many.
#[derive(Debug, Clone)]
pub struct LocalFilter {
    blacklist: Blacklist,
    leet: LeetMap,
    min_length: usize,
    max_length: usize,
}

impl LocalFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            blacklist: Blacklist::new(config.blacklist.as_slice()),
            leet: LeetMap::new(&config.leet_map),
            min_length: config.min_length,
            max_length: config.max_length,
        }
    }

    /// Run all five detectors over `text` and collect what fired.
    pub fn check(&self, text: &str) -> FilterVerdict {
        let normalized = normalize(text);
        let mut reasons = Vec::new();

        if detectors::contains_blacklisted(&normalized, &self.blacklist, &self.leet) {
            reasons.push(Reason::ForbiddenWord);
        }
        if detectors::has_excessive_repetition(&normalized) {
            reasons.push(Reason::ExcessiveRepetition);
        }
        if detectors::has_interleaved_symbols(text) {
            reasons.push(Reason::InterleavedSymbols);
        }
        if detectors::has_url_or_markup(text) {
            reasons.push(Reason::UrlOrCode);
        }
        if !detectors::length_within(text, self.min_length, self.max_length) {
            reasons.push(Reason::LengthOutOfBounds);
        }

        FilterVerdict { reasons }
    }
}

impl Default for LocalFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

static DEFAULT_FILTER: LazyLock<LocalFilter> = LazyLock::new(LocalFilter::default);

/// Check `text` against the built-in defaults.
pub fn local_filter(text: &str) -> FilterVerdict {
    DEFAULT_FILTER.check(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_question() {
        let verdict = local_filter("¿Cuándo abre la biblioteca?");
        assert!(verdict.is_clean());
        assert_eq!(verdict.joined_reasons(), "");
    }

    #[test]
    fn test_reasons_follow_detector_order() {
        // "www.spam.com" also reads as letter-symbol-letter
        let verdict = local_filter("mierda holaaaaa www.spam.com");
        assert_eq!(
            verdict.reasons,
            vec![
                Reason::ForbiddenWord,
                Reason::ExcessiveRepetition,
                Reason::InterleavedSymbols,
                Reason::UrlOrCode,
            ]
        );
        assert_eq!(
            verdict.joined_reasons(),
            "contains forbidden word or phrase, excessive character repetition, \
             interleaved symbols within words, possible URL or malicious code"
        );
    }

    #[test]
    fn test_custom_config() {
        let filter = LocalFilter::new(&FilterConfig {
            blacklist: vec!["brócoli".to_string()],
            leet_map: vec![('8', 'b')],
            min_length: 1,
            max_length: 10,
        });
        assert_eq!(filter.check("8rocoli").reasons, vec![Reason::ForbiddenWord]);
        assert!(filter.check("mierda").is_clean());
        assert_eq!(
            filter.check("una pregunta larga").reasons,
            vec![Reason::LengthOutOfBounds]
        );
    }

    #[test]
    fn test_obfuscated_with_zero_width_space() {
        let verdict = local_filter("eres un mi\u{200B}erda");
        assert!(verdict.reasons.contains(&Reason::ForbiddenWord));
    }
}
