// Forbidden-word matching with leet-speak de-obfuscation.
//
// Text is normalized, run through the leet map ("p0rn0" -> "porno"), and
// split into word tokens. Blacklist entries are normalized (but not
// de-leeted) when the filter is built, so "coño" in the word list matches
// "cono", "COÑO" and "c0ño" alike. Entries containing mapped digits can
// never match and should be written in plain letters.

use std::collections::{HashMap, HashSet};

use super::normalize::normalize;

/// Default forbidden words and phrases (Spanish profanity).
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "puto",
    "puta",
    "mierda",
    "joder",
    "coño",
    "hostia",
    "polla",
    "pene",
    "órgano",
    "porno",
    "porn",
    "follar",
    "cojones",
    "hijo de puta",
];

/// Default look-alike substitutions applied before matching.
pub const DEFAULT_LEET_MAP: &[(char, char)] = &[
    ('4', 'a'),
    ('3', 'e'),
    ('1', 'i'),
    ('0', 'o'),
    ('5', 's'),
    ('@', 'a'),
    ('$', 's'),
    ('¥', 'y'),
];

/// Character substitution table for leet-speak de-obfuscation.
#[derive(Debug, Clone)]
pub struct LeetMap {
    table: HashMap<char, char>,
}

impl LeetMap {
    pub fn new(pairs: &[(char, char)]) -> Self {
        Self {
            table: pairs.iter().copied().collect(),
        }
    }

    /// Replace every mapped character; everything else passes through.
    pub fn translate(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.table.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

impl Default for LeetMap {
    fn default() -> Self {
        Self::new(DEFAULT_LEET_MAP)
    }
}

/// A compiled blacklist: single words for O(1) token lookup, and
/// multi-word phrases matched against consecutive tokens.
#[derive(Debug, Clone)]
pub struct Blacklist {
    words: HashSet<String>,
    phrases: Vec<Vec<String>>,
}

impl Blacklist {
    /// Compile raw entries into normalized tokens.
    /// Entries that normalize to nothing are dropped.
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut words = HashSet::new();
        let mut phrases = Vec::new();

        for entry in entries {
            let canonical = normalize(entry.as_ref());
            let tokens: Vec<String> = tokenize(&canonical)
                .into_iter()
                .map(str::to_string)
                .collect();
            match tokens.len() {
                0 => {}
                1 => {
                    words.extend(tokens);
                }
                _ => phrases.push(tokens),
            }
        }

        Self { words, phrases }
    }

    /// True when any token is a forbidden word, or any run of tokens
    /// spells out a forbidden phrase.
    pub fn matches(&self, tokens: &[&str]) -> bool {
        if tokens.iter().any(|t| self.words.contains(*t)) {
            return true;
        }
        self.phrases.iter().any(|phrase| {
            tokens
                .windows(phrase.len())
                .any(|window| window.iter().zip(phrase).all(|(a, b)| *a == b))
        })
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split on anything that isn't a word character (letters, digits, `_`).
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_blacklist() -> Blacklist {
        Blacklist::new(DEFAULT_BLACKLIST)
    }

    #[test]
    fn test_leet_translate() {
        let leet = LeetMap::default();
        assert_eq!(leet.translate("p0rn0"), "porno");
        assert_eq!(leet.translate("$3x0 @ 5"), "sexo a s");
        assert_eq!(leet.translate("hola"), "hola");
    }

    #[test]
    fn test_tokenize_word_boundaries() {
        assert_eq!(
            tokenize("¿qué tal, amigo_1?"),
            vec!["qué", "tal", "amigo_1"]
        );
        assert!(tokenize("  ... !!").is_empty());
    }

    #[test]
    fn test_accented_entry_is_normalized() {
        let bl = default_blacklist();
        assert!(bl.matches(&["cono"]));
        assert!(bl.matches(&["organo"]));
    }

    #[test]
    fn test_entries_are_not_deleeted() {
        let bl = Blacklist::new(&["f4ll4r"]);
        // "fallar" is an ordinary word; only the literal entry token exists
        assert!(!bl.matches(&["fallar"]));
        assert!(bl.matches(&["f4ll4r"]));
    }

    #[test]
    fn test_phrase_needs_consecutive_tokens() {
        let bl = Blacklist::new(&["hijo de puta"]);
        assert!(bl.matches(&["eres", "un", "hijo", "de", "puta"]));
        assert!(!bl.matches(&["hijo", "de", "pedro"]));
        assert!(!bl.matches(&["hijo", "puta", "de"]));
    }

    #[test]
    fn test_substrings_do_not_match() {
        let bl = default_blacklist();
        assert!(!bl.matches(&["computadora"]));
        assert!(!bl.matches(&["penelope"]));
    }

    #[test]
    fn test_empty_entries_dropped() {
        let bl = Blacklist::new(&["", "  ", "..."]);
        assert!(bl.is_empty());
    }
}
