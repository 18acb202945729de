// The five local detectors. Each one is a pure predicate; the caller maps
// a `true` onto its fixed `Reason`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;

use super::blacklist::{tokenize, Blacklist, LeetMap};

/// Why a submission failed the local filter.
///
/// Variants are declared in evaluation order, which is also the order
/// reasons appear in a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    ForbiddenWord,
    ExcessiveRepetition,
    InterleavedSymbols,
    UrlOrCode,
    LengthOutOfBounds,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::ForbiddenWord => "contains forbidden word or phrase",
            Reason::ExcessiveRepetition => "excessive character repetition",
            Reason::InterleavedSymbols => "interleaved symbols within words",
            Reason::UrlOrCode => "possible URL or malicious code",
            Reason::LengthOutOfBounds => "length outside permitted bounds",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum run of one repeated character that counts as abuse.
pub const REPEAT_RUN: usize = 5;

static RE_SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*script\b").expect("valid script-tag regex"));

static RE_JS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid js-scheme regex"));

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[\w\-]+(?:\.[\w\-]+)+|www\.[\w\-]+(?:\.[\w\-]+)+")
        .expect("valid url regex")
});

/// Blacklist check over already-normalized text.
pub fn contains_blacklisted(normalized: &str, blacklist: &Blacklist, leet: &LeetMap) -> bool {
    let deleeted = leet.translate(normalized);
    let tokens = tokenize(&deleeted);
    blacklist.matches(&tokens)
}

/// True if any character (other than a newline) appears `REPEAT_RUN` or
/// more times in a row.
pub fn has_excessive_repetition(normalized: &str) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for c in normalized.chars() {
        if c == '\n' {
            prev = None;
            run = 0;
            continue;
        }
        if prev == Some(c) {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= REPEAT_RUN {
            return true;
        }
    }
    false
}

/// Letter, one or more symbols, letter: "p.u.t.o", "m*erda", "h-o-l-a".
///
/// Works on raw text. Any alphabetic character counts as a letter
/// (accents, ñ, non-Latin scripts); combining marks attach to the letter
/// before them. Digits and whitespace break the pattern.
pub fn has_interleaved_symbols(raw: &str) -> bool {
    let mut after_letter = false;
    let mut in_symbols = false;

    for c in raw.chars() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_alphabetic() {
            if in_symbols {
                return true;
            }
            after_letter = true;
        } else if c.is_numeric() || c.is_whitespace() {
            after_letter = false;
            in_symbols = false;
        } else if after_letter {
            after_letter = false;
            in_symbols = true;
        }
    }
    false
}

/// `<script`, `javascript:` or anything that looks like an http(s)/www URL.
pub fn has_url_or_markup(raw: &str) -> bool {
    RE_SCRIPT_TAG.is_match(raw) || RE_JS_SCHEME.is_match(raw) || RE_URL.is_match(raw)
}

/// Trimmed length in characters, inclusive bounds.
pub fn length_within(raw: &str, min: usize, max: usize) -> bool {
    let len = raw.trim().chars().count();
    (min..=max).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            Reason::ForbiddenWord.to_string(),
            "contains forbidden word or phrase"
        );
        assert_eq!(
            Reason::LengthOutOfBounds.as_str(),
            "length outside permitted bounds"
        );
    }

    #[test]
    fn test_repetition_threshold() {
        assert!(!has_excessive_repetition("holaaaa"));
        assert!(has_excessive_repetition("holaaaaa"));
        assert!(has_excessive_repetition("!!!!!!"));
        assert!(has_excessive_repetition("a     b"));
    }

    #[test]
    fn test_repetition_ignores_newlines() {
        assert!(!has_excessive_repetition("a\n\n\n\n\n\nb"));
        assert!(!has_excessive_repetition("aaa\naa"));
    }

    #[test]
    fn test_interleaved_symbols() {
        assert!(has_interleaved_symbols("p.u.t.o"));
        assert!(has_interleaved_symbols("m*erda"));
        assert!(has_interleaved_symbols("ñ--ñ"));
        assert!(!has_interleaved_symbols("Hola, ¿cómo estás?"));
        assert!(!has_interleaved_symbols("¡hola!"));
        assert!(!has_interleaved_symbols("a.1"));
        assert!(!has_interleaved_symbols("3.14 es pi"));
    }

    #[test]
    fn test_interleaved_symbols_with_decomposed_accent() {
        // "é" written as e + U+0301 must not look like a symbol
        assert!(!has_interleaved_symbols("cafe\u{0301}s"));
    }

    #[test]
    fn test_url_and_markup() {
        assert!(has_url_or_markup("mira http://malicioso.com"));
        assert!(has_url_or_markup("HTTPS://Example.ORG/path"));
        assert!(has_url_or_markup("entra en www.ejemplo.es"));
        assert!(has_url_or_markup("< SCRIPT>alert(1)"));
        assert!(has_url_or_markup("JavaScript:void(0)"));
        assert!(!has_url_or_markup("¿qué opinas de la web?"));
        assert!(!has_url_or_markup("http://localhost"));
    }

    #[test]
    fn test_internationalized_hosts() {
        assert!(has_url_or_markup("visita http://ñandú.com ya"));
        assert!(has_url_or_markup("https://пример.рф"));
        assert!(has_url_or_markup("mira www.9ñandú.1es hoy"));
    }

    #[test]
    fn test_length_bounds_inclusive() {
        assert!(length_within("abc", 3, 500));
        assert!(!length_within("ab", 3, 500));
        assert!(length_within("  abc  ", 3, 500));
        assert!(length_within(&"x".repeat(500), 3, 500));
        assert!(!length_within(&"x".repeat(501), 3, 500));
        // Characters, not bytes
        assert!(length_within("ñññ", 3, 3));
    }
}
