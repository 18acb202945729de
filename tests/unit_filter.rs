// Unit tests for the local filter as a whole.
//
// Covers the documented scenarios, the length boundaries, normalization
// idempotence and determinism, all without network or store access.

use askguard::filter::detectors::Reason;
use askguard::filter::{local_filter, normalize, FilterConfig, LocalFilter};

// ============================================================
// Scenarios
// ============================================================

#[test]
fn repeated_characters_are_flagged() {
    let verdict = local_filter("¡¡¡¡¡¡holaaaaaaa!!!!!!");
    assert!(!verdict.is_clean());
    assert!(verdict.reasons.contains(&Reason::ExcessiveRepetition));
}

#[test]
fn url_and_script_are_flagged() {
    let verdict = local_filter("Visita http://malicioso.com <script>alert(1)</script>");
    assert!(!verdict.is_clean());
    assert!(verdict.reasons.contains(&Reason::UrlOrCode));
}

#[test]
fn leet_and_literal_profanity_are_flagged() {
    let verdict = local_filter("p0t0 de mierda");
    assert!(!verdict.is_clean());
    assert!(verdict.reasons.contains(&Reason::ForbiddenWord));
    assert!(verdict
        .joined_reasons()
        .contains("contains forbidden word or phrase"));
}

#[test]
fn leet_only_profanity_is_flagged() {
    assert_eq!(local_filter("eres un put0").reasons, vec![Reason::ForbiddenWord]);
    assert_eq!(local_filter("qué c0ñ0 pasa").reasons, vec![Reason::ForbiddenWord]);
    assert_eq!(local_filter("m13rd4 total").reasons, vec![Reason::ForbiddenWord]);
}

#[test]
fn disguised_casing_and_width_are_flagged() {
    assert!(local_filter("HOSTIA ya").reasons.contains(&Reason::ForbiddenWord));
    assert!(local_filter("ｍｉｅｒｄａ").reasons.contains(&Reason::ForbiddenWord));
}

#[test]
fn phrase_entry_is_flagged() {
    let filter = LocalFilter::new(&FilterConfig {
        blacklist: vec!["hijo de puta".to_string()],
        ..FilterConfig::default()
    });
    assert_eq!(
        filter.check("menudo hijo de puta").reasons,
        vec![Reason::ForbiddenWord]
    );
    assert!(filter.check("el hijo de Pedro").is_clean());
}

#[test]
fn two_characters_only_fail_length() {
    assert_eq!(local_filter("OK").reasons, vec![Reason::LengthOutOfBounds]);
}

#[test]
fn friendly_question_is_clean() {
    let verdict = local_filter("Hola, ¿cómo estás?");
    assert!(verdict.is_clean());
    assert!(verdict.reasons.is_empty());
}

#[test]
fn dotted_obfuscation_is_flagged() {
    let verdict = local_filter("eres un p.u.t.o");
    assert_eq!(verdict.reasons, vec![Reason::InterleavedSymbols]);
}

#[test]
fn javascript_scheme_is_flagged() {
    let verdict = local_filter("javascript:alert(1)");
    assert!(verdict.reasons.contains(&Reason::UrlOrCode));
}

#[test]
fn non_ascii_hosts_are_flagged_as_urls() {
    for text in ["www.ñandú.es", "https://пример.рф", "mira www.9ñandú.1es hoy"] {
        let verdict = local_filter(text);
        assert!(
            verdict.reasons.contains(&Reason::UrlOrCode),
            "{text:?} gave {:?}",
            verdict.reasons
        );
    }
}

#[test]
fn all_reasons_reported_together() {
    // Nothing short-circuits: every detector contributes
    let text = format!("mierda!!!!! p-u-t-o www.x.com {}", "z".repeat(500));
    let verdict = local_filter(&text);
    assert_eq!(
        verdict.reasons,
        vec![
            Reason::ForbiddenWord,
            Reason::ExcessiveRepetition,
            Reason::InterleavedSymbols,
            Reason::UrlOrCode,
            Reason::LengthOutOfBounds,
        ]
    );
}

// ============================================================
// Length boundaries (defaults 3..=500)
// ============================================================

fn length_flagged(text: &str) -> bool {
    local_filter(text)
        .reasons
        .contains(&Reason::LengthOutOfBounds)
}

#[test]
fn length_exactly_min_passes() {
    assert!(!length_flagged("abc"));
}

#[test]
fn length_below_min_fails() {
    assert!(length_flagged("ab"));
}

#[test]
fn length_exactly_max_passes() {
    let text = "abcde".repeat(100);
    assert_eq!(text.chars().count(), 500);
    assert!(local_filter(&text).is_clean());
}

#[test]
fn length_above_max_fails() {
    let text = format!("{}f", "abcde".repeat(100));
    assert_eq!(local_filter(&text).reasons, vec![Reason::LengthOutOfBounds]);
}

#[test]
fn surrounding_whitespace_does_not_count() {
    assert!(length_flagged("   ab   "));
    assert!(!length_flagged("   abc   "));
}

#[test]
fn custom_bounds_apply() {
    let filter = LocalFilter::new(&FilterConfig {
        min_length: 10,
        max_length: 20,
        ..FilterConfig::default()
    });
    assert!(filter.check("123456789").reasons.contains(&Reason::LengthOutOfBounds));
    assert!(filter.check("1234567890").is_clean());
}

// ============================================================
// Properties
// ============================================================

const SAMPLES: &[&str] = &[
    "",
    "OK",
    "Hola, ¿cómo estás?",
    "¡¡¡¡¡¡holaaaaaaa!!!!!!",
    "Visita http://malicioso.com <script>alert(1)</script>",
    "p0t0 de mierda",
    "ＦＵＬＬ ｗｉｄｔｈ",
    "Ǆemal ﬁ ½ ㎒",
    "  \u{200B}zero\u{200D}width\u{FEFF}  ",
    "Ελληνικά ΣΊΣΥΦΟΣ",
    "mañana a las 10:30",
];

#[test]
fn normalize_is_idempotent() {
    for s in SAMPLES {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
    }
}

#[test]
fn local_filter_is_deterministic() {
    for s in SAMPLES {
        assert_eq!(local_filter(s), local_filter(s), "non-deterministic for {s:?}");
    }
}

#[test]
fn clean_means_no_reasons() {
    for s in SAMPLES {
        let verdict = local_filter(s);
        assert_eq!(verdict.is_clean(), verdict.reasons.is_empty());
    }
}
