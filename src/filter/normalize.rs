// Text normalization — the canonical form the blacklist and repetition
// detectors compare against.
//
// Order matters: NFKC first so full-width letters and ligatures collapse,
// then invisible/control characters are dropped, then lower-casing, and
// finally an NFD pass that throws away combining marks so "canción" and
// "cancion" compare equal.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize raw submission text.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
/// All combining marks are removed (Mn, Mc and Me), not only accents.
pub fn normalize(text: &str) -> String {
    let composed: String = text
        .nfkc()
        .filter(|c| !c.is_control() && !is_format_char(*c))
        .collect();

    let lowered = composed.to_lowercase();

    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    stripped.trim().to_string()
}

/// Invisible formatting characters (Unicode category Cf).
///
/// These render as nothing but split words apart, which is exactly how
/// "mi\u{200B}erda" would slip past a token match.
pub(crate) fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}' // soft hyphen
        | '\u{0600}'..='\u{0605}' // Arabic number signs
        | '\u{061C}' // Arabic letter mark
        | '\u{06DD}'
        | '\u{070F}'
        | '\u{08E2}'
        | '\u{180E}' // Mongolian vowel separator
        | '\u{200B}'..='\u{200F}' // zero-width space/joiners, LTR/RTL marks
        | '\u{202A}'..='\u{202E}' // bidi embeddings and overrides
        | '\u{2060}'..='\u{2064}' // word joiner, invisible operators
        | '\u{2066}'..='\u{206F}' // bidi isolates, deprecated format chars
        | '\u{FEFF}' // BOM / zero-width no-break space
        | '\u{FFF9}'..='\u{FFFB}' // interlinear annotation
        | '\u{110BD}'
        | '\u{110CD}'
        | '\u{13430}'..='\u{1343F}'
        | '\u{1BCA0}'..='\u{1BCA3}'
        | '\u{1D173}'..='\u{1D17A}'
        | '\u{E0001}'
        | '\u{E0020}'..='\u{E007F}' // tag characters
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize("  Hola Mundo  "), "hola mundo");
    }

    #[test]
    fn test_strips_accents() {
        assert_eq!(normalize("¿Cómo estás, Begoña?"), "¿como estas, begona?");
    }

    #[test]
    fn test_collapses_fullwidth_forms() {
        // NFKC maps full-width Latin letters onto ASCII
        assert_eq!(normalize("ＭＩＥＲＤＡ"), "mierda");
    }

    #[test]
    fn test_removes_zero_width_and_control_chars() {
        assert_eq!(normalize("mi\u{200B}er\u{00AD}da\u{0007}"), "mierda");
        assert_eq!(normalize("\u{FEFF}hola\u{202E}"), "hola");
    }

    #[test]
    fn test_decomposed_input_matches_precomposed() {
        assert_eq!(normalize("cafe\u{0301}"), normalize("café"));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "Hola, ¿cómo estás?",
            "ＰＵＴＯ  ",
            "İstanbul",
            "ﬁnal ﬂag",
            "한국어 질문",
            "e\u{0301}\u{200D} \u{3000}",
            "¡¡¡¡¡¡holaaaaaaa!!!!!!",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\u{200B}\t\n"), "");
    }
}
