//! Case- and diacritic-insensitive text comparison for identity fields.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize free-text input for comparison: decompose accented characters
/// (NFD), drop the combining marks, lowercase, trim surrounding whitespace.
///
/// Total and pure: never fails, and applying it twice yields the same result.
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Two strings are equivalent iff their normalized forms are identical.
pub fn equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("José"), "jose");
        assert_eq!(normalize("PÉREZ"), "perez");
        assert_eq!(normalize("  Muñoz  "), "munoz");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent() {
        for s in ["José Ángel", "  O'Brien ", "MÜLLER", "", "plain"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn equivalence_ignores_accents_and_case() {
        assert!(equivalent("José", "jose"));
        assert!(equivalent("GARCÍA", "garcia"));
        assert!(!equivalent("Gomez", "Gonzalez"));
    }
}
