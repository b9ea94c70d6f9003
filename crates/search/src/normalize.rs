//! Text normalization applied to queries and keyword phrases.

use std::collections::HashSet;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize text for comparison.
///
/// Lower-cases, decomposes to NFD and drops non-spacing marks (so `é`
/// becomes `e`), then trims surrounding whitespace. Inner whitespace is
/// left as-is; tokenization splits on any run of it.
///
/// # Example
/// ```
/// use autodiag_search::normalize;
///
/// assert_eq!(normalize("  Voyant Moteur ALLUMÉ "), "voyant moteur allume");
/// ```
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !c.is_mark_nonspacing())
        .collect();

    let trimmed = folded.trim();
    if trimmed.len() == folded.len() {
        folded
    } else {
        trimmed.to_string()
    }
}

/// Split already-normalized text into its set of whitespace-delimited tokens.
pub fn tokens(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_accents() {
        assert_eq!(normalize("Démarrage difficile"), "demarrage difficile");
        assert_eq!(normalize("témoin"), "temoin");
        assert_eq!(normalize("ça grince"), "ca grince");
    }

    #[test]
    fn test_decomposed_input() {
        assert_eq!(normalize("Cafe\u{0301}"), "cafe");
    }

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(normalize("\t FREINS \n"), "freins");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_keeps_inner_whitespace() {
        assert_eq!(normalize("a  b"), "a  b");
    }

    #[test]
    fn test_tokens() {
        let t = tokens("voyant  moteur voyant");
        assert_eq!(t.len(), 2);
        assert!(t.contains("voyant"));
        assert!(t.contains("moteur"));
        assert!(tokens("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_idempotent(s in "[\\p{L}\\p{Mn}\\p{N}\\s]{0,64}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_no_surrounding_whitespace(s in "[\\p{L}\\p{Mn}\\p{N}\\s]{0,64}") {
            let out = normalize(&s);
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
