//! String similarity between author names.
//!
//! Jaro-Winkler is used because it favours shared prefixes, which suits
//! short name tokens where truncation and diacritic loss concentrate at the
//! end of the string.

use crate::normalize::{match_key, normalize_name};

/// First whitespace token of a name, taken as the given name.
pub fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// Last whitespace token of a name, taken as the surname. Middle tokens are
/// ignored for matching purposes.
pub fn last_token(name: &str) -> &str {
    name.split_whitespace().last().unwrap_or("")
}

/// Similarity in `[0, 1]` between two names, compared case-insensitively
/// with diacritics folded to base Latin characters.
///
/// Two empty strings compare equal (1.0); empty against non-empty is
/// maximally dissimilar (0.0).
pub fn score(a: &str, b: &str) -> f64 {
    let a = match_key(a);
    let b = match_key(b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::jaro_winkler(&a, &b)
}

/// Whether two raw names refer to the same identity at the given threshold,
/// after normalization.
pub fn are_similar(a: &str, b: &str, threshold: f64) -> bool {
    score(&normalize_name(a), &normalize_name(b)) >= threshold
}

/// Similarity between the first-name tokens of two names.
pub fn first_name_score(a: &str, b: &str) -> f64 {
    score(first_token(a), first_token(b))
}

/// Similarity between the last-name tokens of two names.
pub fn last_name_score(a: &str, b: &str) -> f64 {
    score(last_token(a), last_token(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_one() {
        assert_eq!(score("Ana Reyes", "Ana Reyes"), 1.0);
    }

    #[test]
    fn empty_edge_cases() {
        assert_eq!(score("", ""), 1.0);
        assert_eq!(score("", "Ana"), 0.0);
        assert_eq!(score("Ana", ""), 0.0);
    }

    #[test]
    fn diacritics_and_case_do_not_matter() {
        assert_eq!(score("José Núñez", "jose nunez"), 1.0);
    }

    #[test]
    fn near_spellings_score_high() {
        assert!(score("Katharine", "Katherine") > 0.9);
        assert!(last_name_score("Ana Reyes", "Anna Reyes") > 0.95);
    }

    #[test]
    fn unrelated_first_names_score_low() {
        assert!(first_name_score("Jon Smith", "Maria Smith") < 0.8);
    }

    #[test]
    fn are_similar_normalizes_first() {
        assert!(are_similar("Ana Reyes1,*", "Ana Reyes", 0.95));
        assert!(!are_similar("Jon Smith", "Maria Smith", 0.95));
    }

    #[test]
    fn token_helpers_split_first_and_last() {
        assert_eq!(first_token("Maria del Carmen Ortiz"), "Maria");
        assert_eq!(last_token("Maria del Carmen Ortiz"), "Ortiz");
        assert_eq!(first_token(""), "");
        assert_eq!(last_token("Wei"), "Wei");
    }
}
