//! Author-name canonicalization.
//!
//! `normalize_name` produces the stored form of a scraped name; `match_key`
//! produces the folded form the similarity scorer and blocking key work on.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// Footnote and superscript markers left behind by publisher pages.
static FOOTNOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9*]").expect("valid regex"));

/// Canonicalize a raw author-name string for storage.
///
/// Strips footnote digits and asterisks, drops the "and" list conjunction,
/// turns periods and hyphens into separators, trims stray commas, and
/// collapses whitespace runs. Case and diacritics are kept.
///
/// Hyphens are treated as separators unconditionally, so a genuinely
/// hyphenated surname ("Garcia-Lopez") splits into two tokens and its last
/// token alone acts as the surname downstream.
///
/// Idempotent: applying it to its own output changes nothing.
pub fn normalize_name(raw: &str) -> String {
    let stripped = FOOTNOTE_RE.replace_all(raw, "");
    let spaced = stripped.replace(['.', '-'], " ");
    let joined = spaced
        .split_whitespace()
        .filter(|token| *token != "and")
        .collect::<Vec<_>>()
        .join(" ");
    joined
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

/// Fold a name for comparison: NFKD-decompose, keep ASCII alphanumerics and
/// spaces, lowercase, collapse whitespace. "José" and "Jose" fold equal.
pub fn match_key(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace())
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
