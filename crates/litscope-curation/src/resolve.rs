//! Near-duplicate author detection and identity merging.

use litscope_core::{AuthorRecord, AuthorStore, LitscopeError};
use tracing::info;

use crate::config::MatchingConfig;
use crate::error::{CurationError, Result};
use crate::hindex::compute_h_index;
use crate::normalize::match_key;
use crate::similarity::{first_name_score, last_name_score, last_token};

/// A pair of author records judged likely to be the same person, with the
/// signals that led to the judgement. Acceptance is an external decision
/// fed back in as a `merge` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCandidate {
    pub left: String,
    pub right: String,
    pub first_name_score: f64,
    pub last_name_score: f64,
    /// Papers attributed to both identities.
    pub shared_dois: usize,
}

impl DuplicateCandidate {
    pub fn combined_score(&self) -> f64 {
        (self.first_name_score + self.last_name_score) / 2.0
    }
}

/// Detects and merges author records that refer to the same person.
///
/// Candidate generation blocks on the folded last name: authors are sorted
/// by that key and each one is only compared against the next
/// `blocking_window` neighbours, avoiding the all-pairs comparison.
pub struct IdentityResolver {
    config: MatchingConfig,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl IdentityResolver {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Scan a set of author records for likely duplicates, ranked by
    /// combined similarity (ties broken by shared papers, then names).
    pub fn find_duplicate_candidates(&self, authors: &[AuthorRecord]) -> Vec<DuplicateCandidate> {
        let mut entries: Vec<(String, &AuthorRecord)> = authors
            .iter()
            .filter(|a| !a.deleted)
            .map(|a| (match_key(last_token(&a.name)), a))
            .collect();
        entries.sort_by(|x, y| x.0.cmp(&y.0).then_with(|| x.1.name.cmp(&y.1.name)));

        let mut candidates = Vec::new();
        for i in 0..entries.len() {
            let window_end = (i + 1 + self.config.blocking_window).min(entries.len());
            for j in (i + 1)..window_end {
                let (a, b) = (entries[i].1, entries[j].1);
                if !genders_compatible(a, b) {
                    continue;
                }
                let first = first_name_score(&a.name, &b.name);
                if first < self.config.first_name_threshold {
                    continue;
                }
                let last = last_name_score(&a.name, &b.name);
                if last < self.config.last_name_threshold {
                    continue;
                }
                candidates.push(DuplicateCandidate {
                    left: a.name.clone(),
                    right: b.name.clone(),
                    first_name_score: first,
                    last_name_score: last,
                    shared_dois: shared_doi_count(a, b),
                });
            }
        }

        candidates.sort_by(|x, y| {
            y.combined_score()
                .total_cmp(&x.combined_score())
                .then_with(|| y.shared_dois.cmp(&x.shared_dois))
                .then_with(|| x.left.cmp(&y.left))
                .then_with(|| x.right.cmp(&y.right))
        });
        candidates
    }

    /// Merge `remove_name`'s record into `keep_name`'s in the store.
    ///
    /// Both records are read, the pure merge is computed, and the two
    /// resulting writes are issued: the enriched survivor and the
    /// tombstoned absorbed record. Runs inside the single-writer batch
    /// process, so nothing can attribute to `remove` in between.
    pub fn merge<A: AuthorStore>(
        &self,
        authors: &A,
        keep_name: &str,
        remove_name: &str,
    ) -> Result<AuthorRecord> {
        if keep_name == remove_name {
            return Err(CurationError::SelfMerge(keep_name.to_string()));
        }
        let keep = authors
            .find_author(keep_name)?
            .ok_or_else(|| LitscopeError::AuthorNotFound(keep_name.to_string()))?;
        let remove = authors
            .find_author(remove_name)?
            .ok_or_else(|| LitscopeError::AuthorNotFound(remove_name.to_string()))?;

        let (merged, tombstone) = merge_records(&keep, &remove)?;
        authors.update_author(&merged.name, &merged)?;
        authors.update_author(&tombstone.name, &tombstone)?;
        info!(keep = %merged.name, removed = %tombstone.name, "merged author identities");
        Ok(merged)
    }
}

fn genders_compatible(a: &AuthorRecord, b: &AuthorRecord) -> bool {
    !a.gender.is_known() || !b.gender.is_known() || a.gender == b.gender
}

fn shared_doi_count(a: &AuthorRecord, b: &AuthorRecord) -> usize {
    a.dois.iter().filter(|doi| b.has_doi(doi)).count()
}

/// Pure merge of two author records: returns the surviving record with the
/// absorbed one's identity and statistics folded in, plus the tombstoned
/// absorbed record. No store access.
///
/// Counters derivable from the merged lists (`papers`, `total_citations`,
/// `papers_with_citations`) are recomputed after DOI deduplication so the
/// aggregate invariants hold even when both identities carried the same
/// paper; the positional counters are summed.
pub fn merge_records(
    keep: &AuthorRecord,
    remove: &AuthorRecord,
) -> Result<(AuthorRecord, AuthorRecord)> {
    if keep.name == remove.name {
        return Err(CurationError::SelfMerge(keep.name.clone()));
    }
    if keep.deleted {
        return Err(CurationError::MergeIntoTombstone(keep.name.clone()));
    }
    if remove.deleted {
        return Err(CurationError::AlreadyMerged(remove.name.clone()));
    }

    let mut merged = keep.clone();

    if !merged.has_alias(&remove.name) {
        merged.other_names.push(remove.name.clone());
    }
    // aliases of the absorbed identity keep resolving to the survivor
    for alias in &remove.other_names {
        if *alias != merged.name && !merged.has_alias(alias) {
            merged.other_names.push(alias.clone());
        }
    }

    for (doi, &citations) in remove.dois.iter().zip(remove.citations.iter()) {
        if !merged.has_doi(doi) {
            merged.dois.push(doi.clone());
            merged.citations.push(citations);
        }
    }
    merged.papers = merged.dois.len() as u32;
    merged.total_citations = merged.citations.iter().map(|&c| u64::from(c)).sum();
    merged.papers_with_citations = merged.citations.iter().filter(|&&c| c > 0).count() as u32;
    merged.papers_as_first_author = keep.papers_as_first_author + remove.papers_as_first_author;
    merged.papers_as_last_author = keep.papers_as_last_author + remove.papers_as_last_author;

    if !merged.gender.is_known() {
        merged.gender = remove.gender;
    }
    merged.affiliations.extend(remove.affiliations.iter().cloned());
    merged.countries.extend(remove.countries.iter().cloned());

    merged.h_index = compute_h_index(&merged.citations, merged.papers_with_citations);
    merged.touch();

    let mut tombstone = remove.clone();
    tombstone.deleted = true;
    tombstone.touch();

    Ok((merged, tombstone))
}

#[cfg(test)]
mod tests {
    use litscope_core::{Gender, MemoryStore};

    use super::*;

    fn author(name: &str, gender: Gender) -> AuthorRecord {
        AuthorRecord::new(name, gender)
    }

    fn author_with_papers(name: &str, gender: Gender, papers: &[(&str, u32)]) -> AuthorRecord {
        let mut a = author(name, gender);
        for &(doi, citations) in papers {
            a.dois.push(doi.to_string());
            a.citations.push(citations);
            a.papers += 1;
            a.total_citations += u64::from(citations);
            if citations > 0 {
                a.papers_with_citations += 1;
            }
        }
        a.h_index = compute_h_index(&a.citations, a.papers_with_citations);
        a
    }

    #[test]
    fn near_spellings_are_flagged() {
        let resolver = IdentityResolver::default();
        let authors = vec![
            author("Ana Reyes", Gender::Female),
            author("Ana Reyez", Gender::Female),
            author("Li Wei", Gender::Male),
        ];
        let candidates = resolver.find_duplicate_candidates(&authors);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].left, "Ana Reyes");
        assert_eq!(candidates[0].right, "Ana Reyez");
        assert_eq!(candidates[0].first_name_score, 1.0);
        assert!(candidates[0].last_name_score >= 0.85);
    }

    #[test]
    fn diacritics_match_their_plain_spelling() {
        let resolver = IdentityResolver::default();
        let authors = vec![
            author("José Núñez", Gender::Male),
            author("Jose Nunez", Gender::Male),
        ];
        let candidates = resolver.find_duplicate_candidates(&authors);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].first_name_score, 1.0);
        assert_eq!(candidates[0].last_name_score, 1.0);
    }

    #[test]
    fn same_surname_different_first_name_is_not_flagged() {
        let resolver = IdentityResolver::default();
        let authors = vec![
            author("Jon Smith", Gender::Male),
            author("Maria Smith", Gender::Female),
        ];
        assert!(resolver.find_duplicate_candidates(&authors).is_empty());
    }

    #[test]
    fn known_conflicting_genders_block_the_pair() {
        let resolver = IdentityResolver::default();
        let authors = vec![
            author("Andrea Rossi", Gender::Male),
            author("Andreas Rossi", Gender::Female),
        ];
        assert!(resolver.find_duplicate_candidates(&authors).is_empty());

        // one unknown side keeps the pair eligible
        let authors = vec![
            author("Andrea Rossi", Gender::Male),
            author("Andreas Rossi", Gender::Unknown),
        ];
        assert_eq!(resolver.find_duplicate_candidates(&authors).len(), 1);
    }

    #[test]
    fn tombstoned_records_are_ignored() {
        let resolver = IdentityResolver::default();
        let mut gone = author("Ana Reyez", Gender::Female);
        gone.deleted = true;
        let authors = vec![author("Ana Reyes", Gender::Female), gone];
        assert!(resolver.find_duplicate_candidates(&authors).is_empty());
    }

    #[test]
    fn blocking_window_limits_comparisons() {
        let resolver = IdentityResolver::new(MatchingConfig {
            blocking_window: 1,
            ..MatchingConfig::default()
        });
        // sorted by surname key: Reyes, Reyesa, Reyesb — with window 1 the
        // (Reyes, Reyesb) pair is never examined
        let authors = vec![
            author("Ana Reyes", Gender::Female),
            author("Ana Reyesa", Gender::Female),
            author("Ana Reyesb", Gender::Female),
        ];
        let candidates = resolver.find_duplicate_candidates(&authors);
        assert_eq!(candidates.len(), 2);
        assert!(
            !candidates
                .iter()
                .any(|c| c.left == "Ana Reyes" && c.right == "Ana Reyesb")
        );
    }

    #[test]
    fn merge_concatenates_and_recomputes() {
        let a = author_with_papers("Ana Reyes", Gender::Female, &[("d1", 3), ("d2", 0)]);
        let b = author_with_papers("Anna Reyes", Gender::Female, &[("d3", 5)]);

        let (merged, tombstone) = merge_records(&a, &b).unwrap();
        merged.check_invariants();

        assert_eq!(merged.papers, 3);
        assert_eq!(merged.dois, vec!["d1", "d2", "d3"]);
        assert_eq!(merged.citations, vec![3, 0, 5]);
        assert_eq!(merged.papers_with_citations, 2);
        assert_eq!(merged.total_citations, 8);
        // two papers with >= 2 citations
        assert_eq!(merged.h_index, 2);
        assert!(merged.has_alias("Anna Reyes"));

        assert!(tombstone.deleted);
        assert_eq!(tombstone.name, "Anna Reyes");
    }

    #[test]
    fn merge_deduplicates_shared_dois() {
        let a = author_with_papers("Ana Reyes", Gender::Female, &[("d1", 3), ("d2", 0)]);
        let b = author_with_papers("Anna Reyes", Gender::Female, &[("d2", 0), ("d3", 5)]);

        let (merged, _) = merge_records(&a, &b).unwrap();
        merged.check_invariants();
        assert_eq!(merged.papers, 3);
        assert_eq!(merged.dois, vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn merge_carries_aliases_and_sets() {
        let mut a = author("Ana Reyes", Gender::Unknown);
        a.affiliations.insert("uni a".to_string());
        let mut b = author("Anna Reyes", Gender::Female);
        b.other_names.push("A. Reyes".to_string());
        b.affiliations.insert("uni b".to_string());
        b.countries.insert("Spain".to_string());

        let (merged, _) = merge_records(&a, &b).unwrap();
        assert!(merged.has_alias("Anna Reyes"));
        assert!(merged.has_alias("A. Reyes"));
        assert_eq!(merged.gender, Gender::Female);
        assert_eq!(merged.affiliations.len(), 2);
        assert!(merged.countries.contains("Spain"));
    }

    #[test]
    fn degenerate_merges_are_rejected() {
        let a = author("Ana Reyes", Gender::Female);
        assert!(matches!(
            merge_records(&a, &a).unwrap_err(),
            CurationError::SelfMerge(_)
        ));

        let mut gone = author("Anna Reyes", Gender::Female);
        gone.deleted = true;
        assert!(matches!(
            merge_records(&a, &gone).unwrap_err(),
            CurationError::AlreadyMerged(_)
        ));
        assert!(matches!(
            merge_records(&gone, &a).unwrap_err(),
            CurationError::MergeIntoTombstone(_)
        ));
    }

    #[test]
    fn store_merge_tombstones_and_survives_lookup() {
        let store = MemoryStore::new();
        store
            .create_author(&author_with_papers("Ana Reyes", Gender::Female, &[("d1", 3)]))
            .unwrap();
        store
            .create_author(&author_with_papers("Anna Reyes", Gender::Female, &[("d2", 5)]))
            .unwrap();

        let resolver = IdentityResolver::default();
        let merged = resolver.merge(&store, "Ana Reyes", "Anna Reyes").unwrap();
        assert_eq!(merged.papers, 2);

        // merging again is a distinguishable error, not a second merge
        assert!(matches!(
            resolver.merge(&store, "Ana Reyes", "Anna Reyes").unwrap_err(),
            CurationError::AlreadyMerged(_)
        ));
        assert!(matches!(
            resolver.merge(&store, "Ana Reyes", "Ana Reyes").unwrap_err(),
            CurationError::SelfMerge(_)
        ));

        // the alias now routes to the survivor
        let via_alias = store.find_author_by_alias("Anna Reyes").unwrap().unwrap();
        assert_eq!(via_alias.name, "Ana Reyes");
    }
}
