//! Incremental maintenance of author aggregates from paper records.

use litscope_core::{AuthorRecord, AuthorStore, Gender, PaperRecord};
use tracing::{debug, warn};

use crate::error::Result;
use crate::hindex::compute_h_index;
use crate::normalize::normalize_name;

/// Why a paper was skipped for attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No resolved author list yet.
    MissingAuthors,
    /// Authors present but genders not inferred yet.
    MissingGenders,
    /// `authors` and `authors_gender` disagree in length.
    LengthMismatch,
}

/// Per-author counts for one attributed paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributionCounts {
    pub created: u32,
    pub updated: u32,
    /// Authors for which this paper was already recorded; nothing written.
    pub already_attributed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperOutcome {
    Attributed(AttributionCounts),
    Skipped(SkipReason),
}

/// Consumes a paper's author list and updates each author's aggregate
/// record: creates the record on first sighting, merges fields on every
/// later one, and refuses to double-count a paper through the per-author
/// DOI membership guard.
pub struct AuthorAggregator<'a, S: AuthorStore> {
    authors: &'a S,
}

impl<'a, S: AuthorStore> AuthorAggregator<'a, S> {
    pub fn new(authors: &'a S) -> Self {
        Self { authors }
    }

    /// Attribute one paper to each of its authors.
    ///
    /// Each author is read, recomputed and written back in a single store
    /// update. A store failure part-way through leaves earlier authors
    /// written and later ones untouched; re-running the same paper is safe
    /// because already-attributed authors are skipped.
    pub fn attribute_paper(&self, paper: &PaperRecord) -> Result<PaperOutcome> {
        let Some(names) = paper.authors.as_ref().filter(|a| !a.is_empty()) else {
            debug!(doi = %paper.doi, "no resolved authors, skipping paper");
            return Ok(PaperOutcome::Skipped(SkipReason::MissingAuthors));
        };
        let genders = match paper.authors_gender.as_ref() {
            None => {
                debug!(doi = %paper.doi, "author genders not inferred yet, skipping paper");
                return Ok(PaperOutcome::Skipped(SkipReason::MissingGenders));
            }
            Some(g) if g.len() != names.len() => {
                warn!(
                    doi = %paper.doi,
                    authors = names.len(),
                    genders = g.len(),
                    "author and gender lists disagree in length, skipping paper"
                );
                return Ok(PaperOutcome::Skipped(SkipReason::LengthMismatch));
            }
            Some(g) => g,
        };

        let mut counts = AttributionCounts::default();
        let last_index = names.len() - 1;

        for (index, raw_name) in names.iter().enumerate() {
            let name = normalize_name(raw_name);
            if name.is_empty() {
                warn!(doi = %paper.doi, raw = %raw_name, "author name empty after normalization");
                continue;
            }
            let affiliation = author_affiliation(paper, index, names.len());

            match self.resolve_identity(&name)? {
                Some(author) if author.has_doi(&paper.doi) => {
                    counts.already_attributed += 1;
                }
                Some(author) => {
                    let canonical = author.name.clone();
                    let updated = apply_attribution(
                        author,
                        paper,
                        index,
                        last_index,
                        genders[index],
                        affiliation,
                    );
                    self.authors.update_author(&canonical, &updated)?;
                    counts.updated += 1;
                }
                None => {
                    let record = apply_attribution(
                        AuthorRecord::new(&name, Gender::Unknown),
                        paper,
                        index,
                        last_index,
                        genders[index],
                        affiliation,
                    );
                    self.authors.create_author(&record)?;
                    counts.created += 1;
                }
            }
        }

        Ok(PaperOutcome::Attributed(counts))
    }

    /// Resolve a normalized name to its authoritative identity: exact name
    /// match first, alias resolution second. A tombstoned exact match is
    /// never authoritative; the name falls through to alias lookup so it
    /// lands on the surviving record.
    fn resolve_identity(&self, name: &str) -> Result<Option<AuthorRecord>> {
        if let Some(author) = self.authors.find_author(name)?
            && !author.deleted
        {
            return Ok(Some(author));
        }
        Ok(self.authors.find_author_by_alias(name)?)
    }
}

fn author_affiliation(paper: &PaperRecord, index: usize, author_count: usize) -> Option<String> {
    let affiliations = paper.affiliations.as_ref()?;
    if affiliations.len() != author_count {
        warn!(doi = %paper.doi, "affiliation list length mismatch, ignoring affiliations");
        return None;
    }
    let text = affiliations[index].trim().to_lowercase();
    (!text.is_empty()).then_some(text)
}

/// Fold one paper into an author record, returning the new value.
fn apply_attribution(
    mut author: AuthorRecord,
    paper: &PaperRecord,
    index: usize,
    last_index: usize,
    gender: Gender,
    affiliation: Option<String>,
) -> AuthorRecord {
    author.dois.push(paper.doi.clone());
    author.citations.push(paper.citations);
    author.papers += 1;
    author.total_citations += u64::from(paper.citations);
    if index == 0 {
        author.papers_as_first_author += 1;
    }
    if index == last_index {
        author.papers_as_last_author += 1;
    }
    if paper.citations > 0 {
        author.papers_with_citations += 1;
    }

    if gender.is_known() {
        if !author.gender.is_known() {
            // gender only ever transitions away from unknown
            author.gender = gender;
        } else if gender != author.gender {
            warn!(
                author = %author.name,
                doi = %paper.doi,
                stored = %author.gender,
                incoming = %gender,
                "gender inconsistency, keeping stored value"
            );
        }
    }

    if let Some(text) = affiliation {
        author.affiliations.insert(text);
    }

    author.h_index = compute_h_index(&author.citations, author.papers_with_citations);
    author.touch();
    author
}
