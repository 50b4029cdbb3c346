use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Gender;

/// One (putative) real-world person, identified by a canonical name and an
/// evolving set of aliases.
///
/// The aggregate counters are maintained incrementally as papers are
/// attributed. `dois` and `citations` are parallel lists with one entry per
/// distinct attributed paper; the `dois` membership check is what makes
/// repeated attribution of the same paper a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: String,

    /// Alternate name spellings known to refer to this identity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_names: Vec<String>,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub papers: u32,

    #[serde(default)]
    pub total_citations: u64,

    #[serde(default)]
    pub papers_as_first_author: u32,

    #[serde(default)]
    pub papers_as_last_author: u32,

    #[serde(default)]
    pub papers_with_citations: u32,

    #[serde(default)]
    pub dois: Vec<String>,

    /// Citation count recorded for each paper at attribution time,
    /// parallel to `dois`.
    #[serde(default)]
    pub citations: Vec<u32>,

    #[serde(default)]
    pub h_index: u32,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub affiliations: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub countries: BTreeSet<String>,

    /// Tombstone set when this identity is merged into another record.
    /// Tombstoned records are kept for referential integrity but never
    /// resolved as an attribution target.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthorRecord {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            other_names: Vec::new(),
            gender,
            papers: 0,
            total_citations: 0,
            papers_as_first_author: 0,
            papers_as_last_author: 0,
            papers_with_citations: 0,
            dois: Vec::new(),
            citations: Vec::new(),
            h_index: 0,
            affiliations: BTreeSet::new(),
            countries: BTreeSet::new(),
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the given paper has already been attributed to this author.
    pub fn has_doi(&self, doi: &str) -> bool {
        self.dois.iter().any(|d| d == doi)
    }

    pub fn has_alias(&self, name: &str) -> bool {
        self.other_names.iter().any(|n| n == name)
    }

    /// Asserts the aggregate invariants; used by tests after every
    /// sequence of attribute/merge operations.
    pub fn check_invariants(&self) {
        assert_eq!(self.dois.len(), self.citations.len(), "dois/citations parallel");
        assert_eq!(self.dois.len() as u32, self.papers, "papers == len(dois)");
        let mut seen = std::collections::HashSet::new();
        for doi in &self.dois {
            assert!(seen.insert(doi), "duplicate doi {doi} for {}", self.name);
        }
        let sum: u64 = self.citations.iter().map(|&c| u64::from(c)).sum();
        assert_eq!(self.total_citations, sum, "total_citations == sum(citations)");
        let cited = self.citations.iter().filter(|&&c| c > 0).count() as u32;
        assert_eq!(self.papers_with_citations, cited, "papers_with_citations");
    }
}
