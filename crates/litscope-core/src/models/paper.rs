use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Gender;

/// One publication, keyed by its DOI.
///
/// `authors` and `authors_gender` start out absent and are filled in by a
/// later enrichment pass; when both are present they are parallel lists
/// (position `i` is the same person in both).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    pub doi: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Source venue (journal name), lowercased on ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Citation count as last reported; may be revised upward over time.
    #[serde(default)]
    pub citations: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors_gender: Option<Vec<Gender>>,

    /// Raw affiliation strings, parallel to `authors` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliations: Option<Vec<String>>,

    /// Soft-delete marker; tombstoned papers are skipped by scans.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaperRecord {
    pub fn new(doi: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            doi: doi.into(),
            title: title.into(),
            year: None,
            source: None,
            citations: 0,
            authors: None,
            authors_gender: None,
            affiliations: None,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the author list has been resolved for this paper.
    pub fn has_authors(&self) -> bool {
        self.authors.as_ref().is_some_and(|a| !a.is_empty())
    }
}
