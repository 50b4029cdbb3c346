use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{LitscopeError, Result};
use crate::models::{AuthorRecord, PaperRecord};

use super::{AuthorStore, PaperStore};

/// In-memory store, used in tests and as the reference semantics for the
/// SQLite implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    papers: Mutex<HashMap<String, PaperRecord>>,
    authors: Mutex<HashMap<String, AuthorRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaperStore for MemoryStore {
    fn find_paper(&self, doi: &str) -> Result<Option<PaperRecord>> {
        let papers = self.papers.lock().unwrap();
        Ok(papers.get(doi).cloned())
    }

    fn create_paper(&self, paper: &PaperRecord) -> Result<()> {
        let mut papers = self.papers.lock().unwrap();
        if papers.contains_key(&paper.doi) {
            return Err(LitscopeError::PaperExists(paper.doi.clone()));
        }
        papers.insert(paper.doi.clone(), paper.clone());
        Ok(())
    }

    fn update_paper(&self, doi: &str, paper: &PaperRecord) -> Result<()> {
        let mut papers = self.papers.lock().unwrap();
        if !papers.contains_key(doi) {
            return Err(LitscopeError::PaperNotFound(doi.to_string()));
        }
        if doi != paper.doi {
            papers.remove(doi);
        }
        papers.insert(paper.doi.clone(), paper.clone());
        Ok(())
    }

    fn scan_papers(&self) -> Result<Vec<PaperRecord>> {
        let papers = self.papers.lock().unwrap();
        let mut all: Vec<PaperRecord> =
            papers.values().filter(|p| !p.deleted).cloned().collect();
        all.sort_by(|a, b| a.doi.cmp(&b.doi));
        Ok(all)
    }
}

impl AuthorStore for MemoryStore {
    fn find_author(&self, name: &str) -> Result<Option<AuthorRecord>> {
        let authors = self.authors.lock().unwrap();
        Ok(authors.get(name).cloned())
    }

    fn find_author_by_alias(&self, name: &str) -> Result<Option<AuthorRecord>> {
        let authors = self.authors.lock().unwrap();
        let mut matches: Vec<&AuthorRecord> = authors
            .values()
            .filter(|a| !a.deleted && a.has_alias(name))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches.first().map(|a| (*a).clone()))
    }

    fn create_author(&self, author: &AuthorRecord) -> Result<()> {
        let mut authors = self.authors.lock().unwrap();
        if authors.contains_key(&author.name) {
            return Err(LitscopeError::AuthorExists(author.name.clone()));
        }
        authors.insert(author.name.clone(), author.clone());
        Ok(())
    }

    fn update_author(&self, name: &str, author: &AuthorRecord) -> Result<()> {
        let mut authors = self.authors.lock().unwrap();
        if !authors.contains_key(name) {
            return Err(LitscopeError::AuthorNotFound(name.to_string()));
        }
        if name != author.name {
            authors.remove(name);
        }
        authors.insert(author.name.clone(), author.clone());
        Ok(())
    }

    fn scan_authors(&self) -> Result<Vec<AuthorRecord>> {
        let authors = self.authors.lock().unwrap();
        let mut all: Vec<AuthorRecord> =
            authors.values().filter(|a| !a.deleted).cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    fn count_authors(&self) -> Result<usize> {
        let authors = self.authors.lock().unwrap();
        Ok(authors.values().filter(|a| !a.deleted).count())
    }
}
