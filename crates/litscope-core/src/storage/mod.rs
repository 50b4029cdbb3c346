pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::Database;

use crate::error::Result;
use crate::models::{AuthorRecord, PaperRecord};

/// Access to the paper collection.
///
/// `update_paper` replaces the whole stored document in one write: callers
/// read a record, compute its new value, and write it back, so a failed
/// call leaves the stored record untouched.
pub trait PaperStore {
    fn find_paper(&self, doi: &str) -> Result<Option<PaperRecord>>;

    /// Insert a new paper; fails with `PaperExists` if the DOI is taken.
    fn create_paper(&self, paper: &PaperRecord) -> Result<()>;

    /// Replace the record stored under `doi`.
    fn update_paper(&self, doi: &str, paper: &PaperRecord) -> Result<()>;

    /// All non-tombstoned papers. Restartable from the start only.
    fn scan_papers(&self) -> Result<Vec<PaperRecord>>;
}

/// Access to the author collection.
///
/// `find_author` returns records as stored, tombstones included, so that
/// callers can distinguish a merged-away identity from an unknown one.
/// Alias resolution and scans only ever surface live records: a tombstoned
/// author is never an attribution target.
pub trait AuthorStore {
    /// Exact match on the canonical name, tombstoned or not.
    fn find_author(&self, name: &str) -> Result<Option<AuthorRecord>>;

    /// Live record whose `other_names` contains `name`, if any.
    fn find_author_by_alias(&self, name: &str) -> Result<Option<AuthorRecord>>;

    /// Insert a new author; fails with `AuthorExists` if the name is taken.
    fn create_author(&self, author: &AuthorRecord) -> Result<()>;

    /// Replace the record stored under `name` (which may rename it when
    /// `author.name` differs from the identifier).
    fn update_author(&self, name: &str, author: &AuthorRecord) -> Result<()>;

    /// All non-tombstoned authors. Restartable from the start only.
    fn scan_authors(&self) -> Result<Vec<AuthorRecord>>;

    /// Count of non-tombstoned authors.
    fn count_authors(&self) -> Result<usize>;
}
