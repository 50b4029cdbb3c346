use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::{LitscopeError, Result};
use crate::models::{AuthorRecord, PaperRecord};

use super::{AuthorStore, PaperStore};

/// SQLite-backed document store. Records are stored whole as JSON in the
/// `record` column; the remaining columns exist only so lookups and
/// tombstone filtering can be done in SQL.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS papers (
                doi        TEXT PRIMARY KEY,
                record     TEXT NOT NULL,
                deleted    INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS authors (
                name        TEXT PRIMARY KEY,
                record      TEXT NOT NULL,
                other_names TEXT NOT NULL DEFAULT '[]',
                deleted     INTEGER NOT NULL DEFAULT 0,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_papers_deleted  ON papers(deleted);
            CREATE INDEX IF NOT EXISTS idx_authors_deleted ON authors(deleted);
            ",
        )?;
        Ok(())
    }

    fn paper_exists(&self, doi: &str) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM papers WHERE doi = ?1")?
            .exists(params![doi])?;
        Ok(exists)
    }

    fn author_exists(&self, name: &str) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM authors WHERE name = ?1")?
            .exists(params![name])?;
        Ok(exists)
    }
}

impl PaperStore for Database {
    fn find_paper(&self, doi: &str) -> Result<Option<PaperRecord>> {
        let mut stmt = self.conn.prepare("SELECT record FROM papers WHERE doi = ?1")?;
        let record: Option<String> = stmt
            .query_row(params![doi], |row| row.get(0))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        match record {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn create_paper(&self, paper: &PaperRecord) -> Result<()> {
        if self.paper_exists(&paper.doi)? {
            return Err(LitscopeError::PaperExists(paper.doi.clone()));
        }
        self.conn.execute(
            "INSERT INTO papers (doi, record, deleted, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                paper.doi,
                serde_json::to_string(paper)?,
                paper.deleted,
                paper.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_paper(&self, doi: &str, paper: &PaperRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE papers SET doi = ?1, record = ?2, deleted = ?3, updated_at = ?4
             WHERE doi = ?5",
            params![
                paper.doi,
                serde_json::to_string(paper)?,
                paper.deleted,
                paper.updated_at.to_rfc3339(),
                doi,
            ],
        )?;
        if changed == 0 {
            return Err(LitscopeError::PaperNotFound(doi.to_string()));
        }
        Ok(())
    }

    fn scan_papers(&self) -> Result<Vec<PaperRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM papers WHERE deleted = 0 ORDER BY doi")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(Into::into))
            .collect()
    }
}

impl AuthorStore for Database {
    fn find_author(&self, name: &str) -> Result<Option<AuthorRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM authors WHERE name = ?1")?;
        let record: Option<String> = stmt
            .query_row(params![name], |row| row.get(0))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        match record {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn find_author_by_alias(&self, name: &str) -> Result<Option<AuthorRecord>> {
        // other_names is a JSON array in TEXT, so prefilter with LIKE and
        // verify on the deserialized record to weed out substring hits.
        let pattern = format!("%\"{name}\"%");
        let mut stmt = self.conn.prepare(
            "SELECT record FROM authors
             WHERE deleted = 0 AND other_names LIKE ?1
             ORDER BY name",
        )?;
        let rows = stmt
            .query_map(params![pattern], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for json in rows {
            let author: AuthorRecord = serde_json::from_str(&json)?;
            if author.has_alias(name) {
                return Ok(Some(author));
            }
        }
        Ok(None)
    }

    fn create_author(&self, author: &AuthorRecord) -> Result<()> {
        if self.author_exists(&author.name)? {
            return Err(LitscopeError::AuthorExists(author.name.clone()));
        }
        self.conn.execute(
            "INSERT INTO authors (name, record, other_names, deleted, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                author.name,
                serde_json::to_string(author)?,
                serde_json::to_string(&author.other_names)?,
                author.deleted,
                author.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_author(&self, name: &str, author: &AuthorRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE authors SET name = ?1, record = ?2, other_names = ?3,
                                deleted = ?4, updated_at = ?5
             WHERE name = ?6",
            params![
                author.name,
                serde_json::to_string(author)?,
                serde_json::to_string(&author.other_names)?,
                author.deleted,
                author.updated_at.to_rfc3339(),
                name,
            ],
        )?;
        if changed == 0 {
            return Err(LitscopeError::AuthorNotFound(name.to_string()));
        }
        Ok(())
    }

    fn scan_authors(&self) -> Result<Vec<AuthorRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM authors WHERE deleted = 0 ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(Into::into))
            .collect()
    }

    fn count_authors(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM authors WHERE deleted = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
