use thiserror::Error;

/// All errors that can occur in litscope-core.
#[derive(Debug, Error)]
pub enum LitscopeError {
    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    #[error("Paper not found: {0}")]
    PaperNotFound(String),

    #[error("Author already exists: {0}")]
    AuthorExists(String),

    #[error("Paper already exists: {0}")]
    PaperExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LitscopeError>;
