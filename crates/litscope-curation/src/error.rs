use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurationError {
    #[error("store error: {0}")]
    Store(#[from] litscope_core::LitscopeError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    Api(String, String),

    #[error("cannot merge author {0} into itself")]
    SelfMerge(String),

    #[error("merge target is tombstoned: {0}")]
    MergeIntoTombstone(String),

    #[error("author was already merged away: {0}")]
    AlreadyMerged(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CurationError>;
