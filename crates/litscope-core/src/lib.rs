//! litscope-core — bibliometric record models and the document stores
//! backing the curation pipeline.

pub mod error;
pub mod models;
pub mod storage;

pub use error::{LitscopeError, Result};
pub use models::*;

pub use storage::{AuthorStore, Database, MemoryStore, PaperStore};
