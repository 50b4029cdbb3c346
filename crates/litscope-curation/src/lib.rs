//! litscope-curation — author identity resolution and metrics aggregation
//! over the litscope document stores: name normalization, fuzzy duplicate
//! detection, h-index maintenance, and the batch enrichment drivers.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod hindex;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod resolve;
pub mod similarity;

pub use config::{CurationConfig, GenderApiConfig, GeocoderConfig, MatchingConfig};
pub use error::{CurationError, Result};

pub use aggregate::AuthorAggregator;
pub use hindex::compute_h_index;
pub use normalize::{match_key, normalize_name};
pub use resolve::{DuplicateCandidate, IdentityResolver, merge_records};
