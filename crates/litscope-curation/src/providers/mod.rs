//! External enrichment providers: name-to-gender inference and
//! affiliation-to-country geocoding. Both are treated as unreliable;
//! callers decide what a failure means (usually: fall back to unknown).

pub mod country;
pub mod gender;

pub use country::{CountryResolver, GeocodingClient};
pub use gender::{GenderApiClient, GenderProvider};

pub(crate) const USER_AGENT: &str = concat!("litscope/", env!("CARGO_PKG_VERSION"));
