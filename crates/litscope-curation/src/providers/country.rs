use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::error::{CurationError, Result};

use super::USER_AGENT;

/// Resolves a raw affiliation string to a country name, if one can be
/// determined.
#[async_trait]
pub trait CountryResolver: Send + Sync {
    async fn resolve(&self, affiliation: &str) -> Result<Option<String>>;
}

/// Client for a Nominatim-style geocoding endpoint:
/// `GET {base}/search?q=…&format=jsonv2&addressdetails=1&limit=1`.
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    address: Option<GeocodeAddress>,
}

#[derive(Debug, Deserialize)]
struct GeocodeAddress {
    country: Option<String>,
}

impl GeocodingClient {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self::with_base_url(&config.base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CountryResolver for GeocodingClient {
    async fn resolve(&self, affiliation: &str) -> Result<Option<String>> {
        let query = affiliation.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurationError::Api(
                "geocoder".to_string(),
                format!("status {status}"),
            ));
        }

        let hits: Vec<GeocodeHit> = response.json().await?;
        Ok(hits
            .into_iter()
            .next()
            .and_then(|hit| hit.address)
            .and_then(|address| address.country))
    }
}
