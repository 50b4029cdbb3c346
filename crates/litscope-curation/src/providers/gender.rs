use async_trait::async_trait;
use litscope_core::Gender;
use serde::Deserialize;

use crate::config::GenderApiConfig;
use crate::error::{CurationError, Result};

use super::USER_AGENT;

/// Infers a gender label from a person's full name.
#[async_trait]
pub trait GenderProvider: Send + Sync {
    /// A transport or API failure surfaces as `Err`; it is the caller's job
    /// to map that to `Gender::Unknown` before storing anything.
    async fn infer(&self, full_name: &str) -> Result<Gender>;
}

/// Client for a genderize.io-style API: `GET {base}/?name={given}` returning
/// `{"gender": "male" | "female" | null, ...}`.
pub struct GenderApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenderResponse {
    gender: Option<String>,
}

impl GenderApiClient {
    pub fn new(config: &GenderApiConfig) -> Self {
        Self::with_base_url(&config.base_url, config.api_key.clone())
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl GenderProvider for GenderApiClient {
    async fn infer(&self, full_name: &str) -> Result<Gender> {
        // The API works on given names; use the first token.
        let Some(given) = full_name.split_whitespace().next() else {
            return Ok(Gender::Unknown);
        };

        let mut query = vec![("name", given.to_string())];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurationError::Api(
                "gender".to_string(),
                format!("status {status}"),
            ));
        }

        let body: GenderResponse = response.json().await?;
        Ok(match body.gender.as_deref() {
            Some("male") => Gender::Male,
            Some("female") => Gender::Female,
            _ => Gender::Unknown,
        })
    }
}
