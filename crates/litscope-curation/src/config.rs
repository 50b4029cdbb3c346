use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Curation configuration, loadable from a TOML file.
///
/// The matching thresholds were tuned empirically on bibliographic name
/// data; they are defaults, not requirements, and every one of them is
/// overridable per run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CurationConfig {
    pub matching: MatchingConfig,
    pub gender_api: GenderApiConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum Jaro-Winkler similarity between first-name tokens.
    pub first_name_threshold: f64,
    /// Minimum Jaro-Winkler similarity between last-name tokens.
    pub last_name_threshold: f64,
    /// Threshold used when comparing full normalized names directly.
    pub full_name_threshold: f64,
    /// How many neighbours in last-name sort order each author is
    /// compared against during candidate generation.
    pub blocking_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenderApiConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            first_name_threshold: 0.95,
            last_name_threshold: 0.85,
            full_name_threshold: 0.95,
            blocking_window: 10,
        }
    }
}

impl Default for GenderApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.genderize.io".to_string(),
            api_key: None,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
        }
    }
}

impl CurationConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
