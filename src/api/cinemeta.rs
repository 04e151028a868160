//! Cinemeta metadata client
//!
//! Resolves an IMDB id to a canonical name and release year via the
//! public Stremio Cinemeta addon.

use serde::Deserialize;
use std::time::Duration;

use super::{fetch_text, http_client, ApiError};
use crate::models::{normalize_year, MediaType, TitleRecord};

/// Cinemeta addon client
pub struct CinemetaClient {
    base_url: String,
    client: reqwest::Client,
}

impl CinemetaClient {
    /// Create a new Cinemeta client with default settings
    pub fn new() -> Self {
        Self::with_base_url("https://v3-cinemeta.strem.io", Duration::from_secs(10))
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(timeout),
        }
    }

    /// Fetch the title record for an id under one content type
    pub async fn meta(&self, media_type: MediaType, imdb_id: &str) -> Result<TitleRecord, ApiError> {
        let url = format!("{}/meta/{}/{}.json", self.base_url, media_type, imdb_id);
        let body = fetch_text(self.client.get(&url)).await?;

        let response: MetaResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        response
            .meta
            .and_then(|m| m.into_title_record(imdb_id))
            .ok_or_else(|| ApiError::NotFound(format!("{} {}", media_type, imdb_id)))
    }
}

impl Default for CinemetaClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct MetaResponse {
    meta: Option<MetaRaw>,
}

#[derive(Debug, Deserialize)]
struct MetaRaw {
    name: Option<String>,
    year: Option<YearRaw>,
    #[serde(rename = "releaseInfo")]
    release_info: Option<YearRaw>,
}

/// Cinemeta sends the year as "2019–2021", "2020" or a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YearRaw {
    Text(String),
    Number(u64),
}

impl YearRaw {
    fn as_text(&self) -> String {
        match self {
            YearRaw::Text(s) => s.clone(),
            YearRaw::Number(n) => n.to_string(),
        }
    }
}

impl MetaRaw {
    fn into_title_record(self, imdb_id: &str) -> Option<TitleRecord> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let release_year = self
            .year
            .or(self.release_info)
            .and_then(|y| normalize_year(&y.as_text()));

        Some(TitleRecord {
            canonical_name: name,
            release_year,
            external_id: imdb_id.to_string(),
        })
    }
}
