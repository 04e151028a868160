//! KissKH site client
//!
//! Fetches the search listing, a title's detail page and a single episode
//! page. Parsing lives in [`crate::scrape::page`].

use std::time::Duration;

use super::{fetch_text, http_client, ApiError};
use crate::models::{EpisodePattern, SearchResult};
use crate::scrape::page::{parse_episode_pattern, parse_search_results};

/// KissKH site client
pub struct KissKhClient {
    base_url: String,
    user_agent: String,
    client: reqwest::Client,
}

impl KissKhClient {
    /// Create a client for the given site root
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            client: http_client(timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a site page with the browser User-Agent
    async fn get_page(&self, url: &str) -> Result<String, ApiError> {
        fetch_text(
            self.client
                .get(url)
                .header(reqwest::header::USER_AGENT, &self.user_agent),
        )
        .await
    }

    /// Search the site and return every qualifying title candidate
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let url = format!("{}/?s={}", self.base_url, urlencoding::encode(query));
        let html = self.get_page(&url).await?;
        Ok(parse_search_results(&html, &self.base_url))
    }

    /// Fetch a title page and derive its episode URL template
    pub async fn episode_pattern(&self, title_url: &str) -> Result<EpisodePattern, ApiError> {
        let html = self.get_page(title_url).await?;
        Ok(parse_episode_pattern(&html, &self.base_url)?)
    }

    /// Fetch the page of one episode
    pub async fn episode_page(
        &self,
        pattern: &EpisodePattern,
        episode: u32,
    ) -> Result<String, ApiError> {
        self.get_page(&pattern.episode_url(episode)).await
    }
}
