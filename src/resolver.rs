//! Resolution chain: IMDB id → title → site page → episode page → feed
//!
//! Every stage can end the chain. Failures are logged where they happen and
//! turned into `None`; nothing propagates to the request handlers.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::{fetch_text, http_client, ApiError, BloggerClient, CinemetaClient, KissKhClient};
use crate::config::Config;
use crate::models::{EpisodeMedia, EpisodePattern, MediaType, SearchResult, TitleRecord};
use crate::scrape::{extract_config_identifiers_or, extract_episode_media, extract_post_id};

/// Feed content accepted for one episode of one title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEpisode {
    pub title: TitleRecord,
    pub episode: u32,
    pub pattern: EpisodePattern,
    pub post_id: String,
    pub blog_id: String,
    pub feed_content: String,
}

impl ResolvedEpisode {
    /// Video and subtitle links for the resolved episode
    pub fn media(&self) -> EpisodeMedia {
        extract_episode_media(&self.feed_content, self.episode)
    }
}

/// Network-facing steps the request handlers depend on
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Canonical title for an external id (series first, then movie)
    async fn lookup_title(&self, external_id: &str) -> Option<TitleRecord>;

    /// Run the site/feed stages for one episode of a known title
    async fn resolve_episode(&self, title: &TitleRecord, episode: u32) -> Option<ResolvedEpisode>;

    /// Download a subtitle file as text
    async fn fetch_subtitle(&self, url: &str) -> Result<String, ApiError>;
}

/// Pick the candidate for a title name
///
/// Exact case-insensitive match first, then a case-insensitive prefix
/// match, then whatever came first. The release year is not consulted.
pub fn match_title<'a>(results: &'a [SearchResult], name: &str) -> Option<&'a SearchResult> {
    let wanted = name.to_lowercase();

    results
        .iter()
        .find(|r| r.title.to_lowercase() == wanted)
        .or_else(|| {
            results
                .iter()
                .find(|r| r.title.to_lowercase().starts_with(&wanted))
        })
        .or_else(|| results.first())
}

/// The production resolver backed by Cinemeta, KissKH and Blogger
pub struct ResolverChain {
    cinemeta: CinemetaClient,
    site: KissKhClient,
    feed: BloggerClient,
    subtitles: reqwest::Client,
    default_feed_ids: Vec<String>,
}

impl ResolverChain {
    /// Build all clients from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            cinemeta: CinemetaClient::with_base_url(&config.cinemeta_url, config.page_timeout()),
            site: KissKhClient::new(&config.site_url, &config.user_agent, config.page_timeout()),
            feed: BloggerClient::new(&config.feed_url, config.feed_timeout()),
            subtitles: http_client(config.subtitle_timeout()),
            default_feed_ids: config.default_feed_ids.clone(),
        }
    }

    /// Search the site and choose the best candidate
    async fn find_show(&self, name: &str) -> Option<SearchResult> {
        let results = match self.site.search(name).await {
            Ok(results) => results,
            Err(e) => {
                warn!(%name, error = %e, "site search failed");
                return None;
            }
        };

        let found = match_title(&results, name).cloned();
        match &found {
            Some(show) => debug!(%name, matched = %show, candidates = results.len(), "site match"),
            None => debug!(%name, "no site candidates"),
        }
        found
    }

    async fn episode_pattern(&self, show: &SearchResult) -> Option<EpisodePattern> {
        self.site
            .episode_pattern(&show.page_url)
            .await
            .map_err(|e| log_failure("title page", &show.page_url, &e))
            .ok()
    }

    async fn episode_page(&self, pattern: &EpisodePattern, episode: u32) -> Option<String> {
        self.site
            .episode_page(pattern, episode)
            .await
            .map_err(|e| log_failure("episode page", &pattern.episode_url(episode), &e))
            .ok()
    }
}

fn log_failure(stage: &str, url: &str, error: &ApiError) {
    if error.is_unavailable() {
        warn!(%stage, %url, %error, "upstream unavailable");
    } else {
        debug!(%stage, %url, %error, "nothing found");
    }
}

#[async_trait]
impl Resolver for ResolverChain {
    async fn lookup_title(&self, external_id: &str) -> Option<TitleRecord> {
        for media_type in [MediaType::Series, MediaType::Movie] {
            match self.cinemeta.meta(media_type, external_id).await {
                Ok(title) => return Some(title),
                Err(e) => debug!(%external_id, %media_type, error = %e, "metadata lookup failed"),
            }
        }
        warn!(%external_id, "no metadata for id");
        None
    }

    async fn resolve_episode(&self, title: &TitleRecord, episode: u32) -> Option<ResolvedEpisode> {
        let show = self.find_show(&title.canonical_name).await?;
        let pattern = self.episode_pattern(&show).await?;
        let page = self.episode_page(&pattern, episode).await?;

        let post_id = match extract_post_id(&page) {
            Ok(id) => id,
            Err(e) => {
                debug!(title = %title.canonical_name, episode, error = %e, "episode page unrecognized");
                return None;
            }
        };

        let blog_ids = extract_config_identifiers_or(&page, &self.default_feed_ids);
        let Some(entry) = self.feed.first_entry(&blog_ids, &post_id).await else {
            warn!(%post_id, tried = blog_ids.len(), "no feed answered for post");
            return None;
        };

        info!(
            title = %title.canonical_name,
            episode,
            %post_id,
            blog_id = %entry.blog_id,
            "resolved episode feed"
        );

        Some(ResolvedEpisode {
            title: title.clone(),
            episode,
            pattern,
            post_id,
            blog_id: entry.blog_id,
            feed_content: entry.content,
        })
    }

    async fn fetch_subtitle(&self, url: &str) -> Result<String, ApiError> {
        fetch_text(self.subtitles.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> SearchResult {
        SearchResult {
            page_url: format!("https://kisskh.club/series/{}/", title.to_lowercase()),
            title: title.to_string(),
            slug: title.to_lowercase(),
        }
    }

    #[test]
    fn test_exact_match_beats_prefix() {
        let results = vec![result("Showa Special"), result("Show A")];
        assert_eq!(match_title(&results, "show a").unwrap().title, "Show A");
    }

    #[test]
    fn test_exact_match_beats_earlier_prefix() {
        let results = vec![result("Show A: Part 2"), result("Show A")];
        assert_eq!(match_title(&results, "Show A").unwrap().title, "Show A");
    }

    #[test]
    fn test_prefix_match() {
        let results = vec![result("Other"), result("Show A: Part 2")];
        assert_eq!(match_title(&results, "Show A").unwrap().title, "Show A: Part 2");
    }

    #[test]
    fn test_falls_back_to_first() {
        let results = vec![result("Unrelated"), result("Different")];
        assert_eq!(match_title(&results, "Show A").unwrap().title, "Unrelated");
    }

    #[test]
    fn test_no_candidates() {
        assert!(match_title(&[], "Show A").is_none());
    }
}
