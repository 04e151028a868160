//! KissKH page parsers
//!
//! Episode pages embed a `videoPlayerSettings = {...};` assignment and a
//! `<div id="kisskh" data-post-id="...">` marker. Search and title pages are
//! WordPress listings parsed with CSS selectors.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::ExtractError;
use crate::models::{EpisodePattern, SearchResult};

/// Blogger ids tried when the page does not name one
pub const DEFAULT_FEED_IDS: [&str; 4] = [
    "4279541129339784660",
    "5681251218610301606",
    "4930891644815837589",
    "8100659440703509286",
];

/// Default feed ids as owned strings
pub fn default_feed_ids() -> Vec<String> {
    DEFAULT_FEED_IDS.iter().map(|s| s.to_string()).collect()
}

/// Feed identifiers for an episode page, falling back to the defaults
///
/// Never fails: a missing or unparseable settings object yields
/// [`DEFAULT_FEED_IDS`].
pub fn extract_config_identifiers(html: &str) -> Vec<String> {
    extract_config_identifiers_or(html, &default_feed_ids())
}

/// Like [`extract_config_identifiers`] with a caller-supplied fallback list
pub fn extract_config_identifiers_or(html: &str, defaults: &[String]) -> Vec<String> {
    match parse_player_settings(html) {
        Ok(ids) => ids,
        Err(e) => {
            debug!(error = %e, "using default feed ids");
            defaults.to_vec()
        }
    }
}

/// Read `bloggerAPI.blogId` out of the embedded player settings
///
/// The field may be a single id or a list of ids.
pub fn parse_player_settings(html: &str) -> Result<Vec<String>, ExtractError> {
    let re = Regex::new(r"(?s)videoPlayerSettings\s*=\s*(\{.+?\});")
        .map_err(|e| ExtractError::Malformed(e.to_string()))?;

    let literal = re
        .captures(html)
        .and_then(|caps| caps.get(1))
        .ok_or(ExtractError::NotFound("videoPlayerSettings assignment"))?
        .as_str();

    let settings: Value = serde_json::from_str(literal)
        .map_err(|e| ExtractError::Malformed(format!("videoPlayerSettings: {}", e)))?;

    let ids = match settings.pointer("/bloggerAPI/blogId") {
        Some(Value::String(id)) => vec![id.clone()],
        Some(Value::Number(id)) => vec![id.to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    if ids.is_empty() {
        Err(ExtractError::NotFound("bloggerAPI.blogId"))
    } else {
        Ok(ids)
    }
}

/// Numeric post id from the `id="kisskh"` marker element
pub fn extract_post_id(html: &str) -> Result<String, ExtractError> {
    let re = Regex::new(r#"<div[^>]*id="kisskh"[^>]*data-post-id="(\d+)"[^>]*>"#)
        .map_err(|e| ExtractError::Malformed(e.to_string()))?;

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ExtractError::NotFound("kisskh post id marker"))
}

/// Parse the search listing into candidate title pages
///
/// Only links pointing at a `/series/` detail page qualify.
pub fn parse_search_results(html: &str, site_url: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let (Ok(article_sel), Ok(link_sel), Ok(heading_sel)) = (
        Selector::parse(".listupd article.bs"),
        Selector::parse("a"),
        Selector::parse(".tt h2"),
    ) else {
        return Vec::new();
    };

    let series_prefix = format!("{}/series/", site_url.trim_end_matches('/'));

    document
        .select(&article_sel)
        .filter_map(|article| {
            let link = article.select(&link_sel).next()?;
            let href = link.value().attr("href")?;
            if !href.contains("/series/") {
                return None;
            }

            let title = match link.value().attr("title").filter(|t| !t.trim().is_empty()) {
                Some(t) => t.to_string(),
                None => article
                    .select(&heading_sel)
                    .next()
                    .map(|h| h.text().collect::<String>())
                    .unwrap_or_default(),
            };

            let slug = href
                .strip_prefix(&series_prefix)
                .unwrap_or(href)
                .trim_matches('/')
                .to_string();

            Some(SearchResult {
                page_url: href.to_string(),
                title: title.trim().to_string(),
                slug,
            })
        })
        .collect()
}

/// Derive the episode URL template from the first episode-list link
pub fn parse_episode_pattern(html: &str, site_url: &str) -> Result<EpisodePattern, ExtractError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".eplister ul li a")
        .map_err(|e| ExtractError::Malformed(e.to_string()))?;

    let href = document
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(ExtractError::NotFound("episode list link"))?;

    let parts: Vec<&str> = href.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return Err(ExtractError::Malformed(format!(
            "episode link too short: {}",
            href
        )));
    }

    let slug = parts[parts.len() - 2].to_string();
    let episode_base = parts[parts.len() - 1].to_string();
    let base_url = format!("{}/{}/{}", site_url.trim_end_matches('/'), slug, episode_base);

    Ok(EpisodePattern {
        slug,
        episode_base,
        base_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://kisskh.club";

    #[test]
    fn test_config_ids_default_without_settings() {
        let ids = extract_config_identifiers("<html><body>nothing here</body></html>");
        assert_eq!(ids, DEFAULT_FEED_IDS.to_vec());
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_config_ids_custom_fallback() {
        let defaults = vec!["42".to_string()];
        assert_eq!(extract_config_identifiers_or("<html></html>", &defaults), defaults);
    }

    #[test]
    fn test_config_ids_single_value() {
        let html = r#"<script>var videoPlayerSettings = {"bloggerAPI":{"blogId":"111222333"}};</script>"#;
        assert_eq!(extract_config_identifiers(html), vec!["111222333"]);
    }

    #[test]
    fn test_config_ids_list_value() {
        let html = r#"<script>videoPlayerSettings={"bloggerAPI":{"blogId":["1","2"]},"x":1};</script>"#;
        assert_eq!(extract_config_identifiers(html), vec!["1", "2"]);
    }

    #[test]
    fn test_config_ids_malformed_falls_back() {
        let html = "<script>videoPlayerSettings = {bloggerAPI: {blogId: '9'}};</script>";
        assert!(matches!(
            parse_player_settings(html),
            Err(ExtractError::Malformed(_))
        ));
        assert_eq!(extract_config_identifiers(html), DEFAULT_FEED_IDS.to_vec());
    }

    #[test]
    fn test_config_ids_missing_field_falls_back() {
        let html = r#"videoPlayerSettings = {"autoplay":true};"#;
        assert_eq!(
            parse_player_settings(html),
            Err(ExtractError::NotFound("bloggerAPI.blogId"))
        );
        assert_eq!(extract_config_identifiers(html).len(), 4);
    }

    #[test]
    fn test_post_id_found() {
        let html = r#"<div class="player" id="kisskh" data-post-id="987654" data-x="y"></div>"#;
        assert_eq!(extract_post_id(html).unwrap(), "987654");
    }

    #[test]
    fn test_post_id_absent() {
        assert!(extract_post_id(r#"<div id="other" data-post-id="1"></div>"#).is_err());
        assert!(extract_post_id(r#"<div id="kisskh"></div>"#).is_err());
    }

    #[test]
    fn test_parse_search_results() {
        let html = r#"
            <div class="listupd">
              <article class="bs"><a href="https://kisskh.club/series/show-a/" title="Show A">x</a></article>
              <article class="bs"><a href="https://kisskh.club/series/showa-special/"><div class="tt"><h2> Showa Special </h2></div></a></article>
              <article class="bs"><a href="https://kisskh.club/genre/drama/" title="Drama">x</a></article>
            </div>"#;

        let results = parse_search_results(html, SITE);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Show A");
        assert_eq!(results[0].slug, "show-a");
        assert_eq!(results[1].title, "Showa Special");
        assert_eq!(results[1].page_url, "https://kisskh.club/series/showa-special/");
    }

    #[test]
    fn test_empty_title_attribute_uses_heading() {
        let html = r#"<div class="listupd">
              <article class="bs"><a href="https://kisskh.club/series/show-a/" title=""><div class="tt"><h2>Show A</h2></div></a></article>
            </div>"#;

        let results = parse_search_results(html, SITE);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Show A");
    }

    #[test]
    fn test_parse_episode_pattern() {
        let html = r#"<div class="eplister"><ul>
            <li><a href="https://kisskh.club/show-a-episode/episode-16/">16</a></li>
            <li><a href="https://kisskh.club/show-a-episode/episode-15/">15</a></li>
        </ul></div>"#;

        let pattern = parse_episode_pattern(html, SITE).unwrap();
        assert_eq!(pattern.slug, "show-a-episode");
        assert_eq!(pattern.episode_base, "episode-16");
        assert_eq!(pattern.base_url, "https://kisskh.club/show-a-episode/episode-16");
    }

    #[test]
    fn test_parse_episode_pattern_missing_list() {
        assert_eq!(
            parse_episode_pattern("<div></div>", SITE),
            Err(ExtractError::NotFound("episode list link"))
        );
    }
}
