//! Data structures and types for the KissKH addon
//!
//! Contains all shared models used across the crate organized by domain:
//! - **Requests**: media type and parsed Stremio ids
//! - **Metadata**: canonical title records from Cinemeta
//! - **Site**: KissKH search results and episode URL patterns
//! - **Media**: recovered video/subtitle links and the addon response shapes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Request Models
// =============================================================================

/// Stremio content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Series,
    Movie,
}

impl MediaType {
    /// Path segment used by Stremio and Cinemeta
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Series => "series",
            MediaType::Movie => "movie",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(MediaType::Series),
            "movie" => Ok(MediaType::Movie),
            other => Err(format!("unsupported content type: {}", other)),
        }
    }
}

/// A parsed Stremio request id
///
/// Series ids look like `tt1234567:1:5`; movies are a bare `tt1234567`
/// and always resolve episode 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub external_id: String,
    pub season: u32,
    pub episode: u32,
}

impl MediaRequest {
    /// Parse an id for the given content type
    ///
    /// Returns `None` when the episode part is present but not a positive number.
    pub fn parse(media_type: MediaType, id: &str) -> Option<Self> {
        let mut parts = id.split(':');
        let external_id = parts.next().filter(|s| !s.is_empty())?.to_string();

        if media_type == MediaType::Movie {
            return Some(Self {
                external_id,
                season: 1,
                episode: 1,
            });
        }

        let season = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        let episode = match parts.next() {
            Some(e) => e.parse().ok().filter(|&e: &u32| e > 0)?,
            None => 1,
        };

        Some(Self {
            external_id,
            season,
            episode,
        })
    }

    /// Episode number as used in site URLs and feed file names ("05")
    pub fn padded_episode(&self) -> String {
        pad_episode(self.episode)
    }
}

/// Zero-pad an episode number to two digits
pub fn pad_episode(episode: u32) -> String {
    format!("{:02}", episode)
}

// =============================================================================
// Metadata Models (Cinemeta)
// =============================================================================

/// Canonical title information for an external id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub canonical_name: String,
    pub release_year: Option<String>,
    pub external_id: String,
}

impl TitleRecord {
    /// Key used by the subtitle cache: `<name>-<episode>`
    pub fn cache_key(&self, episode: u32) -> String {
        format!("{}-{}", self.canonical_name, episode)
    }
}

impl fmt::Display for TitleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.release_year {
            Some(year) => write!(f, "{} ({}) [{}]", self.canonical_name, year, self.external_id),
            None => write!(f, "{} [{}]", self.canonical_name, self.external_id),
        }
    }
}

/// Keep only the first year of a range like "2019–2021" or "2020-"
pub fn normalize_year(raw: &str) -> Option<String> {
    let first = raw.split(['-', '–']).next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

// =============================================================================
// Site Models (KissKH)
// =============================================================================

/// Candidate title page from the site search listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub page_url: String,
    pub title: String,
    pub slug: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.title, self.page_url)
    }
}

/// Template for building any episode page URL of one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePattern {
    pub slug: String,
    pub episode_base: String,
    pub base_url: String,
}

impl EpisodePattern {
    /// Episode page URL with the fixed server selector
    pub fn episode_url(&self, episode: u32) -> String {
        format!(
            "{}/?server=02&episode={}",
            self.base_url,
            pad_episode(episode)
        )
    }
}

// =============================================================================
// Media Models
// =============================================================================

/// Links recovered from feed content for one episode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeMedia {
    pub video_url: Option<String>,
    pub subtitle_urls: Vec<String>,
}

impl EpisodeMedia {
    pub fn is_empty(&self) -> bool {
        self.video_url.is_none() && self.subtitle_urls.is_empty()
    }
}

/// Playable stream entry returned to Stremio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub url: String,
    pub title: String,
}

/// Subtitle track returned to Stremio
///
/// `url` is either an inline `data:` URI with repaired text or, when the
/// download failed, the original remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub id: String,
    pub url: String,
    #[serde(rename = "lang")]
    pub language_code: String,
    pub label: String,
}

impl SubtitleTrack {
    /// Whether the track carries inline content rather than a remote link
    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_inline() { "inline" } else { "remote" };
        write!(f, "[{}] {} ({}) {}", self.language_code, self.label, kind, self.id)
    }
}

/// `{ "streams": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamRecord>,
}

/// `{ "subtitles": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitlesResponse {
    pub subtitles: Vec<SubtitleTrack>,
}

// =============================================================================
// Unit Tests
// =============================================================================
