//! Stremio addon handlers
//!
//! Turns `(type, id)` requests into resolver runs and shapes the results
//! into `{streams}` / `{subtitles}` responses. Handlers never fail: any
//! miss along the way yields an empty list.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::SubtitleCache;
use crate::models::{
    MediaRequest, MediaType, StreamRecord, StreamsResponse, SubtitleTrack, SubtitlesResponse,
};
use crate::resolver::Resolver;
use crate::scrape::fix_spanish_chars;

pub const STREAM_TITLE: &str = "KissKH 720p";
pub const SUBTITLE_LABEL: &str = "Spanish (KissKH)";
pub const SUBTITLE_LANGUAGE: &str = "spa";

/// Addon manifest served at `/manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub id_prefixes: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            id: "community.kisskh.unified".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: "KissKH Videos + Spanish Subs".to_string(),
            description: "Videos and Spanish subtitles from KissKH".to_string(),
            resources: vec!["stream".to_string(), "subtitles".to_string()],
            types: vec!["series".to_string(), "movie".to_string()],
            id_prefixes: vec!["tt".to_string()],
            catalogs: Vec::new(),
        }
    }
}

/// Stream and subtitle handlers sharing one resolver and one cache
#[derive(Clone)]
pub struct Addon {
    resolver: Arc<dyn Resolver>,
    cache: SubtitleCache,
}

impl Addon {
    pub fn new(resolver: Arc<dyn Resolver>, cache: SubtitleCache) -> Self {
        Self { resolver, cache }
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::default()
    }

    pub fn cache(&self) -> &SubtitleCache {
        &self.cache
    }

    /// Resolve the playable video for a request; at most one stream
    pub async fn streams(&self, media_type: MediaType, id: &str) -> StreamsResponse {
        let Some(request) = MediaRequest::parse(media_type, id) else {
            debug!(%media_type, %id, "unparseable stream request id");
            return StreamsResponse::default();
        };

        let Some(title) = self.resolver.lookup_title(&request.external_id).await else {
            return StreamsResponse::default();
        };

        let Some(resolved) = self.resolver.resolve_episode(&title, request.episode).await else {
            return StreamsResponse::default();
        };

        match resolved.media().video_url {
            Some(url) => {
                info!(title = %title.canonical_name, episode = request.episode, "stream found");
                StreamsResponse {
                    streams: vec![StreamRecord {
                        url,
                        title: STREAM_TITLE.to_string(),
                    }],
                }
            }
            None => {
                debug!(title = %title.canonical_name, episode = request.episode, "no video link in feed");
                StreamsResponse::default()
            }
        }
    }

    /// Resolve Spanish subtitles for a request, consulting the cache first
    pub async fn subtitles(&self, media_type: MediaType, id: &str) -> SubtitlesResponse {
        let Some(request) = MediaRequest::parse(media_type, id) else {
            debug!(%media_type, %id, "unparseable subtitle request id");
            return SubtitlesResponse::default();
        };

        let Some(title) = self.resolver.lookup_title(&request.external_id).await else {
            return SubtitlesResponse::default();
        };

        let key = title.cache_key(request.episode);
        if let Some(subtitles) = self.cache.get(&key) {
            debug!(%key, count = subtitles.len(), "subtitle cache hit");
            return SubtitlesResponse { subtitles };
        }

        let Some(resolved) = self.resolver.resolve_episode(&title, request.episode).await else {
            return SubtitlesResponse::default();
        };

        let urls = resolved.media().subtitle_urls;
        if urls.is_empty() {
            debug!(%key, "no subtitle links in feed");
            return SubtitlesResponse::default();
        }

        let subtitles: Vec<SubtitleTrack> =
            join_all(urls.iter().map(|url| self.subtitle_track(url))).await;

        info!(%key, count = subtitles.len(), "subtitles resolved");
        self.cache.set(key, subtitles.clone());
        SubtitlesResponse { subtitles }
    }

    /// Download, repair and inline one subtitle; keep the remote URL on failure
    async fn subtitle_track(&self, url: &str) -> SubtitleTrack {
        let inline = match self.resolver.fetch_subtitle(url).await {
            Ok(text) => to_data_uri(&fix_spanish_chars(&text)),
            Err(e) => {
                warn!(%url, error = %e, "subtitle fetch failed, passing remote url");
                url.to_string()
            }
        };

        SubtitleTrack {
            id: url.to_string(),
            url: inline,
            language_code: SUBTITLE_LANGUAGE.to_string(),
            label: SUBTITLE_LABEL.to_string(),
        }
    }
}

/// Encode subtitle text as a self-contained WebVTT data URI
pub fn to_data_uri(text: &str) -> String {
    format!("data:text/vtt;charset=utf-8;base64,{}", STANDARD.encode(text.as_bytes()))
}
