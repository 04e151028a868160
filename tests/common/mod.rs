//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use kisskh_addon::api::ApiError;
use kisskh_addon::models::{EpisodePattern, TitleRecord};
use kisskh_addon::resolver::{ResolvedEpisode, Resolver};

/// In-memory resolver that counts how often each stage runs
#[derive(Default)]
pub struct FakeResolver {
    pub title: Option<TitleRecord>,
    pub feed: Option<String>,
    pub subtitle_files: HashMap<String, String>,
    pub lookups: AtomicUsize,
    pub resolves: AtomicUsize,
    pub last_episode: AtomicU32,
}

impl FakeResolver {
    pub fn new(name: &str, feed: &str) -> Self {
        Self {
            title: Some(TitleRecord {
                canonical_name: name.to_string(),
                release_year: Some("2020".to_string()),
                external_id: "tt0000001".to_string(),
            }),
            feed: Some(feed.to_string()),
            ..Self::default()
        }
    }

    pub fn with_subtitle(mut self, url: &str, text: &str) -> Self {
        self.subtitle_files.insert(url.to_string(), text.to_string());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for FakeResolver {
    async fn lookup_title(&self, _external_id: &str) -> Option<TitleRecord> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.title.clone()
    }

    async fn resolve_episode(&self, title: &TitleRecord, episode: u32) -> Option<ResolvedEpisode> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        self.last_episode.store(episode, Ordering::SeqCst);

        let feed_content = self.feed.clone()?;
        Some(ResolvedEpisode {
            title: title.clone(),
            episode,
            pattern: EpisodePattern {
                slug: "show".to_string(),
                episode_base: "episode-1".to_string(),
                base_url: "https://kisskh.club/show/episode-1".to_string(),
            },
            post_id: "1".to_string(),
            blog_id: "2".to_string(),
            feed_content,
        })
    }

    async fn fetch_subtitle(&self, url: &str) -> Result<String, ApiError> {
        self.subtitle_files
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(url.to_string()))
    }
}

/// Feed blob with escaped links for one episode
pub fn feed_for(episode: &str, with_video: bool) -> String {
    let video = if with_video {
        format!(r#""v":"https:\/\/cdn.example.com\/v\/{}.mp4","#, episode)
    } else {
        String::new()
    };
    format!(
        r#"{{"ep":"00"}};{{{}"s1":"https:\/\/res.cloudinary.com\/demo\/raw\/{ep}.es.vtt","s2":"https:\/\/res.cloudinary.com\/demo\/raw\/{ep}.spa.vtt"}};{{"ep":"99"}}"#,
        video,
        ep = episode
    )
}
