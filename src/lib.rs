//! KissKH addon - KissKH videos and Spanish subtitles for Stremio
//!
//! Resolves an IMDB id (plus season/episode) to a direct video link and
//! repaired Spanish subtitle tracks by scraping KissKH and its Blogger feeds.
//!
//! # Modules
//!
//! - `models` - Request ids, title records, links and response shapes
//! - `scrape` - Tolerant page/feed parsers and subtitle text repair
//! - `api` - HTTP clients (Cinemeta, KissKH, Blogger)
//! - `resolver` - The staged resolution chain
//! - `cache` - Process-lifetime subtitle cache
//! - `addon` - Stream and subtitle handlers, manifest
//! - `server` - Axum router for the Stremio addon protocol

pub mod addon;
pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod resolver;
pub mod scrape;
pub mod server;

// Re-export commonly used types
pub use models::{
    EpisodeMedia, EpisodePattern, MediaRequest, MediaType, SearchResult, StreamRecord,
    StreamsResponse, SubtitleTrack, SubtitlesResponse, TitleRecord,
};

pub use addon::{Addon, Manifest};
pub use cache::{MemoryStore, SubtitleCache, SubtitleStore};
pub use config::Config;
pub use resolver::{ResolvedEpisode, Resolver, ResolverChain};
