//! Tolerant parsers for KissKH pages and Blogger feed content
//!
//! - Encoding: repair of mis-decoded Spanish characters in subtitles
//! - Page: settings/post-id extraction and listing parsers for site HTML
//! - Feed: per-episode video and subtitle link recovery

pub mod encoding;
pub mod feed;
pub mod page;

use thiserror::Error;

pub use encoding::fix_spanish_chars;
pub use feed::extract_episode_media;
pub use page::{
    extract_config_identifiers, extract_config_identifiers_or, extract_post_id,
    parse_episode_pattern, parse_search_results, DEFAULT_FEED_IDS,
};

/// Extraction failure, split so callers can tell "not there" from "garbled"
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("malformed content: {0}")]
    Malformed(String),
}
