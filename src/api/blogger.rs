//! Blogger feed client
//!
//! Episode link blobs live in Blogger posts. The hosting blog is sharded
//! across several ids and only one usually holds a given post, so callers
//! try each candidate in order and keep the first entry that answers.

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{fetch_text, http_client, ApiError};

/// Blogger feed client
pub struct BloggerClient {
    base_url: String,
    client: reqwest::Client,
}

/// Feed content accepted from one of the candidate blogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub blog_id: String,
    pub content: String,
}

impl BloggerClient {
    /// Create a client; `timeout` bounds each individual blog attempt
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(timeout),
        }
    }

    /// Fetch the content body of one post from one blog
    pub async fn entry_content(&self, blog_id: &str, post_id: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/feeds/{}/posts/default/{}?alt=json",
            self.base_url, blog_id, post_id
        );
        let body = fetch_text(self.client.get(&url)).await?;

        let feed: FeedResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        feed.entry
            .and_then(|e| e.content)
            .map(|c| c.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ApiError::NotFound(format!("post {} in blog {}", post_id, blog_id)))
    }

    /// Try each blog id in order; the first one with content wins
    pub async fn first_entry(&self, blog_ids: &[String], post_id: &str) -> Option<FeedEntry> {
        for blog_id in blog_ids {
            match self.entry_content(blog_id, post_id).await {
                Ok(content) => {
                    return Some(FeedEntry {
                        blog_id: blog_id.clone(),
                        content,
                    })
                }
                Err(e) => debug!(%blog_id, %post_id, error = %e, "feed attempt failed"),
            }
        }
        None
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct FeedResponse {
    entry: Option<EntryRaw>,
}

#[derive(Debug, Deserialize)]
struct EntryRaw {
    content: Option<ContentRaw>,
}

#[derive(Debug, Deserialize)]
struct ContentRaw {
    #[serde(rename = "$t")]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_entry() {
        let feed: FeedResponse =
            serde_json::from_str(r#"{"version":"1.0","entry":{"content":{"type":"html","$t":"a;b"}}}"#)
                .unwrap();
        assert_eq!(feed.entry.unwrap().content.unwrap().text, "a;b");
    }

    #[test]
    fn test_parse_feed_without_entry() {
        let feed: FeedResponse = serde_json::from_str(r#"{"version":"1.0","feed":{}}"#).unwrap();
        assert!(feed.entry.is_none());
    }
}
