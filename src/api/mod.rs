//! API clients for external services
//!
//! - Cinemeta: canonical title/year for an IMDB id
//! - KissKH: site search, title pages and episode pages
//! - Blogger: feed entries holding the episode link blobs

pub mod blogger;
pub mod cinemeta;
pub mod kisskh;

pub use blogger::{BloggerClient, FeedEntry};
pub use cinemeta::CinemetaClient;
pub use kisskh::KissKhClient;

use reqwest::{RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::error;

use crate::scrape::ExtractError;

/// Upstream error types shared by all clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl ApiError {
    /// Timeouts and connection failures, as opposed to "nothing there"
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::RequestFailed(_) | ApiError::UpstreamStatus(_))
    }
}

/// Send a request and return the body of a successful response
pub(crate) async fn fetch_text(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await?;

    match response.status() {
        status if status.is_success() => Ok(response.text().await?),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(response.url().to_string())),
        status => Err(ApiError::UpstreamStatus(status.as_u16())),
    }
}

/// Build a client with a per-request timeout
///
/// Builder failure (TLS backend init) is logged; the plain client that
/// replaces it has no timeout.
pub(crate) fn http_client(timeout: std::time::Duration) -> reqwest::Client {
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, ?timeout, "HTTP client build failed, requests are unbounded");
            reqwest::Client::new()
        }
    }
}
