//! HTTP hosting for the addon
//!
//! Routes follow the Stremio addon protocol:
//! `/manifest.json`, `/stream/{type}/{id}.json`, `/subtitles/{type}/{id}.json`
//! and `/subtitles/{type}/{id}/{extra}.json`.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, Method},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::addon::{Addon, Manifest};
use crate::models::{MediaType, StreamsResponse, SubtitlesResponse};

/// Build the addon router with CORS and request tracing
pub fn router(addon: Addon) -> Router {
    Router::new()
        .route("/manifest.json", get(manifest))
        .route("/stream/{media_type}/{id}", get(streams))
        .route("/subtitles/{media_type}/{id}", get(subtitles))
        .route("/subtitles/{media_type}/{id}/{extra}", get(subtitles_with_extra))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(addon)
}

/// Bind and serve until the process is stopped
pub async fn serve(addon: Addon, host: &str, port: u16) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, "addon listening, manifest at /manifest.json");
    axum::serve(listener, router(addon)).await?;
    Ok(())
}

async fn manifest(State(addon): State<Addon>) -> Json<Manifest> {
    Json(addon.manifest())
}

async fn streams(
    State(addon): State<Addon>,
    Path((media_type, id)): Path<(String, String)>,
) -> Json<StreamsResponse> {
    let Some(media_type) = parse_type(&media_type) else {
        return Json(StreamsResponse::default());
    };
    Json(addon.streams(media_type, strip_json(&id)).await)
}

async fn subtitles(
    State(addon): State<Addon>,
    Path((media_type, id)): Path<(String, String)>,
) -> Json<SubtitlesResponse> {
    let Some(media_type) = parse_type(&media_type) else {
        return Json(SubtitlesResponse::default());
    };
    Json(addon.subtitles(media_type, strip_json(&id)).await)
}

/// Extra arguments (video hash, file name) are not used for lookup
async fn subtitles_with_extra(
    State(addon): State<Addon>,
    Path((media_type, id, _extra)): Path<(String, String, String)>,
) -> Json<SubtitlesResponse> {
    let Some(media_type) = parse_type(&media_type) else {
        return Json(SubtitlesResponse::default());
    };
    Json(addon.subtitles(media_type, strip_json(&id)).await)
}

fn parse_type(raw: &str) -> Option<MediaType> {
    raw.parse()
        .map_err(|e: String| debug!(error = %e, "ignoring request"))
        .ok()
}

fn strip_json(id: &str) -> &str {
    id.strip_suffix(".json").unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json() {
        assert_eq!(strip_json("tt1:1:2.json"), "tt1:1:2");
        assert_eq!(strip_json("tt1"), "tt1");
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(parse_type("series"), Some(MediaType::Series));
        assert_eq!(parse_type("tv"), None);
    }
}
