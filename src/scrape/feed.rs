//! Blogger feed content parsing
//!
//! The feed entry body is a `;`-separated blob, one segment per episode,
//! holding JSON-escaped links (`https:\/\/...`) wrapped in quotes. A segment
//! belongs to an episode when it mentions `/<NN>.es.vtt` or `/<NN>.spa.vtt`.
//! Matching is substring based on purpose.

use regex::Regex;

use crate::models::{pad_episode, EpisodeMedia};

/// Recover the video link and Spanish subtitle links for one episode
pub fn extract_episode_media(content: &str, episode: u32) -> EpisodeMedia {
    let markers = subtitle_markers(episode);
    let segments: Vec<&str> = content
        .split(';')
        .filter(|segment| contains_any(segment, &markers))
        .collect();

    EpisodeMedia {
        video_url: segments.iter().find_map(|s| find_video_url(s)),
        subtitle_urls: segments
            .iter()
            .flat_map(|s| find_subtitle_urls(s, &markers))
            .collect(),
    }
}

/// `/05.es.vtt` and `/05.spa.vtt`
fn subtitle_markers(episode: u32) -> [String; 2] {
    let padded = pad_episode(episode);
    [format!("/{}.es.vtt", padded), format!("/{}.spa.vtt", padded)]
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// First direct `.mp4` link in a segment
fn find_video_url(segment: &str) -> Option<String> {
    let re = Regex::new(r#"(https?:\\?/\\?/[^"'\s|]+\.mp4)"#).ok()?;
    let raw = re.captures(segment)?.get(1)?.as_str();
    Some(raw.replace(r"\/", "/"))
}

/// Cloudinary subtitle links in a segment that name the target episode
fn find_subtitle_urls(segment: &str, markers: &[String]) -> Vec<String> {
    let Ok(re) = Regex::new(r"(https?:\\?/\\?/res\.cloudinary\.com\\?/[^/]+\\?/[^,\n]+\.vtt)")
    else {
        return Vec::new();
    };

    re.find_iter(segment)
        .map(|m| clean_url(m.as_str()))
        .filter(|url| contains_any(url, markers))
        .collect()
}

/// Undo JSON escaping and strip quote/backslash noise
fn clean_url(raw: &str) -> String {
    raw.replace(r"\/", "/")
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\\'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_without_video() {
        let content = r#"x;.../05.es.vtt","https://res.cloudinary.com/demo/05.es.vtt";y"#;
        let media = extract_episode_media(content, 5);
        assert_eq!(
            media.subtitle_urls,
            vec!["https://res.cloudinary.com/demo/05.es.vtt"]
        );
        assert_eq!(media.video_url, None);
    }

    #[test]
    fn test_escaped_urls_are_cleaned() {
        let content = concat!(
            r#"{"ep":"01","v":"https:\/\/cdn.example.com\/v\/01.mp4","s":"https:\/\/res.cloudinary.com\/dx\/raw\/upload\/01.es.vtt"};"#,
            r#"{"ep":"02","v":"https:\/\/cdn.example.com\/v\/02.mp4","s":"https:\/\/res.cloudinary.com\/dx\/raw\/upload\/02.spa.vtt"}"#
        );

        let media = extract_episode_media(content, 2);
        assert_eq!(
            media.video_url.as_deref(),
            Some("https://cdn.example.com/v/02.mp4")
        );
        assert_eq!(
            media.subtitle_urls,
            vec!["https://res.cloudinary.com/dx/raw/upload/02.spa.vtt"]
        );
    }

    #[test]
    fn test_other_episode_links_are_ignored() {
        let content = r#"a "https://res.cloudinary.com/d/10.es.vtt","https://res.cloudinary.com/d/01.es.vtt""#;
        let media = extract_episode_media(content, 1);
        assert_eq!(media.subtitle_urls, vec!["https://res.cloudinary.com/d/01.es.vtt"]);
    }

    #[test]
    fn test_no_matching_segment() {
        let content = r#"https://cdn.example.com/03.mp4 https://res.cloudinary.com/d/03.es.vtt"#;
        let media = extract_episode_media(content, 4);
        assert!(media.is_empty());
    }

    #[test]
    fn test_video_taken_from_first_matching_segment() {
        let content = concat!(
            r#"https://res.cloudinary.com/d/07.es.vtt;"#,
            r#"https://res.cloudinary.com/d/07.spa.vtt https://a.example/first.mp4;"#,
            r#"https://res.cloudinary.com/d/07.es.vtt https://a.example/second.mp4"#
        );
        let media = extract_episode_media(content, 7);
        assert_eq!(media.video_url.as_deref(), Some("https://a.example/first.mp4"));
        assert_eq!(media.subtitle_urls.len(), 3);
    }
}
