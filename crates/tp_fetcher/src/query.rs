use tp_core::{Error, Result};
use url::Url;

/// What the user typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoQuery {
    /// A YouTube link whose id could be extracted.
    Direct(String),
    /// Free text to hand to the search endpoint.
    Search(String),
}

pub fn is_youtube_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "youtube.com" || host == "youtu.be" || host.ends_with(".youtube.com")
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn valid_id(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if !candidate.is_empty() && candidate.chars().all(is_id_char) {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Extracts the video id from `watch?v=`, `youtu.be/`, `/shorts/` and `/embed/` links.
pub fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    let mut segments = url.path_segments()?;
    let first = segments.next().unwrap_or("");

    if host.eq_ignore_ascii_case("youtu.be") {
        return valid_id(first);
    }

    match first {
        "watch" => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .and_then(|(_, v)| valid_id(&v)),
        "shorts" | "embed" | "live" => segments.next().and_then(valid_id),
        _ => None,
    }
}

/// Parses `input` as a URL, assuming `https://` when no scheme is given.
fn as_url(input: &str) -> Option<Url> {
    if input.starts_with("http://") || input.starts_with("https://") {
        Url::parse(input).ok()
    } else {
        Url::parse(&format!("https://{}", input)).ok()
    }
}

/// Decides whether `input` is a video link or a search term.
///
/// Anything that parses as a URL on a YouTube host is a link and must yield an id.
pub fn parse_query(input: &str) -> Result<VideoQuery> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::ResolutionFailed("empty query".to_string()));
    }

    let Some(url) = as_url(input).filter(|url| url.host_str().is_some_and(is_youtube_host)) else {
        return Ok(VideoQuery::Search(input.to_string()));
    };

    youtube_video_id(&url)
        .map(VideoQuery::Direct)
        .ok_or_else(|| Error::ResolutionFailed(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(id: &str) -> VideoQuery {
        VideoQuery::Direct(id.to_string())
    }

    #[test]
    fn test_short_links() {
        assert_eq!(parse_query("https://youtu.be/abc123XYZ").unwrap(), direct("abc123XYZ"));
        assert_eq!(
            parse_query("https://youtu.be/abc123XYZ?si=tracking&t=42").unwrap(),
            direct("abc123XYZ")
        );
        assert_eq!(parse_query("youtu.be/a-b_c").unwrap(), direct("a-b_c"));
    }

    #[test]
    fn test_watch_links() {
        assert_eq!(
            parse_query("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123").unwrap(),
            direct("dQw4w9WgXcQ")
        );
        assert_eq!(
            parse_query("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").unwrap(),
            direct("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_shorts_and_embed() {
        assert_eq!(
            parse_query("https://www.youtube.com/shorts/Zx9_shortId").unwrap(),
            direct("Zx9_shortId")
        );
        assert_eq!(
            parse_query("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            direct("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_link_without_id_fails() {
        for input in [
            "https://www.youtube.com/watch?v=",
            "https://youtu.be/",
            "https://www.youtube.com/@somechannel",
            "https://www.youtube.com",
            "youtube.com",
        ] {
            assert!(
                matches!(parse_query(input), Err(Error::ResolutionFailed(_))),
                "{} should not resolve",
                input
            );
        }
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(
            parse_query("  rust async tutorial ").unwrap(),
            VideoQuery::Search("rust async tutorial".to_string())
        );
        assert_eq!(
            parse_query("러스트 강의").unwrap(),
            VideoQuery::Search("러스트 강의".to_string())
        );
        assert!(parse_query("   ").is_err());
    }

    #[test]
    fn test_foreign_hosts_are_not_videos() {
        let url = Url::parse("https://vimeo.com/watch?v=123").unwrap();
        assert_eq!(youtube_video_id(&url), None);
    }

    #[test]
    fn test_lookalike_hosts_are_search_terms() {
        for input in ["notyoutube.com/x", "youtube.com.evil.example/watch?v=abc", "youtube tutorial"] {
            assert_eq!(
                parse_query(input).unwrap(),
                VideoQuery::Search(input.to_string()),
                "{} should be a search term",
                input
            );
        }
    }
}
