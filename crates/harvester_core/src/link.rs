//! Deep links into the app, opened through a VIEW intent.
use thiserror::Error;
use url::Url;

pub const WEB_BASE: &str = "https://www.instagram.com/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("deep link segment is empty")]
    EmptySegment,
    #[error("invalid deep link: {0}")]
    Parse(#[from] url::ParseError),
}

/// `https://www.instagram.com/{username}/`
pub fn profile(username: &str) -> Result<Url, LinkError> {
    build(&[username])
}

/// `https://www.instagram.com/p/{code}/`
pub fn post(code: &str) -> Result<Url, LinkError> {
    build(&["p", code])
}

/// `https://www.instagram.com/explore/tags/{tag}/`; a leading `#` is dropped.
pub fn hashtag(tag: &str) -> Result<Url, LinkError> {
    build(&["explore", "tags", tag.trim_start_matches('#')])
}

/// `https://www.instagram.com/explore/locations/{code}/`
pub fn location(code: &str) -> Result<Url, LinkError> {
    build(&["explore", "locations", code])
}

fn build(segments: &[&str]) -> Result<Url, LinkError> {
    let segments: Vec<&str> = segments.iter().map(|s| s.trim()).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(LinkError::EmptySegment);
    }
    let mut url = Url::parse(WEB_BASE)?;
    if let Ok(mut path) = url.path_segments_mut() {
        // Trailing empty segment keeps the canonical trailing slash.
        path.clear().extend(segments).push("");
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{hashtag, location, post, profile, LinkError};

    #[test]
    fn links_keep_trailing_slash() {
        assert_eq!(
            profile("some.user").unwrap().as_str(),
            "https://www.instagram.com/some.user/"
        );
        assert_eq!(
            post("B_qh-EYnrjW").unwrap().as_str(),
            "https://www.instagram.com/p/B_qh-EYnrjW/"
        );
        assert_eq!(
            location("213385402").unwrap().as_str(),
            "https://www.instagram.com/explore/locations/213385402/"
        );
    }

    #[test]
    fn hashtag_drops_hash_and_encodes() {
        assert_eq!(
            hashtag("#rust lang").unwrap().as_str(),
            "https://www.instagram.com/explore/tags/rust%20lang/"
        );
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert_eq!(profile("  "), Err(LinkError::EmptySegment));
        assert_eq!(hashtag("#"), Err(LinkError::EmptySegment));
    }
}
