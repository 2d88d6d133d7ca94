use std::collections::HashSet;
use url::Url;

/// Parse an absolute URL; malformed input yields `None` rather than an error.
pub fn parse(raw: &str) -> Option<Url> {
    Url::parse(raw).ok()
}

/// Non-empty path segments, percent-encoded as they appear in the URL.
pub fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').filter(|s| !s.is_empty()).collect()
}

pub fn path_segment_set(raw: &str) -> Option<HashSet<String>> {
    let url = parse(raw)?;
    let segments: HashSet<String> = path_segments(&url).into_iter().map(str::to_string).collect();
    Some(segments)
}

/// Path string used when ranking cluster members; unparsable URLs fall back to the raw string.
pub fn path_or_raw(raw: &str) -> String {
    parse(raw)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn has_query(raw: &str) -> bool {
    raw.contains('?')
}

/// Parent "category" URL: drop the last path segment, or fall back to the site root.
/// URLs without a tuple origin (`mailto:`, `data:`) have no parent.
pub fn parent_url(raw: &str) -> Option<String> {
    let url = parse(raw)?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    let origin = origin.ascii_serialization();

    let mut segments = path_segments(&url);
    if segments.len() > 1 {
        segments.pop();
        return Some(format!("{origin}/{}/", segments.join("/")));
    }

    Some(format!("{origin}/"))
}

/// Human topic for a URL: last path segment with hyphens as spaces.
pub fn topic(raw: &str) -> String {
    let last = parse(raw).and_then(|url| {
        let segment = path_segments(&url).last()?.replace('-', " ");
        Some(segment)
    });
    last.filter(|topic| !topic.trim().is_empty())
        .unwrap_or_else(|| "content".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_drops_last_segment() {
        assert_eq!(
            parent_url("https://example.com/blog/seo/old-post").as_deref(),
            Some("https://example.com/blog/seo/")
        );
        assert_eq!(
            parent_url("https://example.com/old-post").as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            parent_url("http://example.com:8080/a/b?x=1").as_deref(),
            Some("http://example.com:8080/a/")
        );
    }

    #[test]
    fn malformed_urls_yield_neutral_values() {
        assert_eq!(parent_url("not a url"), None);
        assert_eq!(parent_url("mailto:someone@example.com"), None);
        assert_eq!(path_segment_set("/relative/path"), None);
        assert_eq!(topic("::::"), "content");
        assert_eq!(path_or_raw("nope"), "nope");
    }

    #[test]
    fn topic_uses_last_non_empty_segment() {
        assert_eq!(topic("https://example.com/guides/keyword-research/"), "keyword research");
        assert_eq!(topic("https://example.com/"), "content");
    }
}
