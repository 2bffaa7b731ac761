//! Link header parsing (RFC 5988)
//!
//! The source communicates pagination through a `Link` response header
//! listing one or more `<url>; rel="..."` entries. Only the entry tagged
//! `rel="next"` drives continuation; its absence ends the fetch loop.

use reqwest::header::HeaderMap;

/// Extract the next-page URL from a response's headers, if any
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get("link")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| parse_link_header(header, "next"))
}

/// Parse a Link header and extract the URL for the given rel
///
/// Header format: `<url>; rel="next", <url>; rel="prev"`
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    for part in header.split(',') {
        let part = part.trim();
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(stripped) = segment.strip_prefix("rel=") {
                rel = Some(stripped.trim_matches('"').trim_matches('\''));
            }
        }

        if let (Some(u), Some(r)) = (url, rel) {
            if r == target_rel {
                return Some(u.to_string());
            }
        }
    }

    None
}
