//! Tests for the pagination module

use super::*;

// ============================================================================
// Link Header Parsing Tests
// ============================================================================

#[test]
fn test_parse_link_header_picks_next_rel() {
    let header = "<https://shop.example.com/products.json?page_info=abc>; rel=\"next\", \
                  <https://shop.example.com/products.json?page_info=xyz>; rel=\"previous\"";

    assert_eq!(
        parse_link_header(header, "next"),
        Some("https://shop.example.com/products.json?page_info=abc".to_string())
    );
    assert_eq!(
        parse_link_header(header, "previous"),
        Some("https://shop.example.com/products.json?page_info=xyz".to_string())
    );
}

#[test]
fn test_parse_link_header_no_next_rel() {
    let header = "<https://shop.example.com/products.json?page_info=xyz>; rel=\"previous\"";
    assert_eq!(parse_link_header(header, "next"), None);
}

#[test]
fn test_parse_link_header_single_quotes() {
    let header = "<https://shop.example.com/p?page_info=abc>; rel='next'";
    assert_eq!(
        parse_link_header(header, "next"),
        Some("https://shop.example.com/p?page_info=abc".to_string())
    );
}

#[test]
fn test_parse_link_header_garbage() {
    assert_eq!(parse_link_header("not a link header", "next"), None);
    assert_eq!(parse_link_header("", "next"), None);
    assert_eq!(parse_link_header("rel=\"next\"", "next"), None);
}

#[test]
fn test_next_link_from_headers() {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "link",
        reqwest::header::HeaderValue::from_static(
            "<https://shop.example.com/products.json?page_info=abc>; rel=\"next\"",
        ),
    );
    assert_eq!(
        next_link(&headers),
        Some("https://shop.example.com/products.json?page_info=abc".to_string())
    );

    let empty = reqwest::header::HeaderMap::new();
    assert_eq!(next_link(&empty), None);
}
