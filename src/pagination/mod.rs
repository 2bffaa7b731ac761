//! Paginated catalog fetching
//!
//! # Overview
//!
//! [`Paginator::fetch_all`] walks the products collection by following the
//! `Link: <url>; rel="next"` header from page to page and accumulates every
//! record in visitation order. The loop owns the source's failure policy:
//!
//! - **429**: sleep a fixed cooldown, then re-request the *same* URL. The
//!   cursor does not advance and nothing is appended, so a retried page can
//!   never be double-counted. There is no retry ceiling.
//! - **other non-200**: log and stop, returning everything accumulated so
//!   far (partial-result-on-error).
//! - **transport errors** (timeout, reset): same partial-result early stop.
//!
//! Successful pages are paced with a small fixed delay to stay under the
//! source's rate limit in the first place.

mod link;

pub use link::{next_link, parse_link_header};

use crate::config::SyncSettings;
use crate::error::Result;
use crate::http::HttpClient;
use crate::records::{ProductsPage, RawProduct};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

/// Cursor-following paginator over the products collection
pub struct Paginator<'a> {
    client: &'a HttpClient,
    first_page_url: String,
    rate_limit_cooldown: Duration,
    page_delay: Duration,
}

impl<'a> Paginator<'a> {
    /// Create a paginator for the catalog described by `settings`
    pub fn new(client: &'a HttpClient, settings: &SyncSettings) -> Self {
        Self {
            client,
            first_page_url: settings.products_url(),
            rate_limit_cooldown: settings.fetch.rate_limit_cooldown,
            page_delay: settings.fetch.page_delay,
        }
    }

    /// Fetch every page of the collection, in page order
    ///
    /// Never fails on a mid-run source problem: transport and protocol
    /// errors terminate the loop early and whatever has been accumulated is
    /// returned. Records are appended exactly as the source orders them; no
    /// deduplication happens here.
    pub async fn fetch_all(&self) -> Result<Vec<RawProduct>> {
        let mut products: Vec<RawProduct> = Vec::new();
        let mut url = Some(self.first_page_url.clone());

        while let Some(current) = url.take() {
            let response = match self.client.get(&current).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "transport error, stopping fetch with partial result");
                    break;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    cooldown_secs = self.rate_limit_cooldown.as_secs(),
                    "rate limited, retrying the same page"
                );
                tokio::time::sleep(self.rate_limit_cooldown).await;
                url = Some(current);
                continue;
            }
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                warn!(
                    status = status.as_u16(),
                    body = %body,
                    "unexpected status, stopping fetch with partial result"
                );
                break;
            }

            // The body read consumes the response, so pull the next link out
            // of the headers first.
            let next = next_link(response.headers());
            let page: ProductsPage = match response.json().await {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "failed to decode page, stopping fetch with partial result");
                    break;
                }
            };

            products.extend(page.products);
            info!(total = products.len(), "fetched page");

            url = match next {
                Some(next_url) => match url::Url::parse(&next_url) {
                    Ok(parsed) => Some(parsed.into()),
                    Err(e) => {
                        warn!(next_url = %next_url, error = %e, "malformed next link, stopping fetch");
                        None
                    }
                },
                None => None,
            };

            if url.is_some() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(products)
    }
}

#[cfg(test)]
mod tests;
