//! HTTP session module
//!
//! A thin wrapper around `reqwest` carrying the fixed authentication header,
//! content type, user agent, and timeout for every request.
//!
//! Retry and rate-limit policy deliberately lives in the fetch loop
//! (`crate::pagination`), not here: the source's 429 handling must retry the
//! same page without advancing the cursor, which a client-internal retry
//! cannot express.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};

#[cfg(test)]
mod tests;
