//! Feed clients for the CWA open-data platform.
//!
//! One submodule per feed. Each keeps the same split: a `build_*_url`
//! helper, pure `parse_*`/`resolve_*` functions over the response body
//! (testable without a network), and a `fetch_*` function composing them
//! with the shared blocking client.

pub mod almanac;
pub mod forecast;
pub mod obs;

use serde_json::Value;

use crate::model::FeedError;

/// GET a feed URL and parse the body as JSON.
///
/// Transport failures are mapped onto the `FeedError` taxonomy here, so
/// the per-feed clients only deal with shape and content problems.
pub fn get_json(client: &reqwest::blocking::Client, url: &str) -> Result<Value, FeedError> {
    let response = client.get(url).send().map_err(|e| {
        if e.is_timeout() {
            FeedError::Timeout(e.to_string())
        } else {
            FeedError::Unreachable(e.to_string())
        }
    })?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| FeedError::Unreachable(format!("failed to read body: {}", e)))?;

    if !status.is_success() {
        // Keep a bounded slice of the body for the diagnostics panel.
        let snippet: String = body.chars().take(200).collect();
        return Err(FeedError::BadStatus {
            status: status.as_u16(),
            body: snippet,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| FeedError::MalformedShape(format!("response is not JSON: {}", e)))
}
