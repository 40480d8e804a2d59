//! Shared HTTP client construction and JSON navigation helpers.

use scout_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client with standard timeouts.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// GET a URL and parse the body as JSON, mapping failures into adapter
/// errors.
pub(crate) async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Adapter(format!("request failed: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Adapter(format!("{url} returned {status}")));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Adapter(format!("invalid JSON from {url}: {e}")))
}

/// GET a URL and return the body text.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Adapter(format!("request failed: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Adapter(format!("{url} returned {status}")));
    }
    response
        .text()
        .await
        .map_err(|e| Error::Adapter(format!("unreadable body from {url}: {e}")))
}

/// String at a JSON path, empty when absent.
pub(crate) fn str_at(value: &Value, path: &[&str]) -> String {
    let mut cursor = value;
    for segment in path {
        cursor = &cursor[*segment];
    }
    cursor.as_str().unwrap_or_default().to_string()
}

/// Unsigned integer at a JSON path. The platform's statistics arrive as
/// strings, so both representations parse.
pub(crate) fn u64_at(value: &Value, path: &[&str]) -> u64 {
    let mut cursor = value;
    for segment in path {
        cursor = &cursor[*segment];
    }
    match cursor {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
