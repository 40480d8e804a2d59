//! Autocomplete adapters over the shared suggest endpoint. The platform
//! variant scopes suggestions to the video site (`ds=yt`); the web variant
//! returns general search suggestions.

use crate::client::{get_json, http_client};
use async_trait::async_trait;
use scout_core::sources::AutocompleteSource;
use scout_core::Result;
use serde_json::Value;
use url::Url;

const SUGGEST_BASE: &str = "https://suggestqueries.google.com/complete/search";

pub struct SuggestEndpoint {
    client: reqwest::Client,
    base_url: String,
    site_scope: Option<&'static str>,
}

impl SuggestEndpoint {
    /// Suggestions scoped to the video platform.
    pub fn platform() -> Self {
        Self {
            client: http_client(),
            base_url: SUGGEST_BASE.to_string(),
            site_scope: Some("yt"),
        }
    }

    /// General web search suggestions.
    pub fn web() -> Self {
        Self {
            client: http_client(),
            base_url: SUGGEST_BASE.to_string(),
            site_scope: None,
        }
    }
}

/// The endpoint answers `["query", ["s1", "s2", ...], ...]`.
fn parse_suggestions(body: &Value) -> Vec<String> {
    body.get(1)
        .and_then(Value::as_array)
        .map(|suggestions| {
            suggestions
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl AutocompleteSource for SuggestEndpoint {
    async fn suggest(&self, keyword: &str) -> Result<Vec<String>> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| scout_core::Error::Adapter(format!("bad suggest url: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("client", "firefox");
            pairs.append_pair("q", keyword);
            if let Some(scope) = self.site_scope {
                pairs.append_pair("ds", scope);
            }
        }
        let body = get_json(&self.client, url.as_str()).await?;
        Ok(parse_suggestions(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn suggestion_arrays_parse() {
        let body = json!(["sourdough", ["sourdough bread", "sourdough starter"], []]);
        assert_eq!(
            parse_suggestions(&body),
            vec!["sourdough bread".to_string(), "sourdough starter".to_string()]
        );
    }

    #[test]
    fn malformed_bodies_yield_nothing() {
        assert!(parse_suggestions(&json!({"unexpected": true})).is_empty());
        assert!(parse_suggestions(&json!([])).is_empty());
    }
}
