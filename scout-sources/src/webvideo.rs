//! General web video search: scrapes the video tab of the web search
//! engine's result page. Deliberately thin; results are only a pass-through
//! surface.

use crate::client::{get_text, http_client};
use async_trait::async_trait;
use regex::Regex;
use scout_core::sources::VideoWebSearch;
use scout_core::{Error, Result, WebVideoHit};
use std::sync::LazyLock;
use url::Url;

const SEARCH_BASE: &str = "https://www.google.com/search";

static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a href="/url\?q=(https?://[^&"]+)[^"]*"[^>]*>.*?<h3[^>]*>(.*?)</h3>"#)
        .expect("valid result regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

pub struct GoogleVideoSearch {
    client: reqwest::Client,
}

impl Default for GoogleVideoSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleVideoSearch {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }
}

fn parse_hits(page: &str, max: usize) -> Vec<WebVideoHit> {
    RESULT_RE
        .captures_iter(page)
        .filter_map(|captures| {
            let url = captures.get(1)?.as_str().to_string();
            let raw_title = captures.get(2)?.as_str();
            let title = html_escape::decode_html_entities(&TAG_RE.replace_all(raw_title, ""))
                .trim()
                .to_string();
            let source = Url::parse(&url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_default();
            Some(WebVideoHit { title, url, source })
        })
        .take(max)
        .collect()
}

#[async_trait]
impl VideoWebSearch for GoogleVideoSearch {
    async fn search(&self, query: &str, max: usize) -> Result<Vec<WebVideoHit>> {
        let mut url = Url::parse(SEARCH_BASE)
            .map_err(|e| Error::Adapter(format!("bad search url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("tbm", "vid")
            .append_pair("num", &max.min(30).to_string());
        let page = get_text(&self.client, url.as_str()).await?;
        Ok(parse_hits(&page, max))
    }
}
