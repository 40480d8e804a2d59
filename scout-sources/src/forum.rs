//! Community forum adapter over the reddit search endpoint.

use crate::client::{http_client, str_at, u64_at};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use scout_core::sources::ForumSource;
use scout_core::{Error, ForumPost, Result};
use serde_json::Value;
use url::Url;

const SEARCH_URL: &str = "https://www.reddit.com/search.json";

pub struct RedditSearch {
    client: reqwest::Client,
    user_agent: String,
}

impl RedditSearch {
    pub fn new(user_agent: String) -> Self {
        Self {
            client: http_client(),
            user_agent,
        }
    }
}

fn parse_created(raw: &Value) -> DateTime<Utc> {
    raw.as_f64()
        .and_then(|epoch| Utc.timestamp_opt(epoch as i64, 0).single())
        .unwrap_or_default()
}

fn parse_post(child: &Value) -> Option<ForumPost> {
    let data = &child["data"];
    let id = data["id"].as_str()?.to_string();
    Some(ForumPost {
        id,
        title: str_at(data, &["title"]),
        body: str_at(data, &["selftext"]),
        score: data["score"].as_i64().unwrap_or(0),
        comment_count: u64_at(data, &["num_comments"]),
        url: format!("https://www.reddit.com{}", str_at(data, &["permalink"])),
        created_at: parse_created(&data["created_utc"]),
    })
}

#[async_trait]
impl ForumSource for RedditSearch {
    async fn search(&self, query: &str, max: usize) -> Result<Vec<ForumPost>> {
        let mut url =
            Url::parse(SEARCH_URL).map_err(|e| Error::Adapter(format!("bad search url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &max.min(100).to_string())
            .append_pair("sort", "relevance");

        let response = self
            .client
            .get(url.as_str())
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| Error::Adapter(format!("forum request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Adapter(format!("forum search returned {status}")));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Adapter(format!("invalid forum JSON: {e}")))?;

        Ok(body["data"]["children"]
            .as_array()
            .map(|children| children.iter().filter_map(parse_post).collect())
            .unwrap_or_default())
    }
}
