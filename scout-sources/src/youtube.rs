//! Video platform adapter over the YouTube Data API v3.

use crate::client::{get_json, http_client, str_at, u64_at};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scout_core::sources::VideoPlatform;
use scout_core::{Channel, Comment, Result, SearchPage, Video};
use serde_json::Value;
use tracing::debug;
use url::Url;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeDataApi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeDataApi {
    pub fn new(api_key: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{resource}", self.base_url))
            .map_err(|e| scout_core::Error::Adapter(format!("bad endpoint url: {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn thumbnails(snippet: &Value) -> Vec<String> {
    ["default", "medium", "high"]
        .iter()
        .filter_map(|size| snippet["thumbnails"][size]["url"].as_str())
        .map(str::to_string)
        .collect()
}

/// Parse one item of a `videos.list` response.
fn parse_video(item: &Value) -> Option<Video> {
    let id = item["id"].as_str()?.to_string();
    let snippet = &item["snippet"];
    Some(Video {
        id,
        title: str_at(snippet, &["title"]),
        description: str_at(snippet, &["description"]),
        published_at: parse_timestamp(&str_at(snippet, &["publishedAt"])),
        channel_id: str_at(snippet, &["channelId"]),
        channel_title: str_at(snippet, &["channelTitle"]),
        tags: snippet["tags"]
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        category_id: snippet["categoryId"].as_str().map(str::to_string),
        view_count: u64_at(item, &["statistics", "viewCount"]),
        like_count: u64_at(item, &["statistics", "likeCount"]),
        comment_count: u64_at(item, &["statistics", "commentCount"]),
        duration: str_at(item, &["contentDetails", "duration"]),
        definition: str_at(item, &["contentDetails", "definition"]),
        thumbnails: thumbnails(snippet),
    })
}

/// Parse a `search.list` item into a snippet-only video (no statistics).
fn parse_search_snippet(item: &Value) -> Option<Video> {
    let id = item["id"]["videoId"].as_str()?.to_string();
    let snippet = &item["snippet"];
    Some(Video {
        id,
        title: str_at(snippet, &["title"]),
        description: str_at(snippet, &["description"]),
        published_at: parse_timestamp(&str_at(snippet, &["publishedAt"])),
        channel_id: str_at(snippet, &["channelId"]),
        channel_title: str_at(snippet, &["channelTitle"]),
        thumbnails: thumbnails(snippet),
        ..Video::default()
    })
}

fn parse_channel(item: &Value) -> Option<Channel> {
    let id = item["id"].as_str()?.to_string();
    let snippet = &item["snippet"];
    let declared = str_at(item, &["brandingSettings", "channel", "keywords"]);
    Some(Channel {
        id,
        title: str_at(snippet, &["title"]),
        description: str_at(snippet, &["description"]),
        custom_url: snippet["customUrl"].as_str().map(str::to_string),
        subscriber_count: u64_at(item, &["statistics", "subscriberCount"]),
        video_count: u64_at(item, &["statistics", "videoCount"]),
        view_count: u64_at(item, &["statistics", "viewCount"]),
        keywords: Channel::parse_keywords(&declared),
        thumbnails: thumbnails(snippet),
    })
}

fn parse_comment_thread(item: &Value) -> Option<Comment> {
    let id = item["id"].as_str()?.to_string();
    let snippet = &item["snippet"]["topLevelComment"]["snippet"];
    Some(Comment::new(
        id,
        str_at(snippet, &["videoId"]),
        str_at(snippet, &["authorDisplayName"]),
        str_at(snippet, &["textDisplay"]),
        u64_at(snippet, &["likeCount"]),
        parse_timestamp(&str_at(snippet, &["publishedAt"])),
        u64_at(item, &["snippet", "totalReplyCount"]),
    ))
}

#[async_trait]
impl VideoPlatform for YouTubeDataApi {
    async fn search_videos(&self, query: &str, max: usize) -> Result<SearchPage> {
        let max_results = max.min(50).to_string();
        let url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", &max_results),
            ],
        )?;
        let body = get_json(&self.client, url.as_str()).await?;
        let total_results = u64_at(&body, &["pageInfo", "totalResults"]);
        let ids: Vec<String> = body["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i["id"]["videoId"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        debug!(query, hits = ids.len(), total_results, "search page fetched");

        // Hydrate statistics and durations; keep search order.
        let detailed = self.video_details(&ids).await?;
        let mut by_id: std::collections::HashMap<String, Video> =
            detailed.into_iter().map(|v| (v.id.clone(), v)).collect();
        let videos = ids.iter().filter_map(|id| by_id.remove(id)).collect();
        Ok(SearchPage {
            videos,
            total_results,
        })
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<Video>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");
        let url = self.endpoint(
            "videos",
            &[
                ("part", "snippet,statistics,contentDetails"),
                ("id", &joined),
            ],
        )?;
        let body = get_json(&self.client, url.as_str()).await?;
        Ok(body["items"]
            .as_array()
            .map(|items| items.iter().filter_map(parse_video).collect())
            .unwrap_or_default())
    }

    async fn channel_details(&self, channel_id: &str) -> Result<Option<Channel>> {
        let url = self.endpoint(
            "channels",
            &[
                ("part", "snippet,statistics,brandingSettings"),
                ("id", channel_id),
            ],
        )?;
        let body = get_json(&self.client, url.as_str()).await?;
        Ok(body["items"]
            .as_array()
            .and_then(|items| items.first())
            .and_then(parse_channel))
    }

    async fn channel_recent_videos(&self, channel_id: &str, max: usize) -> Result<Vec<Video>> {
        let max_results = max.min(50).to_string();
        let url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", &max_results),
            ],
        )?;
        let body = get_json(&self.client, url.as_str()).await?;
        Ok(body["items"]
            .as_array()
            .map(|items| items.iter().filter_map(parse_search_snippet).collect())
            .unwrap_or_default())
    }

    async fn trending_videos(&self, region: &str, max: usize) -> Result<Vec<Video>> {
        let max_results = max.min(50).to_string();
        let url = self.endpoint(
            "videos",
            &[
                ("part", "snippet,statistics,contentDetails"),
                ("chart", "mostPopular"),
                ("regionCode", region),
                ("maxResults", &max_results),
            ],
        )?;
        let body = get_json(&self.client, url.as_str()).await?;
        Ok(body["items"]
            .as_array()
            .map(|items| items.iter().filter_map(parse_video).collect())
            .unwrap_or_default())
    }

    async fn comments(&self, video_id: &str, max: usize) -> Result<Vec<Comment>> {
        let max_results = max.min(100).to_string();
        let url = self.endpoint(
            "commentThreads",
            &[
                ("part", "snippet"),
                ("videoId", video_id),
                ("order", "relevance"),
                ("maxResults", &max_results),
            ],
        )?;
        let body = get_json(&self.client, url.as_str()).await?;
        Ok(body["items"]
            .as_array()
            .map(|items| items.iter().filter_map(parse_comment_thread).collect())
            .unwrap_or_default())
    }
}
