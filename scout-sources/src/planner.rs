//! Keyword-planner adapter over the ad network's keyword-ideas endpoint,
//! with rotation across the configured API keys on quota exhaustion.

use crate::client::{http_client, str_at, u64_at};
use crate::keys::KeyRing;
use async_trait::async_trait;
use scout_core::sources::KeywordPlanner;
use scout_core::{Competition, Error, KeywordIdea, KeywordMetrics, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const API_BASE: &str = "https://googleads.googleapis.com/v16";

pub struct GoogleAdsPlanner {
    client: reqwest::Client,
    ring: Arc<KeyRing>,
    customer_id: String,
    base_url: String,
}

impl GoogleAdsPlanner {
    pub fn new(keys: Vec<String>, customer_id: String) -> Self {
        Self {
            client: http_client(),
            ring: Arc::new(KeyRing::new(keys)),
            customer_id,
            base_url: API_BASE.to_string(),
        }
    }

    /// POST the ideas request, rotating keys on quota errors until the ring
    /// wraps back to where this call started.
    async fn generate_ideas(&self, keyword: &str, max: usize) -> Result<Value> {
        let Some((start, _)) = self.ring.current() else {
            return Err(Error::Adapter("no planner API keys configured".to_string()));
        };
        let url = format!(
            "{}/customers/{}:generateKeywordIdeas",
            self.base_url, self.customer_id
        );
        let request = serde_json::json!({
            "keywordSeed": {"keywords": [keyword]},
            "pageSize": max,
            "includeAdultKeywords": false,
        });

        loop {
            let Some((observed, key)) = self.ring.current() else {
                return Err(Error::Adapter("no planner API keys configured".to_string()));
            };
            let response = self
                .client
                .post(&url)
                .bearer_auth(&key)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::Adapter(format!("planner request failed: {e}")))?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let quota_exceeded = status.as_u16() == 429 || body.contains("RESOURCE_EXHAUSTED");
            if quota_exceeded {
                let next = self.ring.rotate_from(observed);
                warn!(observed, next, "planner key over quota, rotating");
                if next == start {
                    return Err(Error::Adapter(
                        "all planner API keys over quota".to_string(),
                    ));
                }
                continue;
            }
            if !status.is_success() {
                return Err(Error::Adapter(format!("planner returned {status}")));
            }
            return serde_json::from_str(&body)
                .map_err(|e| Error::Adapter(format!("invalid planner JSON: {e}")));
        }
    }
}

fn parse_competition(raw: &str) -> Competition {
    match raw {
        "LOW" => Competition::Low,
        "MEDIUM" => Competition::Medium,
        "HIGH" => Competition::High,
        _ => Competition::Unknown,
    }
}

fn parse_idea(item: &Value) -> Option<KeywordIdea> {
    let keyword = item["text"].as_str()?.to_string();
    let metrics = &item["keywordIdeaMetrics"];
    Some(KeywordIdea {
        keyword,
        metrics: KeywordMetrics {
            monthly_searches: u64_at(metrics, &["avgMonthlySearches"]),
            competition: parse_competition(&str_at(metrics, &["competition"])),
            competition_index: u64_at(metrics, &["competitionIndex"]).min(100) as u8,
            low_top_of_page_bid_micros: u64_at(metrics, &["lowTopOfPageBidMicros"]),
            high_top_of_page_bid_micros: u64_at(metrics, &["highTopOfPageBidMicros"]),
        },
    })
}

fn parse_ideas(body: &Value) -> Vec<KeywordIdea> {
    body["results"]
        .as_array()
        .map(|results| results.iter().filter_map(parse_idea).collect())
        .unwrap_or_default()
}

#[async_trait]
impl KeywordPlanner for GoogleAdsPlanner {
    async fn metrics(&self, keyword: &str) -> Result<KeywordMetrics> {
        let body = self.generate_ideas(keyword, 10).await?;
        let ideas = parse_ideas(&body);
        let lowered = keyword.to_lowercase();
        let exact = ideas
            .iter()
            .find(|idea| idea.keyword.to_lowercase() == lowered)
            .or_else(|| ideas.first());
        debug!(keyword, found = exact.is_some(), "planner metrics fetched");
        Ok(exact.map(|idea| idea.metrics.clone()).unwrap_or_default())
    }

    async fn ideas(&self, keyword: &str, max: usize) -> Result<Vec<KeywordIdea>> {
        let body = self.generate_ideas(keyword, max).await?;
        let mut ideas = parse_ideas(&body);
        ideas.truncate(max);
        Ok(ideas)
    }
}
