//! Trends adapter over the explore/widget endpoints. The explore call
//! yields per-widget request tokens; interest-over-time and related-query
//! widgets are then fetched with those tokens. Every response body is
//! prefixed with an anti-XSSI guard that must be stripped before parsing.

use crate::client::{get_text, http_client};
use async_trait::async_trait;
use scout_core::sources::TrendsSource;
use scout_core::{Error, Result, TrendData, TrendDirection};
use serde_json::Value;
use tracing::debug;
use url::Url;

const EXPLORE_URL: &str = "https://trends.google.com/trends/api/explore";
const WIDGET_BASE: &str = "https://trends.google.com/trends/api/widgetdata";

pub struct TrendsApi {
    client: reqwest::Client,
}

impl Default for TrendsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendsApi {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    async fn fetch_widgets(&self, keyword: &str, region: &str) -> Result<Value> {
        let request = serde_json::json!({
            "comparisonItem": [{"keyword": keyword, "geo": region, "time": "today 3-m"}],
            "category": 0,
            "property": "youtube",
        });
        let mut url = Url::parse(EXPLORE_URL)
            .map_err(|e| Error::Adapter(format!("bad explore url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("hl", "en-US")
            .append_pair("tz", "0")
            .append_pair("req", &request.to_string());
        let body = get_text(&self.client, url.as_str()).await?;
        parse_guarded_json(&body)
    }

    async fn fetch_widget_data(&self, endpoint: &str, widget: &Value) -> Result<Value> {
        let token = widget["token"]
            .as_str()
            .ok_or_else(|| Error::Adapter("widget missing token".to_string()))?;
        let request = widget["request"].to_string();
        let mut url = Url::parse(&format!("{WIDGET_BASE}/{endpoint}"))
            .map_err(|e| Error::Adapter(format!("bad widget url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("hl", "en-US")
            .append_pair("tz", "0")
            .append_pair("req", &request)
            .append_pair("token", token);
        let body = get_text(&self.client, url.as_str()).await?;
        parse_guarded_json(&body)
    }
}

/// Strip the `)]}'` anti-XSSI prefix and parse.
fn parse_guarded_json(body: &str) -> Result<Value> {
    let start = body
        .find(['{', '['])
        .ok_or_else(|| Error::Adapter("no JSON in trends response".to_string()))?;
    serde_json::from_str(&body[start..])
        .map_err(|e| Error::Adapter(format!("invalid trends JSON: {e}")))
}

fn find_widget<'a>(widgets: &'a Value, id: &str) -> Option<&'a Value> {
    widgets["widgets"]
        .as_array()?
        .iter()
        .find(|w| w["id"].as_str() == Some(id))
}

/// Interest series -> (latest interest, direction). Direction compares the
/// mean of the last quarter of the series against the first quarter.
fn classify_series(values: &[f64]) -> (u8, TrendDirection) {
    if values.is_empty() {
        return (0, TrendDirection::Unknown);
    }
    let latest = values.last().copied().unwrap_or(0.0).clamp(0.0, 100.0) as u8;
    let quarter = (values.len() / 4).max(1);
    let head = &values[..quarter];
    let tail = &values[values.len() - quarter..];
    let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
    let first = mean(head);
    let last = mean(tail);
    let direction = if last > first * 1.10 {
        TrendDirection::Rising
    } else if last < first * 0.90 {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };
    (latest, direction)
}

fn series_values(multiline: &Value) -> Vec<f64> {
    multiline["default"]["timelineData"]
        .as_array()
        .map(|points| {
            points
                .iter()
                .filter_map(|p| p["value"].as_array()?.first()?.as_f64())
                .collect()
        })
        .unwrap_or_default()
}

/// Ranked-list queries from a related-searches widget payload.
fn ranked_queries(related: &Value, list_index: usize, max: usize) -> Vec<String> {
    related["default"]["rankedList"]
        .as_array()
        .and_then(|lists| lists.get(list_index))
        .and_then(|list| list["rankedKeyword"].as_array())
        .map(|ranked| {
            ranked
                .iter()
                .filter_map(|k| k["query"].as_str())
                .map(str::to_string)
                .take(max)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl TrendsSource for TrendsApi {
    async fn interest(&self, keyword: &str, region: &str) -> Result<TrendData> {
        let widgets = self.fetch_widgets(keyword, region).await?;

        let mut interest = 0;
        let mut direction = TrendDirection::Unknown;
        if let Some(widget) = find_widget(&widgets, "TIMESERIES") {
            let multiline = self.fetch_widget_data("multiline", widget).await?;
            let values = series_values(&multiline);
            (interest, direction) = classify_series(&values);
        }

        let mut related_queries = Vec::new();
        let mut rising_queries = Vec::new();
        if let Some(widget) = find_widget(&widgets, "RELATED_QUERIES") {
            let related = self.fetch_widget_data("relatedsearches", widget).await?;
            related_queries = ranked_queries(&related, 0, 10);
            rising_queries = ranked_queries(&related, 1, 10);
        }

        debug!(keyword, region, interest, "trend data fetched");
        Ok(TrendData {
            keyword: keyword.to_string(),
            interest,
            direction,
            related_queries,
            rising_queries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn guarded_json_strips_prefix() {
        let parsed = parse_guarded_json(")]}'\n{\"widgets\": []}").unwrap();
        assert!(parsed["widgets"].as_array().unwrap().is_empty());
    }

    #[test]
    fn series_classification() {
        assert_eq!(classify_series(&[]), (0, TrendDirection::Unknown));
        let rising: Vec<f64> = (0..40).map(f64::from).collect();
        assert_eq!(classify_series(&rising).1, TrendDirection::Rising);
        let falling: Vec<f64> = (0..40).rev().map(f64::from).collect();
        assert_eq!(classify_series(&falling).1, TrendDirection::Falling);
        let flat = vec![50.0; 40];
        let (latest, direction) = classify_series(&flat);
        assert_eq!(latest, 50);
        assert_eq!(direction, TrendDirection::Stable);
    }

    #[test]
    fn ranked_lists_split_top_and_rising() {
        let related = json!({"default": {"rankedList": [
            {"rankedKeyword": [{"query": "top one"}, {"query": "top two"}]},
            {"rankedKeyword": [{"query": "rising one"}]}
        ]}});
        assert_eq!(ranked_queries(&related, 0, 10), vec!["top one", "top two"]);
        assert_eq!(ranked_queries(&related, 1, 10), vec!["rising one"]);
    }

    #[test]
    fn timeline_values_extract() {
        let multiline = json!({"default": {"timelineData": [
            {"value": [10]}, {"value": [20]}, {"value": [30]}
        ]}});
        assert_eq!(series_values(&multiline), vec![10.0, 20.0, 30.0]);
    }
}
