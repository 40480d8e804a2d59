//! Transcript scraper: pulls the caption-track manifest from the watch
//! page and fetches the timed-text XML for the best available track.

use crate::client::{get_text, http_client};
use async_trait::async_trait;
use regex::Regex;
use scout_core::sources::TranscriptSource;
use scout_core::{Error, Result, Transcript};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

const WATCH_BASE: &str = "https://www.youtube.com/watch";

static CAPTION_TRACKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""captionTracks":(\[.*?\])"#).expect("valid caption regex"));
static TEXT_NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid text-node regex"));

pub struct TimedTextScraper {
    client: reqwest::Client,
}

impl Default for TimedTextScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl TimedTextScraper {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }
}

/// Pick a track: prefer English, otherwise the first listed.
fn choose_track(tracks: &[Value]) -> Option<(String, String)> {
    let preferred = tracks
        .iter()
        .find(|t| t["languageCode"].as_str().is_some_and(|l| l.starts_with("en")))
        .or_else(|| tracks.first())?;
    let base_url = preferred["baseUrl"].as_str()?.replace("\\u0026", "&");
    let language = preferred["languageCode"].as_str().unwrap_or("und").to_string();
    Some((base_url, language))
}

/// Extract the caption-track manifest embedded in the watch-page HTML.
fn caption_tracks(page: &str) -> Result<Vec<Value>> {
    let Some(captures) = CAPTION_TRACKS_RE.captures(page) else {
        return Ok(Vec::new());
    };
    let raw = captures.get(1).map_or("", |m| m.as_str());
    let tracks: Value = serde_json::from_str(raw)
        .map_err(|e| Error::Adapter(format!("invalid caption manifest: {e}")))?;
    Ok(tracks.as_array().cloned().unwrap_or_default())
}

/// Flatten timed-text XML into one string, entity-decoded.
fn flatten_timed_text(xml: &str) -> String {
    let mut parts = Vec::new();
    for captures in TEXT_NODE_RE.captures_iter(xml) {
        let raw = captures.get(1).map_or("", |m| m.as_str());
        let decoded = html_escape::decode_html_entities(raw);
        // Payloads are double-encoded: &amp;#39; style.
        let decoded = html_escape::decode_html_entities(&decoded).trim().to_string();
        if !decoded.is_empty() {
            parts.push(decoded);
        }
    }
    parts.join(" ")
}

#[async_trait]
impl TranscriptSource for TimedTextScraper {
    async fn fetch(&self, video_id: &str) -> Result<Option<Transcript>> {
        let watch_url = format!("{WATCH_BASE}?v={video_id}");
        let page = get_text(&self.client, &watch_url).await?;
        let tracks = caption_tracks(&page)?;
        let Some((base_url, language)) = choose_track(&tracks) else {
            debug!(video_id, "no caption tracks");
            return Ok(None);
        };

        let xml = get_text(&self.client, &base_url).await?;
        let text = flatten_timed_text(&xml);
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Transcript {
            video_id: video_id.to_string(),
            text,
            language,
        }))
    }
}
