//! # Scout Sources
//!
//! HTTP implementations of the source-adapter contracts defined in
//! `scout_core::sources`: the video platform's data API, the shared
//! suggest endpoint (platform- and web-scoped), the trends widget API, the
//! ad network's keyword planner (with API-key rotation), the community
//! forum, a transcript scraper, and a general web video search.
//!
//! All adapters are reentrant and pool their HTTP connections. Failures
//! surface as [`scout_core::Error::Adapter`]; the per-source actors in the
//! core neutralise them into empty values.

mod autocomplete;
mod client;
mod forum;
mod keys;
mod planner;
mod transcript;
mod trends;
mod webvideo;
mod youtube;

pub use autocomplete::SuggestEndpoint;
pub use forum::RedditSearch;
pub use keys::KeyRing;
pub use planner::GoogleAdsPlanner;
pub use transcript::TimedTextScraper;
pub use trends::TrendsApi;
pub use webvideo::GoogleVideoSearch;
pub use youtube::YouTubeDataApi;

use scout_core::sources::Adapters;
use serde::Deserialize;
use std::sync::Arc;

/// Credentials and knobs for the HTTP adapters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourcesConfig {
    /// Data API key for the video platform. Without it, platform-backed
    /// sources stay unconfigured and degrade to neutral values.
    #[serde(default)]
    pub youtube_api_key: Option<String>,
    /// Ad-network API keys, rotated on quota exhaustion.
    #[serde(default)]
    pub ads_api_keys: Vec<String>,
    /// Ad-network customer id for planner requests.
    #[serde(default)]
    pub ads_customer_id: Option<String>,
    /// User agent sent to the community forum.
    #[serde(default = "default_user_agent")]
    pub forum_user_agent: String,
}

fn default_user_agent() -> String {
    "keyword-scout/0.1".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            ads_api_keys: Vec::new(),
            ads_customer_id: None,
            forum_user_agent: default_user_agent(),
        }
    }
}

/// Build an adapter bundle from the configuration. Unconfigured sources
/// keep the disconnected stub, which the per-source actors neutralise.
pub fn build_adapters(config: &SourcesConfig) -> Adapters {
    let mut adapters = Adapters::disconnected();

    if let Some(api_key) = &config.youtube_api_key {
        adapters.platform = Arc::new(YouTubeDataApi::new(api_key.clone()));
    }
    adapters.platform_autocomplete = Arc::new(SuggestEndpoint::platform());
    adapters.web_autocomplete = Arc::new(SuggestEndpoint::web());
    adapters.trends = Arc::new(TrendsApi::new());
    if !config.ads_api_keys.is_empty() {
        adapters.planner = Arc::new(GoogleAdsPlanner::new(
            config.ads_api_keys.clone(),
            config.ads_customer_id.clone().unwrap_or_default(),
        ));
    }
    adapters.transcripts = Arc::new(TimedTextScraper::new());
    adapters.forum = Arc::new(RedditSearch::new(config.forum_user_agent.clone()));
    adapters.video_web = Arc::new(GoogleVideoSearch::new());

    adapters
}
