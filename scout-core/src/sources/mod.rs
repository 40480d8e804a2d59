//! # Source adapters and per-source cache actors
//!
//! Each external signal source is specified as an async trait; HTTP
//! implementations live outside the core. One actor kind wraps each source,
//! keyed by the source's natural identifier, holding an in-process memo of
//! its last result with a per-kind TTL.
//!
//! The behavioural contract every wrapper honours: a fresh memo is returned
//! as-is; otherwise the adapter is called and the result memoised; an
//! adapter failure is logged and replaced by the neutral value (empty list,
//! `None`, zero-filled record) so downstream composition degrades instead of
//! failing. The analysis pipelines rely on this.

mod autocomplete;
mod channel;
mod comments;
mod forum;
mod planner;
mod search;
mod transcript;
mod trends;
mod webvideo;

pub use autocomplete::{AutocompleteActor, Provider};
pub use channel::ChannelActor;
pub use comments::CommentsActor;
pub use forum::ForumActor;
pub use planner::PlannerActor;
pub use search::SearchActor;
pub use transcript::TranscriptActor;
pub use trends::TrendsActor;
pub use webvideo::VideoWebActor;

use crate::constants::{WEB_QUERY_CACHE_SIZE, WEB_QUERY_TTL};
use crate::error::Result;
use crate::types::{
    Channel, Comment, ForumPost, KeywordIdea, KeywordMetrics, SearchPage, Transcript, TrendData,
    Video, WebVideoHit,
};
use async_trait::async_trait;
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// Adapter contracts
// ============================================================================

/// The video platform's data API.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Keyword search ordered by relevance, up to `max` results.
    async fn search_videos(&self, query: &str, max: usize) -> Result<SearchPage>;

    /// Full details for a batch of video ids. Unknown ids are absent from
    /// the result.
    async fn video_details(&self, ids: &[String]) -> Result<Vec<Video>>;

    async fn channel_details(&self, channel_id: &str) -> Result<Option<Channel>>;

    /// A channel's most recent uploads, newest first.
    async fn channel_recent_videos(&self, channel_id: &str, max: usize) -> Result<Vec<Video>>;

    /// The region's current trending videos.
    async fn trending_videos(&self, region: &str, max: usize) -> Result<Vec<Video>>;

    /// Top-level comments for a video, most relevant first.
    async fn comments(&self, video_id: &str, max: usize) -> Result<Vec<Comment>>;
}

/// An autocomplete endpoint returning suggestion strings for a prefix.
#[async_trait]
pub trait AutocompleteSource: Send + Sync {
    async fn suggest(&self, keyword: &str) -> Result<Vec<String>>;
}

/// The trends service.
#[async_trait]
pub trait TrendsSource: Send + Sync {
    async fn interest(&self, keyword: &str, region: &str) -> Result<TrendData>;
}

/// The ad network's keyword planner.
#[async_trait]
pub trait KeywordPlanner: Send + Sync {
    async fn metrics(&self, keyword: &str) -> Result<KeywordMetrics>;

    async fn ideas(&self, keyword: &str, max: usize) -> Result<Vec<KeywordIdea>>;
}

/// Transcript scraper. `Ok(None)` means the video has no transcript.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Option<Transcript>>;
}

/// Community forum search.
#[async_trait]
pub trait ForumSource: Send + Sync {
    async fn search(&self, query: &str, max: usize) -> Result<Vec<ForumPost>>;
}

/// General web search restricted to video results.
#[async_trait]
pub trait VideoWebSearch: Send + Sync {
    async fn search(&self, query: &str, max: usize) -> Result<Vec<WebVideoHit>>;
}

// ============================================================================
// Adapter bundle
// ============================================================================

/// Every adapter the fabric fans out to, plus the cross-cutting web-query
/// cache shared by the forum and video-web actors.
#[derive(Clone)]
pub struct Adapters {
    pub platform: Arc<dyn VideoPlatform>,
    pub platform_autocomplete: Arc<dyn AutocompleteSource>,
    pub web_autocomplete: Arc<dyn AutocompleteSource>,
    pub trends: Arc<dyn TrendsSource>,
    pub planner: Arc<dyn KeywordPlanner>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub forum: Arc<dyn ForumSource>,
    pub video_web: Arc<dyn VideoWebSearch>,
    pub web_cache: Arc<WebQueryCache>,
}

impl Adapters {
    /// A bundle whose every adapter fails, for storage-less or offline
    /// deployments: the per-source actors neutralise the failures, so the
    /// whole pipeline still runs and produces zero-signal results.
    pub fn disconnected() -> Self {
        let stub = Arc::new(Disconnected);
        Self {
            platform: stub.clone(),
            platform_autocomplete: stub.clone(),
            web_autocomplete: stub.clone(),
            trends: stub.clone(),
            planner: stub.clone(),
            transcripts: stub.clone(),
            forum: stub.clone(),
            video_web: stub,
            web_cache: Arc::new(WebQueryCache::new()),
        }
    }
}

/// Adapter that reports every source as unconfigured.
struct Disconnected;

macro_rules! unconfigured {
    () => {
        Err(crate::error::Error::Adapter("source not configured".to_string()))
    };
}

#[async_trait]
impl VideoPlatform for Disconnected {
    async fn search_videos(&self, _: &str, _: usize) -> Result<SearchPage> {
        unconfigured!()
    }

    async fn video_details(&self, _: &[String]) -> Result<Vec<Video>> {
        unconfigured!()
    }

    async fn channel_details(&self, _: &str) -> Result<Option<Channel>> {
        unconfigured!()
    }

    async fn channel_recent_videos(&self, _: &str, _: usize) -> Result<Vec<Video>> {
        unconfigured!()
    }

    async fn trending_videos(&self, _: &str, _: usize) -> Result<Vec<Video>> {
        unconfigured!()
    }

    async fn comments(&self, _: &str, _: usize) -> Result<Vec<Comment>> {
        unconfigured!()
    }
}

#[async_trait]
impl AutocompleteSource for Disconnected {
    async fn suggest(&self, _: &str) -> Result<Vec<String>> {
        unconfigured!()
    }
}

#[async_trait]
impl TrendsSource for Disconnected {
    async fn interest(&self, _: &str, _: &str) -> Result<TrendData> {
        unconfigured!()
    }
}

#[async_trait]
impl KeywordPlanner for Disconnected {
    async fn metrics(&self, _: &str) -> Result<KeywordMetrics> {
        unconfigured!()
    }

    async fn ideas(&self, _: &str, _: usize) -> Result<Vec<KeywordIdea>> {
        unconfigured!()
    }
}

#[async_trait]
impl TranscriptSource for Disconnected {
    async fn fetch(&self, _: &str) -> Result<Option<Transcript>> {
        unconfigured!()
    }
}

#[async_trait]
impl ForumSource for Disconnected {
    async fn search(&self, _: &str, _: usize) -> Result<Vec<ForumPost>> {
        unconfigured!()
    }
}

#[async_trait]
impl VideoWebSearch for Disconnected {
    async fn search(&self, _: &str, _: usize) -> Result<Vec<WebVideoHit>> {
        unconfigured!()
    }
}

// ============================================================================
// Freshness memo
// ============================================================================

/// A cached value stamped with its fetch time.
#[derive(Debug, Clone)]
pub(crate) struct Memo<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Clone> Memo<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    pub(crate) fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.stored_at.elapsed() < ttl).then(|| self.value.clone())
    }

    /// Freshness with no horizon (process lifetime).
    pub(crate) fn value(&self) -> T {
        self.value.clone()
    }
}

// ============================================================================
// Cross-cutting web-query cache
// ============================================================================

/// Query cache shared across the forum and video-web actor kinds. Bounded
/// LRU with a single TTL; values round-trip through JSON so one cache can
/// serve differently typed sources.
pub struct WebQueryCache {
    inner: parking_lot::Mutex<LruCache<(String, String), (Instant, serde_json::Value)>>,
}

impl Default for WebQueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl WebQueryCache {
    pub fn new() -> Self {
        let cap = NonZeroUsize::new(WEB_QUERY_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: parking_lot::Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, source: &str, query: &str) -> Option<T> {
        let key = (source.to_string(), query.to_string());
        let mut cache = self.inner.lock();
        let expired = match cache.peek(&key) {
            None => return None,
            Some((stored_at, _)) => stored_at.elapsed() >= WEB_QUERY_TTL,
        };
        if expired {
            cache.pop(&key);
            return None;
        }
        let (_, raw) = cache.get(&key)?;
        serde_json::from_value(raw.clone()).ok()
    }

    pub fn put<T: Serialize>(&self, source: &str, query: &str, value: &T) {
        if let Ok(raw) = serde_json::to_value(value) {
            self.inner
                .lock()
                .put((source.to_string(), query.to_string()), (Instant::now(), raw));
        }
    }
}
