//! # Test Utilities
//!
//! Shared helpers for the keyword-scout workspace:
//!
//! - [`ScriptedSources`]: one programmable adapter backing every source
//!   trait, with per-operation failure injection and call counters
//! - Fixture builders for videos, channels, comments, metrics, and trends
//! - [`FailingWriteStore`]: a state store whose writes fail on demand, for
//!   persistence-failure tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use scout_core::runtime::StateStore;
use scout_core::sources::{
    Adapters, AutocompleteSource, ForumSource, KeywordPlanner, TranscriptSource, TrendsSource,
    VideoPlatform, VideoWebSearch, WebQueryCache,
};
use scout_core::{
    Channel, Comment, Competition, Error, ForumPost, KeywordIdea, KeywordMetrics, Result,
    SearchPage, Transcript, TrendData, TrendDirection, Video, WebVideoHit,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-operation call counters.
#[derive(Default)]
pub struct CallCounters {
    pub search: AtomicUsize,
    pub details: AtomicUsize,
    pub channel_details: AtomicUsize,
    pub channel_videos: AtomicUsize,
    pub trending: AtomicUsize,
    pub comments: AtomicUsize,
    pub suggest: AtomicUsize,
    pub interest: AtomicUsize,
    pub metrics: AtomicUsize,
    pub ideas: AtomicUsize,
    pub transcript: AtomicUsize,
    pub forum: AtomicUsize,
    pub web_video: AtomicUsize,
}

#[derive(Default)]
struct Fixtures {
    pages: HashMap<String, SearchPage>,
    videos: HashMap<String, Video>,
    channels: HashMap<String, Channel>,
    recent: HashMap<String, Vec<Video>>,
    trending: HashMap<String, Vec<Video>>,
    comments: HashMap<String, Vec<Comment>>,
    platform_suggestions: HashMap<String, Vec<String>>,
    web_suggestions: HashMap<String, Vec<String>>,
    trends: HashMap<String, TrendData>,
    metrics: HashMap<String, KeywordMetrics>,
    ideas: HashMap<String, Vec<KeywordIdea>>,
    transcripts: HashMap<String, Transcript>,
    forum: HashMap<String, Vec<ForumPost>>,
    web_video: HashMap<String, Vec<WebVideoHit>>,
    failing: HashSet<&'static str>,
}

/// Programmable adapter implementing every source trait at once.
#[derive(Default)]
pub struct ScriptedSources {
    fixtures: Mutex<Fixtures>,
    pub calls: CallCounters,
}

impl ScriptedSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `op` fail until [`ScriptedSources::unfail`] is called. Ops use
    /// the trait method names (`search_videos`, `suggest`, `metrics`, ...).
    pub fn fail(&self, op: &'static str) {
        self.fixtures.lock().failing.insert(op);
    }

    pub fn unfail(&self, op: &'static str) {
        self.fixtures.lock().failing.remove(op);
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if self.fixtures.lock().failing.contains(op) {
            Err(Error::Adapter(format!("{op} failed")))
        } else {
            Ok(())
        }
    }

    pub fn with_search(&self, keyword: &str, page: SearchPage) -> &Self {
        let mut fx = self.fixtures.lock();
        for v in &page.videos {
            fx.videos.insert(v.id.clone(), v.clone());
        }
        fx.pages.insert(keyword.to_string(), page);
        self
    }

    pub fn with_video(&self, video: Video) -> &Self {
        self.fixtures.lock().videos.insert(video.id.clone(), video);
        self
    }

    pub fn without_video(&self, id: &str) -> &Self {
        self.fixtures.lock().videos.remove(id);
        self
    }

    pub fn with_channel(&self, channel: Channel) -> &Self {
        self.fixtures.lock().channels.insert(channel.id.clone(), channel);
        self
    }

    pub fn with_recent_videos(&self, channel_id: &str, videos: Vec<Video>) -> &Self {
        self.fixtures.lock().recent.insert(channel_id.to_string(), videos);
        self
    }

    pub fn with_trending(&self, region: &str, videos: Vec<Video>) -> &Self {
        let mut fx = self.fixtures.lock();
        for v in &videos {
            fx.videos.insert(v.id.clone(), v.clone());
        }
        fx.trending.insert(region.to_string(), videos);
        self
    }

    pub fn with_comments(&self, video_id: &str, comments: Vec<Comment>) -> &Self {
        self.fixtures.lock().comments.insert(video_id.to_string(), comments);
        self
    }

    pub fn with_platform_suggestions(&self, keyword: &str, suggestions: Vec<String>) -> &Self {
        self.fixtures
            .lock()
            .platform_suggestions
            .insert(keyword.to_string(), suggestions);
        self
    }

    pub fn with_web_suggestions(&self, keyword: &str, suggestions: Vec<String>) -> &Self {
        self.fixtures
            .lock()
            .web_suggestions
            .insert(keyword.to_string(), suggestions);
        self
    }

    pub fn with_trends(&self, keyword: &str, trends: TrendData) -> &Self {
        self.fixtures.lock().trends.insert(keyword.to_string(), trends);
        self
    }

    pub fn with_metrics(&self, keyword: &str, metrics: KeywordMetrics) -> &Self {
        self.fixtures.lock().metrics.insert(keyword.to_string(), metrics);
        self
    }

    pub fn with_ideas(&self, keyword: &str, ideas: Vec<KeywordIdea>) -> &Self {
        self.fixtures.lock().ideas.insert(keyword.to_string(), ideas);
        self
    }

    pub fn with_transcript(&self, transcript: Transcript) -> &Self {
        self.fixtures
            .lock()
            .transcripts
            .insert(transcript.video_id.clone(), transcript);
        self
    }

    pub fn with_forum_posts(&self, query: &str, posts: Vec<ForumPost>) -> &Self {
        self.fixtures.lock().forum.insert(query.to_string(), posts);
        self
    }

    pub fn with_web_video_hits(&self, query: &str, hits: Vec<WebVideoHit>) -> &Self {
        self.fixtures.lock().web_video.insert(query.to_string(), hits);
        self
    }
}

#[async_trait]
impl VideoPlatform for ScriptedSources {
    async fn search_videos(&self, query: &str, max: usize) -> Result<SearchPage> {
        self.calls.search.fetch_add(1, Ordering::SeqCst);
        self.check("search_videos")?;
        let mut page = self
            .fixtures
            .lock()
            .pages
            .get(query)
            .cloned()
            .unwrap_or_default();
        page.videos.truncate(max);
        Ok(page)
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<Video>> {
        self.calls.details.fetch_add(1, Ordering::SeqCst);
        self.check("video_details")?;
        let fx = self.fixtures.lock();
        Ok(ids.iter().filter_map(|id| fx.videos.get(id).cloned()).collect())
    }

    async fn channel_details(&self, channel_id: &str) -> Result<Option<Channel>> {
        self.calls.channel_details.fetch_add(1, Ordering::SeqCst);
        self.check("channel_details")?;
        Ok(self.fixtures.lock().channels.get(channel_id).cloned())
    }

    async fn channel_recent_videos(&self, channel_id: &str, max: usize) -> Result<Vec<Video>> {
        self.calls.channel_videos.fetch_add(1, Ordering::SeqCst);
        self.check("channel_recent_videos")?;
        let mut videos = self
            .fixtures
            .lock()
            .recent
            .get(channel_id)
            .cloned()
            .unwrap_or_default();
        videos.truncate(max);
        Ok(videos)
    }

    async fn trending_videos(&self, region: &str, max: usize) -> Result<Vec<Video>> {
        self.calls.trending.fetch_add(1, Ordering::SeqCst);
        self.check("trending_videos")?;
        let mut videos = self
            .fixtures
            .lock()
            .trending
            .get(region)
            .cloned()
            .unwrap_or_default();
        videos.truncate(max);
        Ok(videos)
    }

    async fn comments(&self, video_id: &str, max: usize) -> Result<Vec<Comment>> {
        self.calls.comments.fetch_add(1, Ordering::SeqCst);
        self.check("comments")?;
        let mut comments = self
            .fixtures
            .lock()
            .comments
            .get(video_id)
            .cloned()
            .unwrap_or_default();
        comments.truncate(max);
        Ok(comments)
    }
}

/// One autocomplete provider's view over a [`ScriptedSources`].
pub struct ScriptedAutocomplete {
    sources: Arc<ScriptedSources>,
    web: bool,
}

#[async_trait]
impl AutocompleteSource for ScriptedAutocomplete {
    async fn suggest(&self, keyword: &str) -> Result<Vec<String>> {
        self.sources.calls.suggest.fetch_add(1, Ordering::SeqCst);
        self.sources.check("suggest")?;
        let fx = self.sources.fixtures.lock();
        let table = if self.web {
            &fx.web_suggestions
        } else {
            &fx.platform_suggestions
        };
        Ok(table.get(keyword).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TrendsSource for ScriptedSources {
    async fn interest(&self, keyword: &str, _region: &str) -> Result<TrendData> {
        self.calls.interest.fetch_add(1, Ordering::SeqCst);
        self.check("interest")?;
        Ok(self.fixtures.lock().trends.get(keyword).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl KeywordPlanner for ScriptedSources {
    async fn metrics(&self, keyword: &str) -> Result<KeywordMetrics> {
        self.calls.metrics.fetch_add(1, Ordering::SeqCst);
        self.check("metrics")?;
        Ok(self.fixtures.lock().metrics.get(keyword).cloned().unwrap_or_default())
    }

    async fn ideas(&self, keyword: &str, max: usize) -> Result<Vec<KeywordIdea>> {
        self.calls.ideas.fetch_add(1, Ordering::SeqCst);
        self.check("ideas")?;
        let mut ideas = self
            .fixtures
            .lock()
            .ideas
            .get(keyword)
            .cloned()
            .unwrap_or_default();
        ideas.truncate(max);
        Ok(ideas)
    }
}

#[async_trait]
impl TranscriptSource for ScriptedSources {
    async fn fetch(&self, video_id: &str) -> Result<Option<Transcript>> {
        self.calls.transcript.fetch_add(1, Ordering::SeqCst);
        self.check("transcript")?;
        Ok(self.fixtures.lock().transcripts.get(video_id).cloned())
    }
}

#[async_trait]
impl ForumSource for ScriptedSources {
    async fn search(&self, query: &str, max: usize) -> Result<Vec<ForumPost>> {
        self.calls.forum.fetch_add(1, Ordering::SeqCst);
        self.check("forum")?;
        let mut posts = self
            .fixtures
            .lock()
            .forum
            .get(query)
            .cloned()
            .unwrap_or_default();
        posts.truncate(max);
        Ok(posts)
    }
}

#[async_trait]
impl VideoWebSearch for ScriptedSources {
    async fn search(&self, query: &str, max: usize) -> Result<Vec<WebVideoHit>> {
        self.calls.web_video.fetch_add(1, Ordering::SeqCst);
        self.check("web_video")?;
        let mut hits = self
            .fixtures
            .lock()
            .web_video
            .get(query)
            .cloned()
            .unwrap_or_default();
        hits.truncate(max);
        Ok(hits)
    }
}

/// Build an [`Adapters`] bundle where every source is the same scripted
/// instance.
pub fn scripted_adapters(sources: &Arc<ScriptedSources>) -> Adapters {
    Adapters {
        platform: sources.clone(),
        platform_autocomplete: Arc::new(ScriptedAutocomplete {
            sources: sources.clone(),
            web: false,
        }),
        web_autocomplete: Arc::new(ScriptedAutocomplete {
            sources: sources.clone(),
            web: true,
        }),
        trends: sources.clone(),
        planner: sources.clone(),
        transcripts: sources.clone(),
        forum: sources.clone(),
        video_web: sources.clone(),
        web_cache: Arc::new(WebQueryCache::new()),
    }
}

// ============================================================================
// Failure-injecting state store
// ============================================================================

/// Wraps another [`StateStore`]; writes fail globally or for selected
/// (kind, key) slots.
pub struct FailingWriteStore {
    inner: Arc<dyn StateStore>,
    fail_all_writes: Mutex<bool>,
    failing_slots: Mutex<HashSet<(String, String)>>,
    pub writes_attempted: AtomicUsize,
}

impl FailingWriteStore {
    pub fn new(inner: Arc<dyn StateStore>) -> Self {
        Self {
            inner,
            fail_all_writes: Mutex::new(false),
            failing_slots: Mutex::new(HashSet::new()),
            writes_attempted: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_all_writes.lock() = fail;
    }

    /// Fail writes for one specific slot only.
    pub fn fail_slot(&self, kind: &str, key: &str) {
        self.failing_slots
            .lock()
            .insert((kind.to_string(), key.to_string()));
    }
}

#[async_trait]
impl StateStore for FailingWriteStore {
    async fn read(&self, kind: &str, key: &str) -> Result<Option<serde_json::Value>> {
        self.inner.read(kind, key).await
    }

    async fn write(&self, kind: &str, key: &str, value: &serde_json::Value) -> Result<()> {
        self.writes_attempted.fetch_add(1, Ordering::SeqCst);
        let blocked = *self.fail_all_writes.lock()
            || self
                .failing_slots
                .lock()
                .contains(&(kind.to_string(), key.to_string()));
        if blocked {
            return Err(Error::Adapter(format!("write to {kind}/{key} disabled by test")));
        }
        self.inner.write(kind, key, value).await
    }
}

/// A store that is unreachable for reads, to exercise activation failures.
pub struct UnreachableStore;

#[async_trait]
impl StateStore for UnreachableStore {
    async fn read(&self, _kind: &str, _key: &str) -> Result<Option<serde_json::Value>> {
        Err(Error::Adapter("store offline".to_string()))
    }

    async fn write(&self, _kind: &str, _key: &str, _value: &serde_json::Value) -> Result<()> {
        Err(Error::Adapter("store offline".to_string()))
    }
}

// ============================================================================
// Fixture builders
// ============================================================================

/// Fixed fixture timestamp: 2026-05-01 12:00 UTC.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

pub fn make_video(id: &str, title: &str, views: u64) -> Video {
    Video {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        published_at: fixture_time(),
        channel_id: format!("ch-{id}"),
        channel_title: format!("Channel {id}"),
        tags: Vec::new(),
        category_id: None,
        view_count: views,
        like_count: views / 20,
        comment_count: views / 100,
        duration: "PT10M".to_string(),
        definition: "hd".to_string(),
        thumbnails: vec![format!("https://img.example/{id}.jpg")],
    }
}

pub fn make_channel(id: &str, title: &str, subscribers: u64) -> Channel {
    Channel {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        custom_url: None,
        subscriber_count: subscribers,
        video_count: 100,
        view_count: subscribers * 50,
        keywords: Vec::new(),
        thumbnails: Vec::new(),
    }
}

pub fn make_comment(id: &str, video_id: &str, text: &str) -> Comment {
    Comment::new(
        id.to_string(),
        video_id.to_string(),
        "author".to_string(),
        text.to_string(),
        1,
        fixture_time(),
        0,
    )
}

pub fn make_metrics(volume: u64, competition: Competition, index: u8) -> KeywordMetrics {
    KeywordMetrics {
        monthly_searches: volume,
        competition,
        competition_index: index,
        low_top_of_page_bid_micros: 100_000,
        high_top_of_page_bid_micros: 900_000,
    }
}

pub fn make_idea(keyword: &str, volume: u64, competition: Competition, index: u8) -> KeywordIdea {
    KeywordIdea {
        keyword: keyword.to_string(),
        metrics: make_metrics(volume, competition, index),
    }
}

pub fn make_trends(keyword: &str, interest: u8, direction: TrendDirection) -> TrendData {
    TrendData {
        keyword: keyword.to_string(),
        interest,
        direction,
        related_queries: Vec::new(),
        rising_queries: Vec::new(),
    }
}

/// Seed a keyword with a full research fixture: `count` videos with the
/// keyword in their titles, channels at `subs` subscribers, plus metrics.
pub fn seed_keyword(
    sources: &ScriptedSources,
    keyword: &str,
    count: usize,
    views: u64,
    subs: u64,
    volume: u64,
) {
    let videos: Vec<Video> = (0..count)
        .map(|i| {
            let mut v = make_video(&format!("{keyword}-v{i}"), &format!("{keyword} video {i}"), views);
            v.channel_id = format!("{keyword}-ch{i}");
            v
        })
        .collect();
    for v in &videos {
        sources.with_channel(make_channel(&v.channel_id, &format!("{} channel", v.channel_id), subs));
    }
    sources.with_search(
        keyword,
        SearchPage {
            total_results: count as u64,
            videos,
        },
    );
    sources.with_metrics(keyword, make_metrics(volume, Competition::Unknown, 50));
}
