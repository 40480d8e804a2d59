//! In-crate test doubles: a programmable adapter bundle with per-operation
//! failure injection and call counters, plus small fixture builders.

use crate::error::{Error, Result};
use crate::sources::{
    Adapters, AutocompleteSource, ForumSource, KeywordPlanner, TranscriptSource, TrendsSource,
    VideoPlatform, VideoWebSearch, WebQueryCache,
};
use crate::types::{
    Channel, Comment, ForumPost, KeywordIdea, KeywordMetrics, SearchPage, Transcript, TrendData,
    Video, WebVideoHit,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct Calls {
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

/// Programmable adapter backing every source trait at once.
#[derive(Default)]
pub(crate) struct TestSources {
    fixtures: Mutex<Fixtures>,
    pub calls: Calls,
}

impl TestSources {
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn with_search(&self, keyword: &str, page: SearchPage) {
        let mut fx = self.fixtures.lock();
        for v in &page.videos {
            fx.videos.insert(v.id.clone(), v.clone());
        }
        fx.pages.insert(keyword.to_string(), page);
    }

    pub fn with_video(&self, video: Video) {
        self.fixtures.lock().videos.insert(video.id.clone(), video);
    }

    pub fn without_video(&self, id: &str) {
        self.fixtures.lock().videos.remove(id);
    }

    pub fn with_channel(&self, channel: Channel) {
        self.fixtures.lock().channels.insert(channel.id.clone(), channel);
    }

    pub fn with_recent_videos(&self, channel_id: &str, videos: Vec<Video>) {
        self.fixtures.lock().recent.insert(channel_id.to_string(), videos);
    }

    pub fn with_trending(&self, region: &str, videos: Vec<Video>) {
        let mut fx = self.fixtures.lock();
        for v in &videos {
            fx.videos.insert(v.id.clone(), v.clone());
        }
        fx.trending.insert(region.to_string(), videos);
    }

    pub fn with_comments(&self, video_id: &str, comments: Vec<Comment>) {
        self.fixtures.lock().comments.insert(video_id.to_string(), comments);
    }

    pub fn with_platform_suggestions(&self, keyword: &str, suggestions: Vec<String>) {
        self.fixtures
            .lock()
            .platform_suggestions
            .insert(keyword.to_string(), suggestions);
    }

    pub fn with_web_suggestions(&self, keyword: &str, suggestions: Vec<String>) {
        self.fixtures
            .lock()
            .web_suggestions
            .insert(keyword.to_string(), suggestions);
    }

    pub fn with_trends(&self, keyword: &str, trends: TrendData) {
        self.fixtures.lock().trends.insert(keyword.to_string(), trends);
    }

    pub fn with_metrics(&self, keyword: &str, metrics: KeywordMetrics) {
        self.fixtures.lock().metrics.insert(keyword.to_string(), metrics);
    }

    pub fn with_ideas(&self, keyword: &str, ideas: Vec<KeywordIdea>) {
        self.fixtures.lock().ideas.insert(keyword.to_string(), ideas);
    }

    pub fn with_transcript(&self, transcript: Transcript) {
        self.fixtures
            .lock()
            .transcripts
            .insert(transcript.video_id.clone(), transcript);
    }

    pub fn with_forum_posts(&self, query: &str, posts: Vec<ForumPost>) {
        self.fixtures.lock().forum.insert(query.to_string(), posts);
    }
}

#[async_trait]
impl VideoPlatform for TestSources {
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

/// Which suggestion table a [`TestSources`] autocomplete view serves.
pub(crate) struct SuggestView {
    sources: Arc<TestSources>,
    web: bool,
}

#[async_trait]
impl AutocompleteSource for SuggestView {
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
impl TrendsSource for TestSources {
    async fn interest(&self, keyword: &str, _region: &str) -> Result<TrendData> {
        self.calls.interest.fetch_add(1, Ordering::SeqCst);
        self.check("interest")?;
        Ok(self.fixtures.lock().trends.get(keyword).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl KeywordPlanner for TestSources {
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
impl TranscriptSource for TestSources {
    async fn fetch(&self, video_id: &str) -> Result<Option<Transcript>> {
        self.calls.transcript.fetch_add(1, Ordering::SeqCst);
        self.check("transcript")?;
        Ok(self.fixtures.lock().transcripts.get(video_id).cloned())
    }
}

#[async_trait]
impl ForumSource for TestSources {
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
impl VideoWebSearch for TestSources {
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

/// Adapter bundle where every source is the same [`TestSources`].
pub(crate) fn adapters(sources: &Arc<TestSources>) -> Adapters {
    Adapters {
        platform: sources.clone(),
        platform_autocomplete: Arc::new(SuggestView {
            sources: sources.clone(),
            web: false,
        }),
        web_autocomplete: Arc::new(SuggestView {
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
// Fixture builders
// ============================================================================

pub(crate) fn test_video(id: &str, title: &str, views: u64) -> Video {
    Video {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        published_at: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
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

pub(crate) fn test_channel(id: &str, title: &str, subscribers: u64) -> Channel {
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

pub(crate) fn test_comment(id: &str, video_id: &str, text: &str) -> Comment {
    Comment::new(
        id.to_string(),
        video_id.to_string(),
        "author".to_string(),
        text.to_string(),
        1,
        Utc.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap(),
        0,
    )
}
