//! # KeywordScout facade
//!
//! Owns the adapter bundle, every actor runtime, the durable-slot store,
//! and the long-tail update bus, and exposes the public entry points the
//! boundary layer mounts. Cloning is cheap; all state is shared.

use crate::analysis::{AnalysisDeps, KeywordActor};
use crate::bus::LongTailBus;
use crate::enrichment::EnrichmentActor;
use crate::error::Result;
use crate::research::{ResearchActor, ResearchDeps};
use crate::runtime::{Runtime, StateStore};
use crate::sources::{
    Adapters, AutocompleteActor, ChannelActor, CommentsActor, ForumActor, PlannerActor, Provider,
    SearchActor, TranscriptActor, TrendsActor, VideoWebActor,
};
use crate::trending::{TrendingActor, TrendingDeps};
use crate::types::{
    normalize_keyword, AnalysisResult, Channel, Comment, EnrichedVideo, ForumPost, KeywordIdea,
    KeywordMetrics, LongTailResult, LongTailUpdate, ResearchPartial, ResearchResult, ScoutConfig,
    SearchPage, Transcript, TrendData, TrendingKeywordSummary, TrendingVideo, Video, WebVideoHit,
};
use crate::warmup::WarmupWorker;
use std::sync::{Arc, OnceLock};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct KeywordScout {
    config: ScoutConfig,
    search: Arc<Runtime<SearchActor>>,
    autocomplete: Arc<Runtime<AutocompleteActor>>,
    planner: Arc<Runtime<PlannerActor>>,
    trends: Arc<Runtime<TrendsActor>>,
    channels: Arc<Runtime<ChannelActor>>,
    transcripts: Arc<Runtime<TranscriptActor>>,
    comments: Arc<Runtime<CommentsActor>>,
    forum: Arc<Runtime<ForumActor>>,
    video_web: Arc<Runtime<VideoWebActor>>,
    enrichment: Arc<Runtime<EnrichmentActor>>,
    research: Arc<Runtime<ResearchActor>>,
    keywords: Arc<Runtime<KeywordActor>>,
    trending: Arc<Runtime<TrendingActor>>,
    bus: Arc<LongTailBus>,
}

impl KeywordScout {
    /// Wire the full fabric over an adapter bundle and a slot store.
    pub fn new(config: ScoutConfig, adapters: Adapters, store: Arc<dyn StateStore>) -> Self {
        let search = Runtime::<SearchActor>::new(adapters.clone());
        let autocomplete = Runtime::<AutocompleteActor>::new(adapters.clone());
        let planner = Runtime::<PlannerActor>::new(adapters.clone());
        let trends = Runtime::<TrendsActor>::new(adapters.clone());
        let channels = Runtime::<ChannelActor>::new(adapters.clone());
        let transcripts = Runtime::<TranscriptActor>::new(adapters.clone());
        let comments = Runtime::<CommentsActor>::new(adapters.clone());
        let forum = Runtime::<ForumActor>::new(adapters.clone());
        let video_web = Runtime::<VideoWebActor>::new(adapters.clone());
        let enrichment = Runtime::<EnrichmentActor>::new(adapters.clone());

        let research = Runtime::<ResearchActor>::new(ResearchDeps {
            search: search.clone(),
            autocomplete: autocomplete.clone(),
            planner: planner.clone(),
            enrichment: enrichment.clone(),
        });

        let keyword_cell = Arc::new(OnceLock::new());
        let keywords = Runtime::<KeywordActor>::new(AnalysisDeps {
            research: research.clone(),
            trends: trends.clone(),
            planner: planner.clone(),
            channels: channels.clone(),
            store: store.clone(),
            region: config.default_region.clone(),
            keywords: keyword_cell.clone(),
        });
        let _ = keyword_cell.set(keywords.clone());

        let trending = Runtime::<TrendingActor>::new(TrendingDeps {
            platform: adapters.platform.clone(),
            keywords: keyword_cell,
            store,
        });

        Self {
            config,
            search,
            autocomplete,
            planner,
            trends,
            channels,
            transcripts,
            comments,
            forum,
            video_web,
            enrichment,
            research,
            keywords,
            trending,
            bus: Arc::new(LongTailBus::new()),
        }
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    // ========================================================================
    // Primary entry points
    // ========================================================================

    /// Raw research bundle for a keyword.
    pub async fn research_keyword(&self, keyword: &str) -> Result<ResearchResult> {
        self.research.research(&normalize_keyword(keyword)).await
    }

    /// Streaming research partials in completion order.
    pub async fn research_keyword_stream(
        &self,
        keyword: &str,
    ) -> Result<mpsc::Receiver<ResearchPartial>> {
        self.research
            .research_stream(&normalize_keyword(keyword))
            .await
    }

    /// Analyse a keyword and, as a side effect, start the streaming
    /// long-tail analysis publishing on the topic equal to the keyword.
    pub async fn analyse_keyword(
        &self,
        keyword: &str,
        max_long_tails: usize,
    ) -> Result<AnalysisResult> {
        let result = self.keywords.analyse(keyword).await?;
        self.spawn_long_tail_stream(keyword, max_long_tails);
        Ok(result)
    }

    /// Batched long-tail analysis, persisted on the keyword's slot.
    pub async fn analyse_long_tails(
        &self,
        keyword: &str,
        max: usize,
    ) -> Result<Vec<LongTailResult>> {
        self.keywords.long_tails(keyword, max, None).await
    }

    /// Fire the batched long-tail analysis in the background, publishing
    /// incremental updates on the topic. Returns the topic immediately.
    pub fn start_long_tail_analysis(&self, keyword: &str, max: usize) -> String {
        let topic = normalize_keyword(keyword);
        let keywords = self.keywords.clone();
        let bus = self.bus.clone();
        let kw_display = keyword.trim().to_string();
        let publish_topic = topic.clone();
        tokio::spawn(async move {
            let (tx, mut rx) = mpsc::channel(16);
            let forward_bus = bus.clone();
            let forward_topic = publish_topic.clone();
            let forwarder = tokio::spawn(async move {
                while let Some(update) = rx.recv().await {
                    forward_bus.publish(&forward_topic, update);
                }
            });
            if let Err(e) = keywords.long_tails(&kw_display, max, Some(tx)).await {
                warn!(keyword = %kw_display, error = %e, "background long-tail analysis failed");
            }
            let _ = forwarder.await;
        });
        topic
    }

    /// Subscribe to long-tail updates for a parent keyword.
    pub fn on_long_tail_analysed(&self, parent_keyword: &str) -> broadcast::Receiver<LongTailUpdate> {
        self.bus.subscribe(&normalize_keyword(parent_keyword))
    }

    fn spawn_long_tail_stream(&self, keyword: &str, max: usize) {
        let topic = normalize_keyword(keyword);
        let keywords = self.keywords.clone();
        let bus = self.bus.clone();
        let kw_display = keyword.trim().to_string();
        tokio::spawn(async move {
            let (tx, mut rx) = mpsc::channel(16);
            let stream = {
                let keywords = keywords.clone();
                let kw_display = kw_display.clone();
                tokio::spawn(async move { keywords.stream_long_tails(&kw_display, max, tx).await })
            };
            while let Some(update) = rx.recv().await {
                bus.publish(&topic, update);
            }
            match stream.await {
                Ok(Ok(())) => debug!(keyword = %kw_display, "long-tail stream finished"),
                Ok(Err(e)) => warn!(keyword = %kw_display, error = %e, "long-tail stream failed"),
                Err(e) => warn!(keyword = %kw_display, error = %e, "long-tail stream panicked"),
            }
        });
    }

    // ========================================================================
    // Trending digest
    // ========================================================================

    pub async fn get_trending_keywords(&self, region: &str) -> Result<Vec<TrendingKeywordSummary>> {
        self.trending.cached_keywords(region).await
    }

    pub async fn get_trending_videos(&self, region: &str) -> Result<Vec<TrendingVideo>> {
        self.trending.cached_videos(region).await
    }

    pub async fn warm_up_region(&self, region: &str) -> Result<()> {
        self.trending.warm_up(region).await
    }

    /// Spawn the daily warm-up worker for the configured regions. Returns
    /// the shutdown sender and the worker handle.
    pub fn spawn_warmup_worker(&self) -> (watch::Sender<bool>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(false);
        let worker = WarmupWorker::new(
            self.trending.clone(),
            self.config.regions.clone(),
            self.config.warmup_hour_utc,
        );
        (tx, worker.spawn(rx))
    }

    // ========================================================================
    // Pass-throughs
    // ========================================================================

    pub async fn search_videos(&self, query: &str) -> SearchPage {
        self.search.page(&normalize_keyword(query)).await
    }

    pub async fn get_video(&self, video_id: &str) -> Result<EnrichedVideo> {
        self.enrichment.enrich_full(video_id).await
    }

    pub async fn get_channel(&self, channel_id: &str) -> Option<Channel> {
        self.channels.details(channel_id).await
    }

    pub async fn get_channel_videos(&self, channel_id: &str) -> Vec<Video> {
        self.channels.recent_videos(channel_id).await
    }

    pub async fn get_autocomplete(&self, provider: Provider, keyword: &str) -> Vec<String> {
        self.autocomplete
            .suggestions(provider, &normalize_keyword(keyword))
            .await
    }

    pub async fn get_transcript(&self, video_id: &str) -> Option<Transcript> {
        self.transcripts.transcript(video_id).await
    }

    pub async fn get_comments(&self, video_id: &str, max: usize) -> Vec<Comment> {
        self.comments.comments(video_id, max).await
    }

    pub async fn search_forum(&self, query: &str) -> Vec<ForumPost> {
        self.forum.posts(&normalize_keyword(query)).await
    }

    pub async fn get_trends(&self, keyword: &str, region: &str) -> TrendData {
        self.trends.interest(region, &normalize_keyword(keyword)).await
    }

    pub async fn search_video_web(&self, query: &str) -> Vec<WebVideoHit> {
        self.video_web.hits(&normalize_keyword(query)).await
    }

    pub async fn get_keyword_metrics(&self, keyword: &str) -> KeywordMetrics {
        self.planner.metrics(&normalize_keyword(keyword)).await
    }

    pub async fn get_keyword_ideas(&self, keyword: &str) -> Vec<KeywordIdea> {
        self.planner.ideas(&normalize_keyword(keyword)).await
    }
}
