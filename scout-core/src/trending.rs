//! # Trending-analysis actor
//!
//! Keyed by region code. Warm-up pulls the region's trending videos,
//! extracts weighted keyword candidates, sub-analyses each through the
//! keyword-analysis actor, and persists the digest in a durable slot. The
//! read paths return the slot verbatim and never compute.

use crate::analysis::KeywordActor;
use crate::constants::{TRENDING_KEYWORD_COUNT, TRENDING_VIDEO_COUNT};
use crate::error::Result;
use crate::mining::trending::trending_keywords;
use crate::runtime::{Actor, DurableSlot, Runtime, StateStore};
use crate::sources::VideoPlatform;
use crate::types::{TrendingKeywordSummary, TrendingSlot, TrendingVideo};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, OnceLock};
use tracing::{info, instrument, warn};

const SLOT_KIND: &str = "trending-analysis";

#[derive(Clone)]
pub struct TrendingDeps {
    pub platform: Arc<dyn VideoPlatform>,
    pub keywords: Arc<OnceLock<Arc<Runtime<KeywordActor>>>>,
    pub store: Arc<dyn StateStore>,
}

pub struct TrendingActor {
    region: String,
    deps: TrendingDeps,
    slot: DurableSlot<TrendingSlot>,
}

#[async_trait]
impl Actor for TrendingActor {
    type Deps = TrendingDeps;

    fn kind() -> &'static str {
        SLOT_KIND
    }

    async fn activate(deps: &TrendingDeps, key: &str) -> Result<Self> {
        let slot = DurableSlot::mount(deps.store.clone(), SLOT_KIND, key).await?;
        Ok(Self {
            region: key.to_string(),
            deps: deps.clone(),
            slot,
        })
    }
}

impl TrendingActor {
    /// Refresh the region digest. An empty trending fetch aborts without
    /// touching the slot; per-candidate analysis failures are logged and
    /// skipped.
    #[instrument(skip(self), fields(region = %self.region))]
    pub async fn warm_up(&mut self) -> Result<()> {
        let videos = match self
            .deps
            .platform
            .trending_videos(&self.region, TRENDING_VIDEO_COUNT)
            .await
        {
            Ok(videos) => videos,
            Err(e) => {
                warn!(error = %e, "trending fetch failed, keeping previous digest");
                return Ok(());
            }
        };
        if videos.is_empty() {
            warn!("no trending videos for region, keeping previous digest");
            return Ok(());
        }

        let candidates = trending_keywords(&videos);
        info!(
            videos = videos.len(),
            candidates = candidates.len(),
            "warming trending digest"
        );

        let Some(keyword_runtime) = self.deps.keywords.get().cloned() else {
            warn!("keyword runtime not wired, skipping warm-up");
            return Ok(());
        };

        let mut summaries: Vec<TrendingKeywordSummary> = Vec::new();
        for candidate in candidates.iter().take(TRENDING_KEYWORD_COUNT) {
            match keyword_runtime.analyse(&candidate.keyword).await {
                Ok(result) => {
                    let top_video = &videos[candidate.top_video_index];
                    summaries.push(TrendingKeywordSummary {
                        keyword: candidate.keyword.clone(),
                        grade: result.scores.grade,
                        opportunity: result.scores.opportunity,
                        difficulty: result.scores.difficulty,
                        search_volume: result.search_demand.volume,
                        trending_video_count: candidate.video_count,
                        top_video_title: top_video.title.clone(),
                        top_video_thumbnail: top_video.thumbnails.first().cloned(),
                    });
                }
                Err(e) => {
                    warn!(candidate = %candidate.keyword, error = %e, "trending candidate failed, skipping");
                }
            }
        }

        summaries.sort_by(|a, b| {
            let net_a = i32::from(a.opportunity) - i32::from(a.difficulty);
            let net_b = i32::from(b.opportunity) - i32::from(b.difficulty);
            net_b
                .cmp(&net_a)
                .then_with(|| b.trending_video_count.cmp(&a.trending_video_count))
                .then_with(|| a.keyword.cmp(&b.keyword))
        });

        let slot = self.slot.get_mut();
        slot.keywords = summaries;
        slot.videos = videos.iter().map(TrendingVideo::from).collect();
        slot.last_warmup_at = Some(Utc::now());
        slot.region = self.region.clone();
        self.slot.commit().await?;
        info!(keywords = self.slot.get().keywords.len(), "trending digest warmed");
        Ok(())
    }

    pub fn cached_keywords(&self) -> Vec<TrendingKeywordSummary> {
        self.slot.get().keywords.clone()
    }

    pub fn cached_videos(&self) -> Vec<TrendingVideo> {
        self.slot.get().videos.clone()
    }

    pub fn last_warmup_at(&self) -> Option<chrono::DateTime<Utc>> {
        self.slot.get().last_warmup_at
    }
}

impl Runtime<TrendingActor> {
    pub async fn warm_up(&self, region: &str) -> Result<()> {
        let key = region.trim().to_uppercase();
        self.call(&key, |a| Box::pin(async move { a.warm_up().await }))
            .await?
    }

    pub async fn cached_keywords(&self, region: &str) -> Result<Vec<TrendingKeywordSummary>> {
        let key = region.trim().to_uppercase();
        self.call(&key, |a| Box::pin(async move { a.cached_keywords() }))
            .await
    }

    pub async fn cached_videos(&self, region: &str) -> Result<Vec<TrendingVideo>> {
        let key = region.trim().to_uppercase();
        self.call(&key, |a| Box::pin(async move { a.cached_videos() }))
            .await
    }

    pub async fn last_warmup_at(&self, region: &str) -> Result<Option<chrono::DateTime<Utc>>> {
        let key = region.trim().to_uppercase();
        self.call(&key, |a| Box::pin(async move { a.last_warmup_at() }))
            .await
    }
}
