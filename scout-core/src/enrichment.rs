//! # Enrichment actor
//!
//! Keyed by video id. Bundles a video with its transcript, comments, and
//! channel. Two entry points: `full` (with transcript, top-50 comments) for
//! single-video lookups, and `fast` (no transcript, top-20 comments) used by
//! the research orchestrator to bound phase-2 latency across ten videos.
//!
//! Missing details fail the call with `NotFound`; everything else is
//! best-effort. Videos are effectively immutable, so results cache for the
//! actor's lifetime.

use crate::constants::{COMMENTS_FAST, COMMENTS_FULL};
use crate::error::{Error, Result};
use crate::runtime::{Actor, Runtime};
use crate::sources::Adapters;
use crate::types::EnrichedVideo;
use async_trait::async_trait;
use tracing::warn;

pub struct EnrichmentActor {
    video_id: String,
    adapters: Adapters,
    full: Option<EnrichedVideo>,
    fast: Option<EnrichedVideo>,
}

#[async_trait]
impl Actor for EnrichmentActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "enrichment"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            video_id: key.to_string(),
            adapters: deps.clone(),
            full: None,
            fast: None,
        })
    }
}

impl EnrichmentActor {
    /// Details + transcript + top-50 comments, then best-effort channel.
    pub async fn full(&mut self) -> Result<EnrichedVideo> {
        if let Some(enriched) = &self.full {
            return Ok(enriched.clone());
        }
        let ids = vec![self.video_id.clone()];
        let (details, transcript, comments) = tokio::join!(
            self.adapters.platform.video_details(&ids),
            self.adapters.transcripts.fetch(&self.video_id),
            self.adapters.platform.comments(&self.video_id, COMMENTS_FULL),
        );

        let video = Self::require_video(&self.video_id, details)?;
        let transcript = transcript.unwrap_or_else(|e| {
            warn!(video_id = %self.video_id, error = %e, "transcript unavailable during enrichment");
            None
        });
        let comments = comments.unwrap_or_else(|e| {
            warn!(video_id = %self.video_id, error = %e, "comments unavailable during enrichment");
            Vec::new()
        });
        let channel = self
            .adapters
            .platform
            .channel_details(&video.channel_id)
            .await
            .unwrap_or_else(|e| {
                warn!(video_id = %self.video_id, error = %e, "channel unavailable during enrichment");
                None
            });

        let enriched = EnrichedVideo {
            video,
            transcript,
            comments,
            channel,
            ranking_signals: None,
        };
        self.full = Some(enriched.clone());
        Ok(enriched)
    }

    /// Details + top-20 comments; the transcript is skipped.
    pub async fn fast(&mut self) -> Result<EnrichedVideo> {
        if let Some(enriched) = &self.fast {
            return Ok(enriched.clone());
        }
        let ids = vec![self.video_id.clone()];
        let (details, comments) = tokio::join!(
            self.adapters.platform.video_details(&ids),
            self.adapters.platform.comments(&self.video_id, COMMENTS_FAST),
        );

        let video = Self::require_video(&self.video_id, details)?;
        let comments = comments.unwrap_or_else(|e| {
            warn!(video_id = %self.video_id, error = %e, "comments unavailable during enrichment");
            Vec::new()
        });
        let channel = self
            .adapters
            .platform
            .channel_details(&video.channel_id)
            .await
            .unwrap_or_else(|e| {
                warn!(video_id = %self.video_id, error = %e, "channel unavailable during enrichment");
                None
            });

        let enriched = EnrichedVideo {
            video,
            transcript: None,
            comments,
            channel,
            ranking_signals: None,
        };
        self.fast = Some(enriched.clone());
        Ok(enriched)
    }

    fn require_video(
        video_id: &str,
        details: Result<Vec<crate::types::Video>>,
    ) -> Result<crate::types::Video> {
        details
            .ok()
            .and_then(|mut videos| {
                if videos.is_empty() {
                    None
                } else {
                    Some(videos.swap_remove(0))
                }
            })
            .ok_or_else(|| Error::NotFound(format!("video {video_id}")))
    }
}

impl Runtime<EnrichmentActor> {
    pub async fn enrich_full(&self, video_id: &str) -> Result<EnrichedVideo> {
        self.call(video_id, |a| Box::pin(async move { a.full().await }))
            .await?
    }

    pub async fn enrich_fast(&self, video_id: &str) -> Result<EnrichedVideo> {
        self.call(video_id, |a| Box::pin(async move { a.fast().await }))
            .await?
    }
}
