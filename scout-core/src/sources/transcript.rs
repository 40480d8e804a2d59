//! Transcript actor: per-video transcript cache. Transcripts never change,
//! so a fetched value (including a confirmed absence) is kept for the
//! actor's lifetime. Only fetch *failures* are retried.

use super::{Adapters, TranscriptSource};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::Transcript;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub struct TranscriptActor {
    video_id: String,
    source: Arc<dyn TranscriptSource>,
    fetched: Option<Option<Transcript>>,
}

#[async_trait]
impl Actor for TranscriptActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "transcript"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            video_id: key.to_string(),
            source: deps.transcripts.clone(),
            fetched: None,
        })
    }
}

impl TranscriptActor {
    pub async fn transcript(&mut self) -> Option<Transcript> {
        if let Some(cached) = &self.fetched {
            return cached.clone();
        }
        match self.source.fetch(&self.video_id).await {
            Ok(transcript) => {
                self.fetched = Some(transcript.clone());
                transcript
            }
            Err(e) => {
                warn!(video_id = %self.video_id, error = %e, "transcript fetch failed");
                None
            }
        }
    }
}

impl Runtime<TranscriptActor> {
    pub async fn transcript(&self, video_id: &str) -> Option<Transcript> {
        match self
            .call(video_id, |a| Box::pin(async move { a.transcript().await }))
            .await
        {
            Ok(t) => t,
            Err(e) => {
                warn!(video_id, error = %e, "transcript actor unavailable");
                None
            }
        }
    }
}
