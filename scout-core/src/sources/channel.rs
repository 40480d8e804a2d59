//! Channel actor: per-channel details and recent-upload caches with
//! distinct horizons (details age slowly, upload lists faster).

use super::{Adapters, Memo, VideoPlatform};
use crate::constants::{CHANNEL_DETAILS_TTL, CHANNEL_RECENT_VIDEOS, CHANNEL_VIDEOS_TTL};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::{Channel, Video};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub struct ChannelActor {
    channel_id: String,
    platform: Arc<dyn VideoPlatform>,
    details: Option<Memo<Option<Channel>>>,
    recent: Option<Memo<Vec<Video>>>,
}

#[async_trait]
impl Actor for ChannelActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "channel"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            channel_id: key.to_string(),
            platform: deps.platform.clone(),
            details: None,
            recent: None,
        })
    }
}

impl ChannelActor {
    pub async fn details(&mut self) -> Option<Channel> {
        if let Some(details) = self.details.as_ref().and_then(|m| m.fresh(CHANNEL_DETAILS_TTL)) {
            return details;
        }
        match self.platform.channel_details(&self.channel_id).await {
            Ok(details) => {
                self.details = Some(Memo::new(details.clone()));
                details
            }
            Err(e) => {
                warn!(channel_id = %self.channel_id, error = %e, "channel details failed");
                None
            }
        }
    }

    pub async fn recent_videos(&mut self) -> Vec<Video> {
        if let Some(videos) = self.recent.as_ref().and_then(|m| m.fresh(CHANNEL_VIDEOS_TTL)) {
            return videos;
        }
        match self
            .platform
            .channel_recent_videos(&self.channel_id, CHANNEL_RECENT_VIDEOS)
            .await
        {
            Ok(videos) => {
                self.recent = Some(Memo::new(videos.clone()));
                videos
            }
            Err(e) => {
                warn!(channel_id = %self.channel_id, error = %e, "channel uploads failed");
                Vec::new()
            }
        }
    }
}

impl Runtime<ChannelActor> {
    pub async fn details(&self, channel_id: &str) -> Option<Channel> {
        match self
            .call(channel_id, |a| Box::pin(async move { a.details().await }))
            .await
        {
            Ok(details) => details,
            Err(e) => {
                warn!(channel_id, error = %e, "channel actor unavailable");
                None
            }
        }
    }

    pub async fn recent_videos(&self, channel_id: &str) -> Vec<Video> {
        match self
            .call(channel_id, |a| {
                Box::pin(async move { a.recent_videos().await })
            })
            .await
        {
            Ok(videos) => videos,
            Err(e) => {
                warn!(channel_id, error = %e, "channel actor unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{adapters, test_channel, test_video, TestSources};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn details_and_uploads_cache_separately() {
        let src = Arc::new(TestSources::new());
        src.with_channel(test_channel("ch1", "Rust Channel", 50_000));
        src.with_recent_videos("ch1", vec![test_video("v1", "Rust intro", 10)]);
        let rt = Runtime::<ChannelActor>::new(adapters(&src));

        assert!(rt.details("ch1").await.is_some());
        assert_eq!(rt.recent_videos("ch1").await.len(), 1);
        assert!(rt.details("ch1").await.is_some());
        assert_eq!(src.calls.channel_details.load(Ordering::SeqCst), 1);
        assert_eq!(src.calls.channel_videos.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_neutralise() {
        let src = Arc::new(TestSources::new());
        src.fail("channel_details");
        src.fail("channel_recent_videos");
        let rt = Runtime::<ChannelActor>::new(adapters(&src));
        assert!(rt.details("ch1").await.is_none());
        assert!(rt.recent_videos("ch1").await.is_empty());
    }
}
