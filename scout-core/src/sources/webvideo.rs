//! Video web-search actor: per-query general web search restricted to
//! video results, sharing the cross-cutting web-query cache.

use super::{Adapters, VideoWebSearch, WebQueryCache};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::WebVideoHit;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

const WEB_VIDEO_MAX_RESULTS: usize = 20;
const CACHE_SOURCE: &str = "video-web";

pub struct VideoWebActor {
    query: String,
    search: Arc<dyn VideoWebSearch>,
    cache: Arc<WebQueryCache>,
}

#[async_trait]
impl Actor for VideoWebActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "video-web"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            query: key.to_string(),
            search: deps.video_web.clone(),
            cache: deps.web_cache.clone(),
        })
    }
}

impl VideoWebActor {
    pub async fn hits(&mut self) -> Vec<WebVideoHit> {
        if let Some(hits) = self.cache.get::<Vec<WebVideoHit>>(CACHE_SOURCE, &self.query) {
            return hits;
        }
        match self.search.search(&self.query, WEB_VIDEO_MAX_RESULTS).await {
            Ok(hits) => {
                self.cache.put(CACHE_SOURCE, &self.query, &hits);
                hits
            }
            Err(e) => {
                warn!(query = %self.query, error = %e, "video web search failed, returning no hits");
                Vec::new()
            }
        }
    }
}

impl Runtime<VideoWebActor> {
    pub async fn hits(&self, query: &str) -> Vec<WebVideoHit> {
        match self
            .call(query, |a| Box::pin(async move { a.hits().await }))
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query, error = %e, "video web actor unavailable");
                Vec::new()
            }
        }
    }
}
