//! Forum actor: per-query post search, backed by the cross-cutting
//! web-query cache shared with the video-web actor.

use super::{Adapters, ForumSource, WebQueryCache};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::ForumPost;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

const FORUM_MAX_RESULTS: usize = 25;
const CACHE_SOURCE: &str = "forum";

pub struct ForumActor {
    query: String,
    forum: Arc<dyn ForumSource>,
    cache: Arc<WebQueryCache>,
}

#[async_trait]
impl Actor for ForumActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "forum"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            query: key.to_string(),
            forum: deps.forum.clone(),
            cache: deps.web_cache.clone(),
        })
    }
}

impl ForumActor {
    pub async fn posts(&mut self) -> Vec<ForumPost> {
        if let Some(posts) = self.cache.get::<Vec<ForumPost>>(CACHE_SOURCE, &self.query) {
            return posts;
        }
        match self.forum.search(&self.query, FORUM_MAX_RESULTS).await {
            Ok(posts) => {
                self.cache.put(CACHE_SOURCE, &self.query, &posts);
                posts
            }
            Err(e) => {
                warn!(query = %self.query, error = %e, "forum search failed, returning no posts");
                Vec::new()
            }
        }
    }
}

impl Runtime<ForumActor> {
    pub async fn posts(&self, query: &str) -> Vec<ForumPost> {
        match self
            .call(query, |a| Box::pin(async move { a.posts().await }))
            .await
        {
            Ok(posts) => posts,
            Err(e) => {
                warn!(query, error = %e, "forum actor unavailable");
                Vec::new()
            }
        }
    }
}
