//! Comments actor: per-video comment cache. The adapter is asked for the
//! full top-50 once; callers then take the prefix they need, so the fast
//! and full enrichment paths share one fetch.

use super::{Adapters, Memo, VideoPlatform};
use crate::constants::{COMMENTS_FULL, COMMENTS_TTL};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::Comment;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub struct CommentsActor {
    video_id: String,
    platform: Arc<dyn VideoPlatform>,
    memo: Option<Memo<Vec<Comment>>>,
}

#[async_trait]
impl Actor for CommentsActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "comments"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            video_id: key.to_string(),
            platform: deps.platform.clone(),
            memo: None,
        })
    }
}

impl CommentsActor {
    pub async fn comments(&mut self, max: usize) -> Vec<Comment> {
        if let Some(mut comments) = self.memo.as_ref().and_then(|m| m.fresh(COMMENTS_TTL)) {
            comments.truncate(max);
            return comments;
        }
        match self.platform.comments(&self.video_id, COMMENTS_FULL).await {
            Ok(comments) => {
                self.memo = Some(Memo::new(comments.clone()));
                let mut out = comments;
                out.truncate(max);
                out
            }
            Err(e) => {
                warn!(video_id = %self.video_id, error = %e, "comment fetch failed, returning none");
                Vec::new()
            }
        }
    }
}

impl Runtime<CommentsActor> {
    pub async fn comments(&self, video_id: &str, max: usize) -> Vec<Comment> {
        match self
            .call(video_id, move |a| {
                Box::pin(async move { a.comments(max).await })
            })
            .await
        {
            Ok(comments) => comments,
            Err(e) => {
                warn!(video_id, error = %e, "comments actor unavailable");
                Vec::new()
            }
        }
    }
}
