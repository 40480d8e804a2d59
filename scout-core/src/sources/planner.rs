//! Keyword-planner actor: per-keyword metrics and ideas from the ad
//! network. Monthly data, so memos live for the process lifetime.

use super::{Adapters, KeywordPlanner, Memo};
use crate::constants::PLANNER_IDEA_LIMIT;
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::{KeywordIdea, KeywordMetrics};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub struct PlannerActor {
    keyword: String,
    planner: Arc<dyn KeywordPlanner>,
    metrics: Option<Memo<KeywordMetrics>>,
    ideas: Option<Memo<Vec<KeywordIdea>>>,
}

#[async_trait]
impl Actor for PlannerActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "keyword-planner"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            keyword: key.to_string(),
            planner: deps.planner.clone(),
            metrics: None,
            ideas: None,
        })
    }
}

impl PlannerActor {
    pub async fn metrics(&mut self) -> KeywordMetrics {
        if let Some(memo) = &self.metrics {
            return memo.value();
        }
        match self.planner.metrics(&self.keyword).await {
            Ok(metrics) => {
                self.metrics = Some(Memo::new(metrics.clone()));
                metrics
            }
            Err(e) => {
                warn!(keyword = %self.keyword, error = %e, "keyword metrics failed, returning zero metrics");
                KeywordMetrics::default()
            }
        }
    }

    pub async fn ideas(&mut self) -> Vec<KeywordIdea> {
        if let Some(memo) = &self.ideas {
            return memo.value();
        }
        match self.planner.ideas(&self.keyword, PLANNER_IDEA_LIMIT).await {
            Ok(ideas) => {
                self.ideas = Some(Memo::new(ideas.clone()));
                ideas
            }
            Err(e) => {
                warn!(keyword = %self.keyword, error = %e, "keyword ideas failed, returning none");
                Vec::new()
            }
        }
    }
}

impl Runtime<PlannerActor> {
    pub async fn metrics(&self, keyword: &str) -> KeywordMetrics {
        match self
            .call(keyword, |a| Box::pin(async move { a.metrics().await }))
            .await
        {
            Ok(m) => m,
            Err(e) => {
                warn!(keyword, error = %e, "planner actor unavailable");
                KeywordMetrics::default()
            }
        }
    }

    pub async fn ideas(&self, keyword: &str) -> Vec<KeywordIdea> {
        match self
            .call(keyword, |a| Box::pin(async move { a.ideas().await }))
            .await
        {
            Ok(ideas) => ideas,
            Err(e) => {
                warn!(keyword, error = %e, "planner actor unavailable");
                Vec::new()
            }
        }
    }
}
