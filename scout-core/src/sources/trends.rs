//! Trends actor: per-keyword, per-region interest cache.

use super::{Adapters, Memo, TrendsSource};
use crate::constants::TRENDS_TTL;
use crate::error::{Error, Result};
use crate::runtime::{Actor, Runtime};
use crate::types::TrendData;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Keyed by `<region>:<keyword>`.
pub struct TrendsActor {
    keyword: String,
    region: String,
    trends: Arc<dyn TrendsSource>,
    memo: Option<Memo<TrendData>>,
}

/// Actor key combining region and keyword.
pub(crate) fn actor_key(region: &str, keyword: &str) -> String {
    format!("{region}:{keyword}")
}

#[async_trait]
impl Actor for TrendsActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "trends"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        let (region, keyword) = key
            .split_once(':')
            .ok_or_else(|| Error::InvalidInput(format!("malformed trends actor key: {key}")))?;
        Ok(Self {
            keyword: keyword.to_string(),
            region: region.to_string(),
            trends: deps.trends.clone(),
            memo: None,
        })
    }
}

impl TrendsActor {
    pub async fn interest(&mut self) -> TrendData {
        if let Some(data) = self.memo.as_ref().and_then(|m| m.fresh(TRENDS_TTL)) {
            return data;
        }
        match self.trends.interest(&self.keyword, &self.region).await {
            Ok(data) => {
                self.memo = Some(Memo::new(data.clone()));
                data
            }
            Err(e) => {
                warn!(keyword = %self.keyword, region = %self.region, error = %e,
                      "trends lookup failed, returning empty trend data");
                TrendData::default()
            }
        }
    }
}

impl Runtime<TrendsActor> {
    pub async fn interest(&self, region: &str, keyword: &str) -> TrendData {
        let key = actor_key(region, keyword);
        match self
            .call(&key, |a| Box::pin(async move { a.interest().await }))
            .await
        {
            Ok(data) => data,
            Err(e) => {
                warn!(keyword, region, error = %e, "trends actor unavailable");
                TrendData::default()
            }
        }
    }
}
