//! # Research orchestrator actor
//!
//! Keyed by keyword. Phase 1 fans out in parallel to video search, both
//! autocomplete providers, and the keyword planner; phase 2 fast-enriches
//! the first ten search results, dropping any whose details fetch failed.
//! The composed result memoises for an hour.
//!
//! A streaming variant yields one partial per source in completion order,
//! then terminates; there is no replay.

use crate::constants::{RESEARCH_ENRICH_COUNT, RESEARCH_TTL};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::sources::{AutocompleteActor, PlannerActor, Provider, SearchActor};
use crate::types::{EnrichedVideo, ResearchPartial, ResearchResult};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::enrichment::EnrichmentActor;
use crate::sources::Memo;

/// Runtimes the orchestrator composes.
#[derive(Clone)]
pub struct ResearchDeps {
    pub search: Arc<Runtime<SearchActor>>,
    pub autocomplete: Arc<Runtime<AutocompleteActor>>,
    pub planner: Arc<Runtime<PlannerActor>>,
    pub enrichment: Arc<Runtime<EnrichmentActor>>,
}

pub struct ResearchActor {
    keyword: String,
    deps: ResearchDeps,
    memo: Option<Memo<ResearchResult>>,
}

#[async_trait]
impl Actor for ResearchActor {
    type Deps = ResearchDeps;

    fn kind() -> &'static str {
        "research"
    }

    async fn activate(deps: &ResearchDeps, key: &str) -> Result<Self> {
        Ok(Self {
            keyword: key.to_string(),
            deps: deps.clone(),
            memo: None,
        })
    }
}

impl ResearchActor {
    #[instrument(skip(self), fields(keyword = %self.keyword))]
    pub async fn research(&mut self) -> ResearchResult {
        if let Some(result) = self.memo.as_ref().and_then(|m| m.fresh(RESEARCH_TTL)) {
            debug!("research memo hit");
            return result;
        }

        // Phase 1: all four sources in parallel.
        let kw = self.keyword.clone();
        let (page, platform_suggestions, web_suggestions, metrics) = tokio::join!(
            self.deps.search.page(&kw),
            self.deps.autocomplete.suggestions(Provider::Platform, &kw),
            self.deps.autocomplete.suggestions(Provider::Web, &kw),
            self.deps.planner.metrics(&kw),
        );

        // Phase 2: fast enrichment of the top results; failed ids dropped.
        let videos = self
            .enrich_top(&page.videos.iter().map(|v| v.id.clone()).collect::<Vec<_>>())
            .await;

        let result = ResearchResult {
            keyword: self.keyword.clone(),
            produced_at: Utc::now(),
            videos,
            platform_suggestions,
            web_suggestions,
            metrics,
            total_results: page.total_results,
        };
        self.memo = Some(Memo::new(result.clone()));
        debug!(
            videos = result.videos.len(),
            total = result.total_results,
            "research composed"
        );
        result
    }

    async fn enrich_top(&self, ids: &[String]) -> Vec<EnrichedVideo> {
        let top = ids.iter().take(RESEARCH_ENRICH_COUNT);
        let fetches = top.map(|id| {
            let enrichment = self.deps.enrichment.clone();
            let id = id.clone();
            async move { enrichment.enrich_fast(&id).await }
        });
        futures::future::join_all(fetches)
            .await
            .into_iter()
            .filter_map(|r| r.ok())
            .collect()
    }

    /// Kick off the streaming variant: one partial per source as each
    /// completes. Returns immediately; the channel closes when all three
    /// sources have reported.
    pub fn research_stream(&self, tx: mpsc::Sender<ResearchPartial>) {
        let kw = self.keyword.clone();
        let deps = self.deps.clone();

        let search_tx = tx.clone();
        let search_kw = kw.clone();
        let search = deps.search.clone();
        tokio::spawn(async move {
            let page = search.page(&search_kw).await;
            let _ = search_tx.send(ResearchPartial::Search(page)).await;
        });

        let platform_tx = tx.clone();
        let platform_kw = kw.clone();
        let autocomplete = deps.autocomplete.clone();
        tokio::spawn(async move {
            let suggestions = autocomplete
                .suggestions(Provider::Platform, &platform_kw)
                .await;
            let _ = platform_tx
                .send(ResearchPartial::PlatformSuggestions(suggestions))
                .await;
        });

        let web_autocomplete = deps.autocomplete;
        tokio::spawn(async move {
            let suggestions = web_autocomplete.suggestions(Provider::Web, &kw).await;
            let _ = tx.send(ResearchPartial::WebSuggestions(suggestions)).await;
        });
    }
}

impl Runtime<ResearchActor> {
    /// Cached-or-fresh research for a keyword.
    pub async fn research(&self, keyword: &str) -> Result<ResearchResult> {
        self.call(keyword, |a| Box::pin(async move { a.research().await }))
            .await
    }

    /// Streaming partials; the returned receiver sees each source's result
    /// in completion order, then closes.
    pub async fn research_stream(&self, keyword: &str) -> Result<mpsc::Receiver<ResearchPartial>> {
        let (tx, rx) = mpsc::channel(8);
        self.call(keyword, move |a| {
            Box::pin(async move {
                a.research_stream(tx);
            })
        })
        .await?;
        Ok(rx)
    }
}
