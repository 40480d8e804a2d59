//! # Keyword-analysis actor
//!
//! Keyed by the normalized keyword. Composes research, trends, and the
//! signal miners into an [`AnalysisResult`], annotates the top videos with
//! per-video ranking signals, and caches the outcome in a durable slot with
//! a 24-hour horizon.
//!
//! Long-tail candidates derived from trends and the keyword planner are
//! recursively analysed through this same actor kind under their own keys.
//! The batched variant persists its output; the streaming variant yields
//! each good result immediately and is ephemeral by design.

use crate::constants::{
    ANALYSIS_HORIZON_HOURS, EXTRACT_TOP_K, LONG_TAIL_BATCH_DELAY, LONG_TAIL_BATCH_SIZE,
    LONG_TAIL_HORIZON_HOURS, RESULT_TOP_KEYWORDS, SIGNAL_VIDEO_COUNT,
};
use crate::error::{Error, Result};
use crate::mining::{self, demand, gap, ranking, recommend, scoring, tfidf};
use crate::research::ResearchActor;
use crate::runtime::{Actor, DurableSlot, Runtime, StateStore};
use crate::sources::{ChannelActor, PlannerActor, TrendsActor};
use crate::types::{
    normalize_keyword, AnalysisResult, Competition, EnrichedVideo, KeywordMetrics, KeywordSlot,
    LongTailResult, LongTailUpdate, Video,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const SLOT_KIND: &str = "keyword-analysis";

/// Candidate long-tail keyword with provenance and, for planner ideas, the
/// ad-network metrics that qualified it.
#[derive(Debug, Clone)]
struct Candidate {
    keyword: String,
    source: &'static str,
    metrics: Option<KeywordMetrics>,
}

const SOURCE_TRENDS: &str = "YouTube Trends";
const SOURCE_ADS: &str = "Google Ads";

/// Dependencies of the keyword-analysis runtime. `keywords` is the cell
/// holding this actor kind's own runtime, wired right after construction so
/// long-tail candidates can route back into the fabric.
#[derive(Clone)]
pub struct AnalysisDeps {
    pub research: Arc<Runtime<ResearchActor>>,
    pub trends: Arc<Runtime<TrendsActor>>,
    pub planner: Arc<Runtime<PlannerActor>>,
    pub channels: Arc<Runtime<ChannelActor>>,
    pub store: Arc<dyn StateStore>,
    pub region: String,
    pub keywords: Arc<OnceLock<Arc<Runtime<KeywordActor>>>>,
}

impl AnalysisDeps {
    fn self_runtime(&self) -> Result<Arc<Runtime<KeywordActor>>> {
        self.keywords
            .get()
            .cloned()
            .ok_or_else(|| Error::RouteUnavailable("keyword runtime not wired".to_string()))
    }
}

pub struct KeywordActor {
    keyword: String,
    deps: AnalysisDeps,
    slot: DurableSlot<KeywordSlot>,
}

#[async_trait]
impl Actor for KeywordActor {
    type Deps = AnalysisDeps;

    fn kind() -> &'static str {
        SLOT_KIND
    }

    async fn activate(deps: &AnalysisDeps, key: &str) -> Result<Self> {
        let slot = DurableSlot::mount(deps.store.clone(), SLOT_KIND, key).await?;
        Ok(Self {
            keyword: key.to_string(),
            deps: deps.clone(),
            slot,
        })
    }
}

impl KeywordActor {
    /// Full analysis for this keyword, cached for 24 hours.
    #[instrument(skip(self, display_keyword), fields(keyword = %self.keyword))]
    pub async fn analyse(&mut self, display_keyword: &str) -> Result<AnalysisResult> {
        let now = Utc::now();
        if let (Some(result), Some(cached_at)) =
            (&self.slot.get().result, self.slot.get().cached_at)
        {
            if now - cached_at < Duration::hours(ANALYSIS_HORIZON_HOURS) {
                debug!("analysis cache hit");
                return Ok(result.clone());
            }
        }

        let research = self.deps.research.research(&self.keyword).await?;
        let trend = self
            .deps
            .trends
            .interest(&self.deps.region, &self.keyword)
            .await;
        let extracted = tfidf::extract_keywords(&research.videos, EXTRACT_TOP_K);

        let search_demand = demand::classify(display_keyword, &trend, &research.metrics);
        let content_supply = gap::score(
            &research.videos,
            &research.metrics,
            research.total_results,
            now,
        );
        let mut ranking_insights = ranking::analyse(&ranking::RankingContext {
            keyword: display_keyword,
            videos: &research.videos,
            platform_suggestions: &research.platform_suggestions,
            web_suggestions: &research.web_suggestions,
            extracted: &extracted,
        });
        let recommendation_optimization = recommend::optimise(display_keyword, &research.videos);

        let scores = scoring::calculate(&search_demand, &content_supply, &ranking_insights, now);
        let recommendations = scoring::recommendations(
            display_keyword,
            &search_demand,
            &content_supply,
            &ranking_insights,
            &scores,
        );

        let top_videos = self.annotate_top(display_keyword, &research.videos).await;
        if let Some(factor) = ranking::channel_authority_factor(&top_videos) {
            ranking::merge_authority_factor(&mut ranking_insights, factor);
        }

        let result = AnalysisResult {
            keyword: display_keyword.trim().to_string(),
            analysed_at: now,
            search_demand,
            content_supply,
            ranking_insights,
            scores,
            recommendations,
            top_keywords: extracted.into_iter().take(RESULT_TOP_KEYWORDS).collect(),
            recommendation_optimization,
            top_videos,
        };

        let slot = self.slot.get_mut();
        slot.result = Some(result.clone());
        slot.cached_at = Some(now);
        self.slot.commit().await?;
        info!(
            opportunity = result.scores.opportunity,
            difficulty = result.scores.difficulty,
            grade = %result.scores.grade,
            "analysis complete"
        );
        Ok(result)
    }

    /// Fetch each distinct top-video channel's recent uploads and annotate
    /// the top videos with their ranking-signal vectors.
    async fn annotate_top(
        &self,
        display_keyword: &str,
        videos: &[EnrichedVideo],
    ) -> Vec<EnrichedVideo> {
        let top: Vec<EnrichedVideo> = videos.iter().take(SIGNAL_VIDEO_COUNT).cloned().collect();
        if top.is_empty() {
            return top;
        }

        let mut channel_ids: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for enriched in &top {
            if seen.insert(enriched.video.channel_id.as_str()) {
                channel_ids.push(enriched.video.channel_id.clone());
            }
        }

        let fetches = channel_ids.into_iter().map(|id| {
            let channels = self.deps.channels.clone();
            async move {
                let recent = channels.recent_videos(&id).await;
                (id, recent)
            }
        });
        let recent_by_channel: HashMap<String, Vec<Video>> =
            join_all(fetches).await.into_iter().collect();

        top.into_iter()
            .map(|mut enriched| {
                let recent = recent_by_channel
                    .get(&enriched.video.channel_id)
                    .map_or(&[][..], Vec::as_slice);
                enriched.ranking_signals =
                    Some(ranking::video_signals(display_keyword, &enriched, recent));
                enriched
            })
            .collect()
    }

    /// Batched long-tail analysis: candidates in batches of three with a
    /// two-second pause between batches (skipped after the last), filtered
    /// to grades A–C, persisted for 24 hours.
    #[instrument(skip(self, display_keyword, progress), fields(keyword = %self.keyword))]
    pub async fn analyse_long_tails(
        &mut self,
        display_keyword: &str,
        max: usize,
        progress: Option<mpsc::Sender<LongTailUpdate>>,
    ) -> Result<Vec<LongTailResult>> {
        let now = Utc::now();
        if let Some(cached_at) = self.slot.get().long_tails_cached_at {
            if now - cached_at < Duration::hours(LONG_TAIL_HORIZON_HOURS) {
                debug!("long-tail cache hit");
                return Ok(self.slot.get().long_tails.clone());
            }
        }

        let candidates = self.gather_candidates(false, max).await;
        let total = candidates.len();
        debug!(candidates = total, "long-tail candidates gathered");

        let mut results: Vec<LongTailResult> = Vec::new();
        let mut analysed = 0usize;
        let batch_count = total.div_ceil(LONG_TAIL_BATCH_SIZE);
        for (batch_index, batch) in candidates.chunks(LONG_TAIL_BATCH_SIZE).enumerate() {
            let outcomes = join_all(batch.iter().map(|c| self.analyse_candidate(c))).await;
            for outcome in outcomes {
                analysed += 1;
                let Some(long_tail) = outcome else { continue };
                if !long_tail.grade.is_good() {
                    continue;
                }
                results.push(long_tail.clone());
                if let Some(tx) = &progress {
                    let _ = tx
                        .send(LongTailUpdate {
                            parent_keyword: display_keyword.to_string(),
                            result: Some(long_tail),
                            is_complete: false,
                            analysed_count: analysed,
                            total_count: total,
                            results_so_far: results.clone(),
                        })
                        .await;
                }
            }
            if batch_index + 1 < batch_count {
                tokio::time::sleep(LONG_TAIL_BATCH_DELAY).await;
            }
        }

        sort_long_tails(&mut results);
        results.truncate(max);

        let slot = self.slot.get_mut();
        slot.long_tails = results.clone();
        slot.long_tails_cached_at = Some(now);
        self.slot.commit().await?;
        info!(results = results.len(), "long-tail analysis complete");
        Ok(results)
    }

    /// Streaming long-tail analysis: relaxed candidate gathering, serial
    /// analysis, each A–C result yielded immediately. Stops at `max`
    /// results or when the receiver goes away. Never persisted.
    #[instrument(skip(self, display_keyword, tx), fields(keyword = %self.keyword))]
    pub async fn stream_long_tails(
        &mut self,
        display_keyword: &str,
        max: usize,
        tx: mpsc::Sender<LongTailUpdate>,
    ) {
        let candidates = self.gather_candidates(true, max).await;
        let total = candidates.len();
        debug!(candidates = total, "streaming long-tail candidates gathered");

        let mut results: Vec<LongTailResult> = Vec::new();
        let mut analysed = 0usize;
        for candidate in &candidates {
            if results.len() >= max {
                break;
            }
            let outcome = self.analyse_candidate(candidate).await;
            analysed += 1;
            let Some(long_tail) = outcome else { continue };
            if !long_tail.grade.is_good() {
                continue;
            }
            results.push(long_tail.clone());
            let update = LongTailUpdate {
                parent_keyword: display_keyword.to_string(),
                result: Some(long_tail),
                is_complete: false,
                analysed_count: analysed,
                total_count: total,
                results_so_far: results.clone(),
            };
            if tx.send(update).await.is_err() {
                debug!("long-tail stream cancelled by receiver");
                return;
            }
        }

        if results.len() < max {
            let _ = tx
                .send(LongTailUpdate {
                    parent_keyword: display_keyword.to_string(),
                    result: None,
                    is_complete: true,
                    analysed_count: analysed,
                    total_count: total,
                    results_so_far: results,
                })
                .await;
        }
    }

    /// Candidate gathering shared by both variants. `relaxed` enables the
    /// streaming-path concessions: a single-word seed admits all planner
    /// ideas regardless of relevance, and when the pool stays under three
    /// times the requested count, high-competition ideas are admitted too.
    async fn gather_candidates(&self, relaxed: bool, max: usize) -> Vec<Candidate> {
        let trend = self
            .deps
            .trends
            .interest(&self.deps.region, &self.keyword)
            .await;
        let ideas = self.deps.planner.ideas(&self.keyword).await;

        let seed = &self.keyword;
        let mut seen: HashSet<String> = HashSet::new();
        // The seed itself is never a candidate.
        seen.insert(seed.clone());
        let mut out: Vec<Candidate> = Vec::new();

        for query in trend.related_queries.iter().chain(trend.rising_queries.iter()) {
            if is_related(seed, query) && seen.insert(query.to_lowercase()) {
                out.push(Candidate {
                    keyword: query.clone(),
                    source: SOURCE_TRENDS,
                    metrics: None,
                });
            }
        }

        let relevance_exempt = relaxed && !seed.contains(' ');
        for idea in &ideas {
            let low_competition = idea.metrics.competition == Competition::Low
                || idea.metrics.competition_index <= 40;
            let relevant = relevance_exempt || is_related(seed, &idea.keyword);
            if low_competition && relevant && seen.insert(idea.keyword.to_lowercase()) {
                out.push(Candidate {
                    keyword: idea.keyword.clone(),
                    source: SOURCE_ADS,
                    metrics: Some(idea.metrics.clone()),
                });
            }
        }

        if relaxed && out.len() < 3 * max {
            for idea in &ideas {
                let relevant = relevance_exempt || is_related(seed, &idea.keyword);
                if relevant && seen.insert(idea.keyword.to_lowercase()) {
                    out.push(Candidate {
                        keyword: idea.keyword.clone(),
                        source: SOURCE_ADS,
                        metrics: Some(idea.metrics.clone()),
                    });
                }
            }
        }

        out
    }

    /// Recursively analyse one candidate through this actor kind. Failures
    /// are logged and skipped; long-tail orchestration never raises.
    async fn analyse_candidate(&self, candidate: &Candidate) -> Option<LongTailResult> {
        let runtime = match self.deps.self_runtime() {
            Ok(rt) => rt,
            Err(e) => {
                warn!(error = %e, "keyword runtime unavailable for sub-analysis");
                return None;
            }
        };
        match runtime.analyse(&candidate.keyword).await {
            Ok(result) => {
                let (search_volume, competition) = match &candidate.metrics {
                    Some(metrics) => (metrics.monthly_searches, metrics.competition),
                    None => (result.search_demand.volume, result.content_supply.competition),
                };
                Some(LongTailResult {
                    keyword: candidate.keyword.clone(),
                    source: candidate.source.to_string(),
                    opportunity: result.scores.opportunity,
                    difficulty: result.scores.difficulty,
                    grade: result.scores.grade,
                    search_volume,
                    competition,
                    video_count: result.content_supply.total_videos,
                    avg_competitor_views: result.content_supply.avg_views,
                    analysed_at: result.analysed_at,
                })
            }
            Err(e) => {
                warn!(candidate = %candidate.keyword, error = %e, "long-tail candidate failed");
                None
            }
        }
    }
}

/// Order: net opportunity desc, then difficulty asc, then keyword for
/// determinism.
fn sort_long_tails(results: &mut [LongTailResult]) {
    results.sort_by(|a, b| {
        let net_a = i32::from(a.opportunity) - i32::from(a.difficulty);
        let net_b = i32::from(b.opportunity) - i32::from(b.difficulty);
        net_b
            .cmp(&net_a)
            .then_with(|| a.difficulty.cmp(&b.difficulty))
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
}

/// A candidate relates to the seed when either contains the other or their
/// >2-character word sets intersect. Case-insensitive.
fn is_related(seed: &str, candidate: &str) -> bool {
    let seed = seed.to_lowercase();
    let candidate = candidate.to_lowercase();
    candidate.contains(&seed)
        || seed.contains(&candidate)
        || !mining::word_set(&candidate).is_disjoint(&mining::word_set(&seed))
}

impl Runtime<KeywordActor> {
    /// Analyse a keyword, normalizing it into the actor key while keeping
    /// the caller's casing for display.
    pub async fn analyse(&self, keyword: &str) -> Result<AnalysisResult> {
        let key = normalize_keyword(keyword);
        let display = keyword.trim().to_string();
        self.call(&key, move |a| {
            Box::pin(async move { a.analyse(&display).await })
        })
        .await?
    }

    /// Batched long-tail analysis with optional incremental progress.
    pub async fn long_tails(
        &self,
        keyword: &str,
        max: usize,
        progress: Option<mpsc::Sender<LongTailUpdate>>,
    ) -> Result<Vec<LongTailResult>> {
        let key = normalize_keyword(keyword);
        let display = keyword.trim().to_string();
        self.call(&key, move |a| {
            Box::pin(async move { a.analyse_long_tails(&display, max, progress).await })
        })
        .await?
    }

    /// Streaming long-tail analysis; updates arrive on `tx` until `max`
    /// results were yielded, the candidates ran out, or the receiver
    /// dropped.
    pub async fn stream_long_tails(
        &self,
        keyword: &str,
        max: usize,
        tx: mpsc::Sender<LongTailUpdate>,
    ) -> Result<()> {
        let key = normalize_keyword(keyword);
        let display = keyword.trim().to_string();
        self.call(&key, move |a| {
            Box::pin(async move { a.stream_long_tails(&display, max, tx).await })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevance_by_containment_and_word_overlap() {
        assert!(is_related("sourdough", "sourdough starter"));
        assert!(is_related("sourdough starter", "starter"));
        assert!(is_related("bread baking", "baking stones"));
        assert!(!is_related("sourdough", "car repair"));
        assert!(is_related("Sourdough", "SOURDOUGH BREAD"));
    }

    #[test]
    fn two_char_words_do_not_create_relations() {
        // Only the >2-character words count toward the overlap test.
        assert!(!is_related("to go", "to stay"));
        assert!(is_related("how to ski", "ski wax guide"));
    }

    #[test]
    fn long_tails_sort_by_net_then_difficulty() {
        let mut results = vec![
            LongTailResult {
                keyword: "b".into(),
                opportunity: 60,
                difficulty: 30,
                ..LongTailResult::default()
            },
            LongTailResult {
                keyword: "a".into(),
                opportunity: 80,
                difficulty: 20,
                ..LongTailResult::default()
            },
            LongTailResult {
                keyword: "c".into(),
                opportunity: 50,
                difficulty: 20,
                ..LongTailResult::default()
            },
        ];
        sort_long_tails(&mut results);
        let keywords: Vec<&str> = results.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["a", "b", "c"]);
    }
}
