//! End-to-end analysis scenarios over scripted sources.

use e2e_tests::scripted_scout;
use scout_core::{Competition, Grade, TrendType};
use scout_test_utils::{make_channel, make_metrics, make_video, ScriptedSources};
use std::sync::atomic::Ordering;

/// Everything empty: the pipeline still completes with the neutral scores.
#[tokio::test]
async fn empty_research_grades_c() {
    let (_sources, scout) = scripted_scout();

    let analysis = scout.analyse_keyword("__zzznoresults", 0).await.unwrap();

    assert_eq!(analysis.search_demand.volume, 0);
    assert_eq!(analysis.content_supply.total_videos, 0);
    assert_eq!(analysis.content_supply.gap_score, 0.0);
    assert_eq!(analysis.content_supply.competition, Competition::Low);
    assert_eq!(analysis.scores.opportunity, 43);
    assert_eq!(analysis.scores.difficulty, 16);
    assert_eq!(analysis.scores.grade, Grade::C);
    assert!(analysis.top_videos.is_empty());
    assert!(analysis.top_keywords.is_empty());
}

/// Seasonal keywords classify with their peak month regardless of date.
#[tokio::test]
async fn seasonal_keyword_classifies_with_peak_month() {
    let (sources, scout) = scripted_scout();
    seed_market(&sources, "christmas gift ideas", 15, 40_000, 80_000, 120_000);

    let analysis = scout.analyse_keyword("christmas gift ideas", 0).await.unwrap();

    assert_eq!(analysis.search_demand.trend_type, TrendType::Seasonal);
    assert_eq!(analysis.search_demand.seasonal_peak_month, Some(12));
    assert_eq!(analysis.search_demand.volume, 120_000);
    // Channels under the established threshold keep the niche rankable.
    assert!(!analysis.ranking_insights.channel_authority.needs_established_channel);
}

/// A saturated niche with entrenched mega-channels fails outright.
#[tokio::test]
async fn saturated_niche_grades_f() {
    let (sources, scout) = scripted_scout();
    // Ten mega-channel uploads; the platform reports 200 competing videos.
    let videos: Vec<_> = (0..10)
        .map(|i| {
            let mut v = make_video(&format!("sat-v{i}"), &format!("smartphone review {i}"), 2_000_000);
            v.channel_id = format!("sat-ch{i}");
            v
        })
        .collect();
    for v in &videos {
        sources.with_channel(make_channel(&v.channel_id, "Mega Tech", 3_000_000));
    }
    sources.with_search(
        "smartphone review",
        scout_core::SearchPage {
            total_results: 200,
            videos,
        },
    );
    sources.with_metrics("smartphone review", make_metrics(250_000, Competition::High, 90));

    let analysis = scout.analyse_keyword("smartphone review", 0).await.unwrap();

    assert_eq!(analysis.scores.difficulty, 100);
    assert_eq!(analysis.scores.grade, Grade::F);
    assert!(analysis.ranking_insights.channel_authority.needs_established_channel);
}

/// Ad-network quota exhaustion degrades to zero metrics, not failure.
#[tokio::test]
async fn quota_exhausted_planner_still_completes() {
    let (sources, scout) = scripted_scout();
    seed_market(&sources, "sourdough", 8, 50_000, 40_000, 0);
    sources.fail("metrics");
    sources.fail("ideas");

    let analysis = scout.analyse_keyword("sourdough", 0).await.unwrap();

    assert_eq!(analysis.search_demand.volume, 0);
    assert!(analysis.scores.opportunity > 0);
}

/// A fresh cached value is returned verbatim within the horizon.
#[tokio::test]
async fn analysis_caches_for_subsequent_calls() {
    let (sources, scout) = scripted_scout();
    seed_market(&sources, "sourdough", 8, 50_000, 40_000, 9_000);

    let first = scout.analyse_keyword("sourdough", 0).await.unwrap();
    let second = scout.analyse_keyword("sourdough", 0).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(sources.calls.search.load(Ordering::SeqCst), 1);
}

/// Keyword identity is case-insensitive; display casing is preserved.
#[tokio::test]
async fn keyword_identity_normalises() {
    let (sources, scout) = scripted_scout();
    seed_market(&sources, "sourdough", 8, 50_000, 40_000, 9_000);

    let first = scout.analyse_keyword("sourdough", 0).await.unwrap();
    let second = scout.analyse_keyword("  SOURDOUGH ", 0).await.unwrap();
    // Same actor, same cached result (including the first call's casing).
    assert_eq!(first.keyword, "sourdough");
    assert_eq!(first, second);
    assert_eq!(sources.calls.search.load(Ordering::SeqCst), 1);
}

/// Top videos come back annotated with per-video ranking signals.
#[tokio::test]
async fn top_videos_carry_ranking_signals() {
    let (sources, scout) = scripted_scout();
    seed_market(&sources, "sourdough", 8, 50_000, 40_000, 9_000);
    // One channel publishes sourdough constantly.
    sources.with_recent_videos(
        "sourdough-ch0",
        (0..10).map(|i| make_video(&format!("r{i}"), "sourdough daily", 5)).collect(),
    );

    let analysis = scout.analyse_keyword("sourdough", 0).await.unwrap();

    assert_eq!(analysis.top_videos.len(), 5);
    let signals = analysis.top_videos[0].ranking_signals.as_ref().unwrap();
    assert!(signals.keyword_in_title);
    assert!(signals.is_keyword_authority);
    assert!(analysis
        .ranking_insights
        .top_factors
        .iter()
        .any(|f| f.factor == "channel keyword authority"));
}

// ============================================================================
// Helpers
// ============================================================================

fn seed_market(
    sources: &ScriptedSources,
    keyword: &str,
    count: usize,
    views: u64,
    subs: u64,
    volume: u64,
) {
    let videos: Vec<_> = (0..count)
        .map(|i| {
            let mut v = make_video(
                &format!("{}-v{i}", keyword.replace(' ', "-")),
                &format!("{keyword} video {i}"),
                views,
            );
            v.channel_id = format!("{}-ch{i}", keyword.split_whitespace().next().unwrap_or("kw"));
            v
        })
        .collect();
    for v in &videos {
        sources.with_channel(make_channel(&v.channel_id, &format!("{} studio", v.channel_id), subs));
    }
    sources.with_search(
        keyword,
        scout_core::SearchPage {
            total_results: count as u64,
            videos,
        },
    );
    sources.with_metrics(keyword, make_metrics(volume, Competition::Unknown, 50));
}
