//! Fabric-level behaviour: per-key serialisation, shared caches across
//! concurrent callers, and streaming research through the facade.

use e2e_tests::scripted_scout;
use scout_core::ResearchPartial;
use scout_test_utils::{make_metrics, make_video, ScriptedSources};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn seed(sources: &Arc<ScriptedSources>, keyword: &str) {
    sources.with_search(
        keyword,
        scout_core::SearchPage {
            total_results: 3,
            videos: (0..3)
                .map(|i| make_video(&format!("{keyword}-{i}"), &format!("{keyword} {i}"), 100))
                .collect(),
        },
    );
    sources.with_platform_suggestions(keyword, vec![format!("{keyword} tips")]);
    sources.with_web_suggestions(keyword, vec![format!("{keyword} guide")]);
    sources.with_metrics(keyword, make_metrics(2_000, scout_core::Competition::Low, 20));
}

/// Concurrent callers to one keyword serialise on its actor: one upstream
/// fetch, identical results for everyone.
#[tokio::test]
async fn concurrent_analyses_share_one_pipeline_run() {
    let (sources, scout) = scripted_scout();
    seed(&sources, "espresso");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let scout = scout.clone();
            tokio::spawn(async move { scout.analyse_keyword("espresso", 0).await.unwrap() })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(sources.calls.search.load(Ordering::SeqCst), 1);
    assert_eq!(sources.calls.metrics.load(Ordering::SeqCst), 1);
}

/// The streaming research variant emits one partial per source and closes.
#[tokio::test]
async fn research_stream_emits_three_partials() {
    let (sources, scout) = scripted_scout();
    seed(&sources, "espresso");

    let mut rx = scout.research_keyword_stream("espresso").await.unwrap();
    let mut partials = Vec::new();
    while let Some(partial) = rx.recv().await {
        partials.push(partial);
    }

    assert_eq!(partials.len(), 3);
    assert!(partials
        .iter()
        .any(|p| matches!(p, ResearchPartial::Search(page) if page.videos.len() == 3)));
    assert!(partials
        .iter()
        .any(|p| matches!(p, ResearchPartial::PlatformSuggestions(s) if s == &vec!["espresso tips".to_string()])));
    assert!(partials
        .iter()
        .any(|p| matches!(p, ResearchPartial::WebSuggestions(s) if s == &vec!["espresso guide".to_string()])));
}

/// Research and analysis share the per-source actors: analysing after
/// researching reuses every cached fetch.
#[tokio::test]
async fn analysis_reuses_research_caches() {
    let (sources, scout) = scripted_scout();
    seed(&sources, "espresso");

    scout.research_keyword("espresso").await.unwrap();
    let searches_after_research = sources.calls.search.load(Ordering::SeqCst);
    scout.analyse_keyword("espresso", 0).await.unwrap();

    assert_eq!(
        sources.calls.search.load(Ordering::SeqCst),
        searches_after_research
    );
}

/// Pass-through surfaces answer directly from the per-source actors.
#[tokio::test]
async fn pass_throughs_serve_neutral_values_when_unconfigured() {
    let (_sources, scout) = scripted_scout();

    assert!(scout.search_videos("anything").await.videos.is_empty());
    assert!(scout.get_channel("missing").await.is_none());
    assert!(scout.get_transcript("missing").await.is_none());
    assert!(scout.get_comments("missing", 50).await.is_empty());
    assert!(scout.search_forum("anything").await.is_empty());
    assert!(scout.search_video_web("anything").await.is_empty());
    assert_eq!(scout.get_keyword_metrics("anything").await.monthly_searches, 0);
    assert!(scout.get_trends("anything", "US").await.is_empty());
}
