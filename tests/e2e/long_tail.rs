//! Long-tail analysis: batched persistence and filtering, streaming
//! yields, candidate relaxation, and update monotonicity.

use e2e_tests::scripted_scout;
use scout_core::{Competition, TrendData, TrendDirection};
use scout_test_utils::{make_channel, make_idea, make_metrics, make_video, ScriptedSources};
use std::sync::atomic::Ordering;

/// Candidates analysed with empty research grade C (net 27): good enough
/// for a long-tail list. This seeds one that grades F instead.
fn seed_failing_candidate(sources: &ScriptedSources, keyword: &str) {
    let videos: Vec<_> = (0..10)
        .map(|i| {
            let mut v = make_video(&format!("{keyword}-v{i}"), &format!("{keyword} {i}"), 2_000_000);
            v.channel_id = format!("{keyword}-ch{i}");
            v
        })
        .collect();
    for v in &videos {
        sources.with_channel(make_channel(&v.channel_id, "Mega", 3_000_000));
    }
    sources.with_search(
        keyword,
        scout_core::SearchPage {
            total_results: 200,
            videos,
        },
    );
    sources.with_metrics(keyword, make_metrics(250_000, Competition::High, 90));
}

/// Streaming on a single-word seed admits every planner idea, yields only
/// good grades in candidate order, and counts monotonically.
#[tokio::test(start_paused = true)]
async fn stream_yields_good_grades_in_candidate_order() {
    let (sources, scout) = scripted_scout();
    sources.with_ideas(
        "x",
        vec![
            make_idea("x alpha", 900, Competition::Low, 10),
            make_idea("pottery wheel", 600, Competition::Low, 15),
            make_idea("x saturated", 800, Competition::Low, 20),
            make_idea("x delta", 500, Competition::Low, 25),
        ],
    );
    seed_failing_candidate(&sources, "x saturated");

    // Drive the streaming variant through the public facade side-effect.
    let mut updates = scout.on_long_tail_analysed("x");
    let _analysis = scout.analyse_keyword("x", 3).await.unwrap();

    // Three of the four candidates grade well; max is 3, so exactly three
    // updates arrive and no complete marker follows.
    let mut yielded = Vec::new();
    let mut counts = Vec::new();
    while yielded.len() < 3 {
        let update = updates.recv().await.unwrap();
        assert!(!update.is_complete);
        let result = update.result.clone().unwrap();
        assert!(result.grade.is_good());
        counts.push((update.analysed_count, update.total_count));
        yielded.push(result.keyword);
        assert_eq!(update.results_so_far.len(), yielded.len());
    }

    // The unrelated "pottery wheel" idea is admitted (single-word seed);
    // the saturated candidate is analysed but filtered by grade.
    assert_eq!(yielded, vec!["x alpha", "pottery wheel", "x delta"]);
    // analysed_count strictly increases; total_count stays constant.
    assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(counts.windows(2).all(|w| w[0].1 == w[1].1));
}

/// The streaming variant never persists; the batched one does.
#[tokio::test(start_paused = true)]
async fn batched_long_tails_persist_and_filter() {
    let (sources, scout) = scripted_scout();
    sources.with_trends(
        "sourdough",
        TrendData {
            keyword: "sourdough".into(),
            interest: 60,
            direction: TrendDirection::Rising,
            related_queries: vec!["sourdough starter".into()],
            rising_queries: vec!["sourdough discard recipes".into()],
        },
    );
    sources.with_ideas(
        "sourdough",
        vec![
            make_idea("sourdough hydration", 700, Competition::Low, 12),
            // High competition and index: filtered out of the strict path.
            make_idea("sourdough proofing", 900, Competition::High, 80),
        ],
    );

    let results = scout.analyse_long_tails("sourdough", 10).await.unwrap();

    let keywords: Vec<&str> = results.iter().map(|r| r.keyword.as_str()).collect();
    assert!(keywords.contains(&"sourdough starter"));
    assert!(keywords.contains(&"sourdough discard recipes"));
    assert!(keywords.contains(&"sourdough hydration"));
    assert!(!keywords.contains(&"sourdough proofing"));
    assert!(results.iter().all(|r| r.grade.is_good()));

    // Sources are labelled by provenance.
    let starter = results.iter().find(|r| r.keyword == "sourdough starter").unwrap();
    assert_eq!(starter.source, "YouTube Trends");
    let hydration = results.iter().find(|r| r.keyword == "sourdough hydration").unwrap();
    assert_eq!(hydration.source, "Google Ads");
    // Planner metrics attach to ad-sourced candidates.
    assert_eq!(hydration.search_volume, 700);
    assert_eq!(hydration.competition, Competition::Low);

    // Second call is served from the durable cache.
    let ideas_calls = sources.calls.ideas.load(Ordering::SeqCst);
    let again = scout.analyse_long_tails("sourdough", 10).await.unwrap();
    assert_eq!(again, results);
    assert_eq!(sources.calls.ideas.load(Ordering::SeqCst), ideas_calls);
}

/// Candidates equal to the seed never recurse into the same actor.
#[tokio::test(start_paused = true)]
async fn seed_is_never_its_own_candidate() {
    let (sources, scout) = scripted_scout();
    sources.with_trends(
        "sourdough",
        TrendData {
            keyword: "sourdough".into(),
            interest: 10,
            direction: TrendDirection::Stable,
            related_queries: vec!["Sourdough".into(), "sourdough starter".into()],
            rising_queries: vec![],
        },
    );

    let results = scout.analyse_long_tails("sourdough", 10).await.unwrap();
    assert!(results.iter().all(|r| r.keyword.to_lowercase() != "sourdough"));
    assert_eq!(results.len(), 1);
}

/// Relevance filtering holds on multi-word seeds in the batched path.
#[tokio::test(start_paused = true)]
async fn unrelated_ideas_are_filtered_for_multi_word_seeds() {
    let (sources, scout) = scripted_scout();
    sources.with_ideas(
        "sourdough bread",
        vec![
            make_idea("sourdough scoring", 700, Competition::Low, 12),
            make_idea("pottery wheel", 600, Competition::Low, 15),
        ],
    );

    let results = scout.analyse_long_tails("sourdough bread", 10).await.unwrap();
    let keywords: Vec<&str> = results.iter().map(|r| r.keyword.as_str()).collect();
    assert!(keywords.contains(&"sourdough scoring"));
    assert!(!keywords.contains(&"pottery wheel"));
}

/// An empty candidate pool is a valid outcome, not an error.
#[tokio::test(start_paused = true)]
async fn no_candidates_yield_an_empty_list() {
    let (_sources, scout) = scripted_scout();
    let results = scout.analyse_long_tails("obscurity", 10).await.unwrap();
    assert!(results.is_empty());
}

/// start_long_tail_analysis acks with the topic and publishes updates.
#[tokio::test(start_paused = true)]
async fn background_batched_run_publishes_updates() {
    let (sources, scout) = scripted_scout();
    sources.with_ideas(
        "espresso",
        vec![make_idea("espresso tamping", 400, Competition::Low, 9)],
    );

    let mut updates = scout.on_long_tail_analysed("espresso");
    let topic = scout.start_long_tail_analysis("espresso", 5);
    assert_eq!(topic, "espresso");

    let update = updates.recv().await.unwrap();
    let result = update.result.unwrap();
    assert_eq!(result.keyword, "espresso tamping");
    assert_eq!(update.total_count, 1);
}
