//! Durable-slot contracts: no partial persists, persist-failure surfacing,
//! activation failures, and redb round-trips through the full fabric.

use scout_core::runtime::{MemoryStateStore, StateStore};
use scout_core::{Error, KeywordScout, ScoutConfig};
use scout_storage_redb::RedbStateStore;
use scout_test_utils::{
    make_metrics, make_video, scripted_adapters, FailingWriteStore, ScriptedSources,
    UnreachableStore,
};
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
    sources.with_metrics(keyword, make_metrics(2_000, scout_core::Competition::Low, 20));
}

/// A failed slot write surfaces `Persist` and leaves the persisted bytes
/// exactly as they were; the in-memory result still serves retries.
#[tokio::test]
async fn failed_persist_leaves_slot_untouched() {
    let sources = Arc::new(ScriptedSources::new());
    seed(&sources, "espresso");
    let inner = Arc::new(MemoryStateStore::new());
    let store = Arc::new(FailingWriteStore::new(inner.clone()));
    store.set_fail_writes(true);
    let scout = KeywordScout::new(
        ScoutConfig::default(),
        scripted_adapters(&sources),
        store.clone(),
    );

    let err = scout.analyse_keyword("espresso", 0).await.unwrap_err();
    assert!(matches!(err, Error::Persist(_)));
    assert!(store.writes_attempted.load(Ordering::SeqCst) >= 1);
    // Nothing was persisted.
    assert!(inner.read("keyword-analysis", "espresso").await.unwrap().is_none());

    // The actor's in-memory cache already holds the complete result, so a
    // retry succeeds without re-running the pipeline.
    let retried = scout.analyse_keyword("espresso", 0).await.unwrap();
    assert_eq!(retried.keyword, "espresso");
    assert_eq!(sources.calls.search.load(Ordering::SeqCst), 1);
}

/// An unreachable store fails activation with `RouteUnavailable`.
#[tokio::test]
async fn unreachable_store_fails_activation() {
    let sources = Arc::new(ScriptedSources::new());
    let scout = KeywordScout::new(
        ScoutConfig::default(),
        scripted_adapters(&sources),
        Arc::new(UnreachableStore),
    );

    let err = scout.analyse_keyword("espresso", 0).await.unwrap_err();
    assert!(matches!(err, Error::RouteUnavailable(_)));
    let err = scout.get_trending_keywords("US").await.unwrap_err();
    assert!(matches!(err, Error::RouteUnavailable(_)));
}

/// Per-source actors never need the store: pass-throughs keep working
/// while durable-slot actors are unroutable.
#[tokio::test]
async fn pass_throughs_survive_store_outage() {
    let sources = Arc::new(ScriptedSources::new());
    seed(&sources, "espresso");
    let scout = KeywordScout::new(
        ScoutConfig::default(),
        scripted_adapters(&sources),
        Arc::new(UnreachableStore),
    );

    assert_eq!(scout.search_videos("espresso").await.videos.len(), 3);
    assert!(scout.analyse_keyword("espresso", 0).await.is_err());
}

/// Analyses persisted through redb are served to a freshly wired fabric.
#[tokio::test]
async fn redb_slots_survive_rewiring() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn StateStore> = Arc::new(
        RedbStateStore::open(&dir.path().join("scout.redb")).await.unwrap(),
    );

    let sources = Arc::new(ScriptedSources::new());
    seed(&sources, "espresso");
    let scout = KeywordScout::new(
        ScoutConfig::default(),
        scripted_adapters(&sources),
        store.clone(),
    );
    let first = scout.analyse_keyword("espresso", 0).await.unwrap();

    // A second fabric over the same store: fresh actors, same slots. The
    // cached analysis is served without touching the sources again.
    let cold_sources = Arc::new(ScriptedSources::new());
    let rewired = KeywordScout::new(
        ScoutConfig::default(),
        scripted_adapters(&cold_sources),
        store,
    );
    let second = rewired.analyse_keyword("espresso", 0).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cold_sources.calls.search.load(Ordering::SeqCst), 0);
}
