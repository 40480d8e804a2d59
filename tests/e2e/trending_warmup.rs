//! Trending warm-up: digest construction, candidate failure tolerance,
//! idempotence, and the cached read paths.

use scout_core::runtime::MemoryStateStore;
use scout_core::{KeywordScout, ScoutConfig, Video};
use scout_test_utils::{
    make_video, scripted_adapters, FailingWriteStore, ScriptedSources,
};
use std::sync::Arc;

/// 20 pairs of trending videos, each pair sharing the phrase `guideN`.
fn seed_trending(sources: &ScriptedSources) {
    let mut videos: Vec<Video> = Vec::new();
    for i in 0..20 {
        for j in 0..2 {
            let mut v = make_video(
                &format!("t{i}-{j}"),
                &format!("topic{i} guide{i}"),
                1000 + i * 10 + j,
            );
            v.description = String::new();
            videos.push(v);
        }
    }
    sources.with_trending("US", videos);
}

fn scout_with_store(
    sources: &Arc<ScriptedSources>,
    store: Arc<dyn scout_core::runtime::StateStore>,
) -> KeywordScout {
    KeywordScout::new(ScoutConfig::default(), scripted_adapters(sources), store)
}

#[tokio::test]
async fn warm_up_builds_a_full_digest() {
    let sources = Arc::new(ScriptedSources::new());
    seed_trending(&sources);
    let scout = scout_with_store(&sources, Arc::new(MemoryStateStore::new()));

    scout.warm_up_region("US").await.unwrap();

    let keywords = scout.get_trending_keywords("US").await.unwrap();
    let videos = scout.get_trending_videos("US").await.unwrap();
    assert_eq!(keywords.len(), 20);
    assert_eq!(videos.len(), 40);
    assert!(keywords.iter().all(|k| k.trending_video_count >= 2));
    // Every candidate analysed over empty research: identical nets, so the
    // tie-breaks leave the list ordered by keyword.
    let sorted: Vec<String> = {
        let mut v: Vec<String> = keywords.iter().map(|k| k.keyword.clone()).collect();
        v.sort();
        v
    };
    let actual: Vec<String> = keywords.iter().map(|k| k.keyword.clone()).collect();
    assert_eq!(actual, sorted);
}

/// Three failing candidates shrink the digest to seventeen; ordering stays
/// stable under the tie-breaking rules.
#[tokio::test]
async fn failing_candidates_are_skipped() {
    let sources = Arc::new(ScriptedSources::new());
    seed_trending(&sources);
    let store = Arc::new(FailingWriteStore::new(Arc::new(MemoryStateStore::new())));
    for key in ["guide0", "guide1", "guide2"] {
        store.fail_slot("keyword-analysis", key);
    }
    let scout = scout_with_store(&sources, store);

    scout.warm_up_region("US").await.unwrap();

    let keywords = scout.get_trending_keywords("US").await.unwrap();
    assert_eq!(keywords.len(), 17);
    assert!(keywords.iter().all(|k| !matches!(
        k.keyword.as_str(),
        "guide0" | "guide1" | "guide2"
    )));
    let actual: Vec<String> = keywords.iter().map(|k| k.keyword.clone()).collect();
    let mut sorted = actual.clone();
    sorted.sort();
    assert_eq!(actual, sorted);
}

/// Warm-up twice: identical video ids, strictly advancing warm-up stamp.
#[tokio::test]
async fn warm_up_is_idempotent_with_advancing_stamp() {
    let sources = Arc::new(ScriptedSources::new());
    seed_trending(&sources);
    let store = Arc::new(MemoryStateStore::new());
    let scout = scout_with_store(&sources, store.clone());

    scout.warm_up_region("US").await.unwrap();
    let first_videos = scout.get_trending_videos("US").await.unwrap();
    let first_stamp = slot_stamp(&store).await;

    scout.warm_up_region("US").await.unwrap();
    let second_videos = scout.get_trending_videos("US").await.unwrap();
    let second_stamp = slot_stamp(&store).await;

    let first_ids: Vec<&str> = first_videos.iter().map(|v| v.id.as_str()).collect();
    let second_ids: Vec<&str> = second_videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert!(second_stamp > first_stamp);
}

/// An empty trending fetch aborts and keeps the previous digest.
#[tokio::test]
async fn empty_trending_fetch_keeps_previous_digest() {
    let sources = Arc::new(ScriptedSources::new());
    seed_trending(&sources);
    let scout = scout_with_store(&sources, Arc::new(MemoryStateStore::new()));

    scout.warm_up_region("US").await.unwrap();
    assert_eq!(scout.get_trending_videos("US").await.unwrap().len(), 40);

    // The source goes dark; the digest survives.
    sources.with_trending("US", Vec::new());
    scout.warm_up_region("US").await.unwrap();
    assert_eq!(scout.get_trending_videos("US").await.unwrap().len(), 40);
}

/// Region codes normalise into one actor identity.
#[tokio::test]
async fn region_codes_normalise() {
    let sources = Arc::new(ScriptedSources::new());
    seed_trending(&sources);
    let scout = scout_with_store(&sources, Arc::new(MemoryStateStore::new()));

    scout.warm_up_region("us").await.unwrap();
    assert_eq!(scout.get_trending_videos("US").await.unwrap().len(), 40);
}

/// The scheduled worker warms every configured region at start and stops
/// cleanly on shutdown.
#[tokio::test(start_paused = true)]
async fn warmup_worker_runs_at_start_and_shuts_down() {
    let sources = Arc::new(ScriptedSources::new());
    seed_trending(&sources);
    let scout = scout_with_store(&sources, Arc::new(MemoryStateStore::new()));

    let (shutdown, worker) = scout.spawn_warmup_worker();

    let mut warmed = false;
    for _ in 0..200 {
        if !scout.get_trending_keywords("US").await.unwrap().is_empty() {
            warmed = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(warmed, "worker never produced a digest");

    shutdown.send(true).unwrap();
    worker.await.unwrap();
}

async fn slot_stamp(store: &Arc<MemoryStateStore>) -> chrono::DateTime<chrono::Utc> {
    use scout_core::runtime::StateStore;
    let raw = store
        .read("trending-analysis", "US")
        .await
        .unwrap()
        .expect("trending slot persisted");
    let slot: scout_core::TrendingSlot = serde_json::from_value(raw).unwrap();
    slot.last_warmup_at.expect("warm-up stamp set")
}
