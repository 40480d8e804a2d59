//! Benchmarks for the pure signal miners over a research-shaped corpus.

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use scout_benches::corpus;
use scout_core::mining::{gap, ranking, recommend, tfidf};
use scout_core::KeywordMetrics;
use std::hint::black_box;

fn bench_tfidf(c: &mut Criterion) {
    let mut group = c.benchmark_group("tfidf_extract");
    for size in [10usize, 50] {
        let videos = corpus(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &videos, |b, videos| {
            b.iter(|| tfidf::extract_keywords(black_box(videos), 50));
        });
    }
    group.finish();
}

fn bench_gap(c: &mut Criterion) {
    let videos = corpus(10);
    let metrics = KeywordMetrics {
        monthly_searches: 40_000,
        ..KeywordMetrics::default()
    };
    let now = Utc::now();
    c.bench_function("content_gap_score", |b| {
        b.iter(|| gap::score(black_box(&videos), &metrics, 1_200, now));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let videos = corpus(10);
    let extracted = tfidf::extract_keywords(&videos, 50);
    let suggestions = vec![
        "sourdough starter".to_string(),
        "sourdough hydration chart".to_string(),
    ];
    c.bench_function("ranking_analyse", |b| {
        b.iter(|| {
            ranking::analyse(black_box(&ranking::RankingContext {
                keyword: "sourdough",
                videos: &videos,
                platform_suggestions: &suggestions,
                web_suggestions: &suggestions,
                extracted: &extracted,
            }))
        });
    });
}

fn bench_recommend(c: &mut Criterion) {
    let videos = corpus(10);
    c.bench_function("recommendation_optimise", |b| {
        b.iter(|| recommend::optimise(black_box("sourdough"), &videos));
    });
}

criterion_group!(benches, bench_tfidf, bench_gap, bench_ranking, bench_recommend);
criterion_main!(benches);
