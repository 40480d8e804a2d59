//! Synthetic corpora for the mining benchmarks.

use chrono::{TimeZone, Utc};
use scout_core::{Channel, Comment, EnrichedVideo, Transcript, Video};

const WORDS: &[&str] = &[
    "sourdough", "starter", "hydration", "fermentation", "baking", "crumb", "scoring", "proofing",
    "levain", "flour", "shaping", "oven", "steam", "crust", "schedule", "overnight", "discard",
    "whole", "grain", "rye",
];

fn sentence(seed: usize, words: usize) -> String {
    (0..words)
        .map(|i| WORDS[(seed * 7 + i * 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// A research-shaped corpus of `count` enriched videos with transcripts,
/// tags, comments, and channels.
pub fn corpus(count: usize) -> Vec<EnrichedVideo> {
    (0..count)
        .map(|i| {
            let video = Video {
                id: format!("v{i}"),
                title: sentence(i, 6),
                description: sentence(i + 1, 40),
                published_at: Utc.with_ymd_and_hms(2026, 4, 1 + (i % 28) as u32, 8, 0, 0).unwrap(),
                channel_id: format!("ch{}", i % 7),
                channel_title: format!("Channel {}", i % 7),
                tags: (0..8).map(|t| WORDS[(i + t) % WORDS.len()].to_string()).collect(),
                category_id: None,
                view_count: 1_000 + (i as u64) * 917 % 100_000,
                like_count: 50 + (i as u64) * 31 % 5_000,
                comment_count: 10 + (i as u64) % 400,
                duration: "PT12M30S".to_string(),
                definition: "hd".to_string(),
                thumbnails: vec![format!("https://img.example/{i}.jpg")],
            };
            EnrichedVideo {
                transcript: Some(Transcript {
                    video_id: video.id.clone(),
                    text: sentence(i + 2, 600),
                    language: "en".into(),
                }),
                comments: (0..50)
                    .map(|c| {
                        Comment::new(
                            format!("c{i}-{c}"),
                            video.id.clone(),
                            "commenter".into(),
                            sentence(i + c, 12),
                            c as u64,
                            video.published_at,
                            0,
                        )
                    })
                    .collect(),
                channel: Some(Channel {
                    id: video.channel_id.clone(),
                    title: video.channel_title.clone(),
                    description: sentence(i + 3, 20),
                    custom_url: None,
                    subscriber_count: 10_000 + (i as u64) * 7_919 % 900_000,
                    video_count: 250,
                    view_count: 4_000_000,
                    keywords: vec!["sourdough".into(), "baking".into()],
                    thumbnails: Vec::new(),
                }),
                ranking_signals: None,
                video,
            }
        })
        .collect()
}
