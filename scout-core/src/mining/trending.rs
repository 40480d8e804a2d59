//! Weighted keyword extraction over a region's trending videos.
//!
//! Titles weigh 3, the first ten tags 2, the first 500 description
//! characters 1. Phrases are 1–3 words, each word at least three
//! characters and outside the trending stop set (the extraction set plus
//! platform boilerplate). A phrase must appear in at least two distinct
//! videos to qualify.

use super::text;
use crate::constants::TRENDING_KEYWORD_COUNT;
use crate::types::Video;
use std::collections::{HashMap, HashSet};

/// A candidate trending keyword with its weighted score and provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingCandidate {
    pub keyword: String,
    pub score: f64,
    /// Distinct trending videos the phrase appeared in.
    pub video_count: usize,
    /// Index into the source video slice of the highest-viewed video
    /// carrying the phrase.
    pub top_video_index: usize,
}

#[derive(Default)]
struct PhraseStats {
    score: f64,
    videos: HashSet<usize>,
    top_video_index: Option<usize>,
}

const TITLE_WEIGHT: f64 = 3.0;
const TAG_WEIGHT: f64 = 2.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;
const TAGS_CONSIDERED: usize = 10;
const DESCRIPTION_PREFIX: usize = 500;

/// Extract the top trending keyword candidates from a video set.
pub fn trending_keywords(videos: &[Video]) -> Vec<TrendingCandidate> {
    let stop = text::trending_stop_set();
    let mut stats: HashMap<String, PhraseStats> = HashMap::new();

    for (idx, video) in videos.iter().enumerate() {
        let mut credit = |raw: &str, weight: f64| {
            let tokens = text::tokenize(raw, stop);
            for phrase in text::ngrams(&tokens, 3) {
                let entry = stats.entry(phrase).or_default();
                entry.score += weight;
                entry.videos.insert(idx);
                let better = entry
                    .top_video_index
                    .is_none_or(|best| videos[best].view_count < video.view_count);
                if better {
                    entry.top_video_index = Some(idx);
                }
            }
        };

        credit(&video.title, TITLE_WEIGHT);
        for tag in video.tags.iter().take(TAGS_CONSIDERED) {
            credit(tag, TAG_WEIGHT);
        }
        let prefix: String = video.description.chars().take(DESCRIPTION_PREFIX).collect();
        credit(&prefix, DESCRIPTION_WEIGHT);
    }

    let mut candidates: Vec<TrendingCandidate> = stats
        .into_iter()
        .filter(|(_, s)| s.videos.len() >= 2)
        .map(|(keyword, s)| TrendingCandidate {
            keyword,
            score: s.score,
            video_count: s.videos.len(),
            top_video_index: s.top_video_index.unwrap_or(0),
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.video_count.cmp(&a.video_count))
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    candidates.truncate(TRENDING_KEYWORD_COUNT);
    candidates
}
