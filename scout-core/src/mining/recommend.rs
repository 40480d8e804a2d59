//! Recommendation optimiser: tags to reuse, topic clusters to cover, and
//! videos to appear alongside, mined from the researched corpus.

use super::text;
use crate::constants::CLUSTER_PHRASE_BLACKLIST;
use crate::types::{
    EnrichedVideo, RecommendationOptimization, TagOverlap, TargetVideo, TopicCluster,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Tags appearing in at least two videos, strongest first.
fn tag_overlaps(videos: &[EnrichedVideo]) -> Vec<TagOverlap> {
    let mut by_tag: HashMap<String, (usize, u64)> = HashMap::new();
    for enriched in videos {
        let distinct: HashSet<String> = enriched
            .video
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        for tag in distinct {
            let entry = by_tag.entry(tag).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += enriched.video.view_count;
        }
    }
    let mut overlaps: Vec<TagOverlap> = by_tag
        .into_iter()
        .filter(|(_, (count, _))| *count >= 2)
        .map(|(tag, (video_count, total_views))| TagOverlap {
            tag,
            video_count,
            total_views,
        })
        .collect();
    overlaps.sort_by(|a, b| {
        b.video_count
            .cmp(&a.video_count)
            .then_with(|| b.total_views.cmp(&a.total_views))
            .then_with(|| a.tag.cmp(&b.tag))
    });
    overlaps.truncate(20);
    overlaps
}

/// Tags carried by at least half of the top ten videos (minimum two).
fn must_use_tags(videos: &[EnrichedVideo]) -> Vec<String> {
    let top: Vec<_> = videos.iter().take(10).collect();
    if top.is_empty() {
        return Vec::new();
    }
    let threshold = (top.len().div_ceil(2)).max(2);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for enriched in &top {
        let distinct: HashSet<String> = enriched
            .video
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        for tag in distinct {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    let mut tags: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags.truncate(15);
    tags.into_iter().map(|(tag, _)| tag).collect()
}

/// Recurring transcript bigrams with the distinct terms they co-occur with.
fn topic_clusters(videos: &[EnrichedVideo]) -> Vec<TopicCluster> {
    let stop = text::extraction_stop_set();
    let blacklist: HashSet<&str> = CLUSTER_PHRASE_BLACKLIST.iter().copied().collect();

    // phrase -> (transcripts containing it, neighbouring terms)
    let mut phrases: HashMap<String, (usize, BTreeSet<String>)> = HashMap::new();
    for enriched in videos {
        let Some(transcript) = &enriched.transcript else {
            continue;
        };
        let tokens = text::tokenize(&transcript.text, stop);
        let mut seen_here: HashSet<String> = HashSet::new();
        for (i, window) in tokens.windows(2).enumerate() {
            let phrase = window.join(" ");
            if blacklist.contains(phrase.as_str()) {
                continue;
            }
            let entry = phrases.entry(phrase.clone()).or_default();
            if seen_here.insert(phrase) {
                entry.0 += 1;
            }
            if i > 0 {
                entry.1.insert(tokens[i - 1].clone());
            }
            if let Some(next) = tokens.get(i + 2) {
                entry.1.insert(next.clone());
            }
        }
    }

    let mut clusters: Vec<TopicCluster> = phrases
        .into_iter()
        .filter(|(_, (transcripts, _))| *transcripts >= 2)
        .map(|(phrase, (_, related))| TopicCluster {
            phrase,
            related_terms: related.into_iter().collect(),
        })
        .collect();
    clusters.sort_by(|a, b| {
        b.related_terms
            .len()
            .cmp(&a.related_terms.len())
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    clusters.truncate(10);
    clusters
}

/// The five highest-view videos sharing tags with the corpus consensus.
fn target_videos(videos: &[EnrichedVideo], must_use: &[String]) -> Vec<TargetVideo> {
    let overlap_tags: HashSet<&str> = must_use.iter().map(String::as_str).collect();
    let mut targets: Vec<TargetVideo> = videos
        .iter()
        .filter_map(|enriched| {
            let video_tags: HashSet<String> = enriched
                .video
                .tags
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect();
            let shared = video_tags
                .iter()
                .filter(|t| overlap_tags.contains(t.as_str()))
                .count();
            if shared == 0 {
                return None;
            }
            let similarity = if overlap_tags.is_empty() {
                0.0
            } else {
                shared as f64 / overlap_tags.len() as f64
            };
            Some(TargetVideo {
                video_id: enriched.video.id.clone(),
                title: enriched.video.title.clone(),
                view_count: enriched.video.view_count,
                similarity: (similarity * 100.0).round() / 100.0,
            })
        })
        .collect();
    targets.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    targets.truncate(5);
    targets
}

/// Terms worth saying out loud: present in a third of the transcripts.
fn transcript_keywords(videos: &[EnrichedVideo]) -> Vec<String> {
    let stop = text::extraction_stop_set();
    let transcripted: Vec<&EnrichedVideo> =
        videos.iter().filter(|v| v.transcript.is_some()).collect();
    if transcripted.is_empty() {
        return Vec::new();
    }
    let threshold = (transcripted.len() / 3).max(2);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for enriched in &transcripted {
        let Some(transcript) = &enriched.transcript else {
            continue;
        };
        let tokens = text::tokenize(&transcript.text, stop);
        let mut terms: HashSet<String> = tokens.iter().filter(|t| t.len() >= 4).cloned().collect();
        for window in tokens.windows(2) {
            if window.iter().all(|w| w.len() >= 4) {
                terms.insert(window.join(" "));
            }
        }
        for term in terms {
            *counts.entry(term).or_insert(0) += 1;
        }
    }

    let mut terms: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.truncate(15);
    terms.into_iter().map(|(term, _)| term).collect()
}

/// Share (0–100) of transcripted videos whose transcript says the keyword.
fn topic_match_score(keyword: &str, videos: &[EnrichedVideo]) -> u8 {
    let kw = keyword.to_lowercase();
    let transcripted: Vec<&EnrichedVideo> =
        videos.iter().filter(|v| v.transcript.is_some()).collect();
    if transcripted.is_empty() {
        return 0;
    }
    let matching = transcripted
        .iter()
        .filter(|v| {
            v.transcript
                .as_ref()
                .is_some_and(|t| t.text.to_lowercase().contains(&kw))
        })
        .count();
    ((matching * 100) / transcripted.len()) as u8
}

/// Mine the corpus into optimisation guidance.
pub fn optimise(keyword: &str, videos: &[EnrichedVideo]) -> RecommendationOptimization {
    let tag_overlaps = tag_overlaps(videos);
    let must_use_tags = must_use_tags(videos);
    let target_videos = target_videos(videos, &must_use_tags);
    RecommendationOptimization {
        tag_overlaps,
        must_use_tags: must_use_tags.clone(),
        topic_clusters: topic_clusters(videos),
        target_videos,
        topic_match_score: topic_match_score(keyword, videos),
        transcript_keywords: transcript_keywords(videos),
    }
}
