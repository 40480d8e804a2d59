//! Ranking-factor analysis: which properties of the top search results
//! correlate with ranking higher, per-video ranking-signal extraction, and
//! the channel-keyword-authority post-pass.
//!
//! Correlations are position biases: the normalised deviation of the mean
//! rank of the factor-positive subset from the expected mean rank, in
//! [−1, +1]. The engagement and authority comparisons use hand-calibrated
//! top-half/bottom-half magnitudes rather than a true statistic.

use super::text;
use crate::constants::{
    ESTABLISHED_CHANNEL_SUBS, EXTRACTED_VARIATION_MIN_DIFFICULTY, KEYWORD_AUTHORITY_RATIO,
    MAX_VARIATIONS, VARIATION_LENGTH_BONUS_CAP, VARIATION_MIN_DIFFICULTY,
};
use crate::types::{
    ChannelAuthoritySummary, EnrichedVideo, ExtractedKeyword, LongTailVariation, OptimalPlacement,
    RankingFactor, RankingInsights, Video, VideoRankingSignals,
};
use std::collections::HashSet;

/// Inputs to the corpus-level analysis. Videos must be in search-rank
/// order (assumed ranks 1..N).
pub struct RankingContext<'a> {
    pub keyword: &'a str,
    pub videos: &'a [EnrichedVideo],
    pub platform_suggestions: &'a [String],
    pub web_suggestions: &'a [String],
    pub extracted: &'a [ExtractedKeyword],
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Position bias of a rank subset: positive when the subset ranks above the
/// expected mean position.
fn position_bias(ranks: &[usize], n: usize) -> Option<f64> {
    if ranks.is_empty() || n == 0 {
        return None;
    }
    let expected = (n as f64 + 1.0) / 2.0;
    let mean = ranks.iter().sum::<usize>() as f64 / ranks.len() as f64;
    Some(round2(((expected - mean) / expected).clamp(-1.0, 1.0)))
}

/// Top-half vs bottom-half comparison with fixed magnitudes.
fn half_split(values_by_rank: &[f64], positive: f64, negative: f64) -> Option<f64> {
    if values_by_rank.len() < 2 {
        return None;
    }
    let mid = values_by_rank.len() / 2;
    let top = &values_by_rank[..mid];
    let bottom = &values_by_rank[mid..];
    let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
    Some(if mean(top) > mean(bottom) { positive } else { negative })
}

fn channel_is_niche(keyword: &str, video: &EnrichedVideo) -> bool {
    video.channel.as_ref().is_some_and(|c| {
        c.keywords.iter().any(|k| k.to_lowercase().contains(keyword))
            || c.description.to_lowercase().contains(keyword)
    })
}

/// Analyse the ranked corpus into insights.
pub fn analyse(ctx: &RankingContext<'_>) -> RankingInsights {
    let keyword = ctx.keyword.trim().to_lowercase();
    let n = ctx.videos.len();

    let mut factors = Vec::new();
    let mut push_bias = |name: &str, predicate: &dyn Fn(&EnrichedVideo) -> bool| {
        let ranks: Vec<usize> = ctx
            .videos
            .iter()
            .enumerate()
            .filter(|(_, v)| predicate(v))
            .map(|(i, _)| i + 1)
            .collect();
        if let Some(correlation) = position_bias(&ranks, n) {
            factors.push(RankingFactor {
                factor: name.to_string(),
                correlation,
            });
        }
    };

    push_bias("keyword in title", &|v| {
        v.video.title.to_lowercase().contains(&keyword)
    });
    push_bias("keyword in description", &|v| {
        v.video.description.to_lowercase().contains(&keyword)
    });
    push_bias("keyword early in description", &|v| {
        let description = v.video.description.to_lowercase();
        description.chars().take(100).collect::<String>().contains(&keyword)
    });
    push_bias("keyword in tags", &|v| {
        v.video.tags.iter().any(|t| t.to_lowercase().contains(&keyword))
    });
    push_bias("keyword in transcript", &|v| {
        v.transcript
            .as_ref()
            .is_some_and(|t| t.text.to_lowercase().contains(&keyword))
    });
    push_bias("channel niche focus", &|v| channel_is_niche(&keyword, v));

    let like_ratios: Vec<f64> = ctx
        .videos
        .iter()
        .map(|v| {
            if v.video.view_count == 0 {
                0.0
            } else {
                v.video.like_count as f64 / v.video.view_count as f64
            }
        })
        .collect();
    if let Some(correlation) = half_split(&like_ratios, 0.5, -0.1) {
        factors.push(RankingFactor {
            factor: "engagement rate".to_string(),
            correlation,
        });
    }

    let subs_by_rank: Vec<f64> = ctx
        .videos
        .iter()
        .map(|v| v.channel.as_ref().map_or(0.0, |c| c.subscriber_count as f64))
        .collect();
    if let Some(correlation) = half_split(&subs_by_rank, 0.4, -0.1) {
        factors.push(RankingFactor {
            factor: "channel authority".to_string(),
            correlation,
        });
    }

    factors.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.factor.cmp(&b.factor))
    });
    factors.truncate(5);

    let channel_authority = authority_summary(ctx.videos);
    let optimal_placement = placement(&keyword, ctx.videos);
    let long_tail_variations = variations(
        &keyword,
        ctx.platform_suggestions,
        ctx.web_suggestions,
        ctx.extracted,
        channel_authority.needs_established_channel,
    );

    RankingInsights {
        top_factors: factors,
        channel_authority,
        optimal_placement,
        long_tail_variations,
    }
}

fn authority_summary(videos: &[EnrichedVideo]) -> ChannelAuthoritySummary {
    let n = videos.len();
    let avg_subscribers = if n == 0 {
        0.0
    } else {
        videos
            .iter()
            .map(|v| v.channel.as_ref().map_or(0.0, |c| c.subscriber_count as f64))
            .sum::<f64>()
            / n as f64
    };
    let top = videos.iter().take(10).collect::<Vec<_>>();
    let top_mean = if top.is_empty() {
        0.0
    } else {
        top.iter()
            .map(|v| v.channel.as_ref().map_or(0.0, |c| c.subscriber_count as f64))
            .sum::<f64>()
            / top.len() as f64
    };
    ChannelAuthoritySummary {
        avg_subscribers,
        needs_established_channel: avg_subscribers > ESTABLISHED_CHANNEL_SUBS,
        estimated_min_subs_to_rank: (top_mean * 0.10) as u64,
    }
}

fn placement(keyword: &str, videos: &[EnrichedVideo]) -> OptimalPlacement {
    let n = videos.len();
    if n == 0 {
        return OptimalPlacement::default();
    }

    let first3_hits = videos
        .iter()
        .filter(|v| {
            let title = v.video.title.to_lowercase();
            title
                .split_whitespace()
                .take(3)
                .collect::<Vec<_>>()
                .join(" ")
                .contains(keyword)
        })
        .count();
    let early_desc_hits = videos
        .iter()
        .filter(|v| {
            v.video
                .description
                .to_lowercase()
                .chars()
                .take(100)
                .collect::<String>()
                .contains(keyword)
        })
        .count();
    let avg_tag_count =
        videos.iter().map(|v| v.video.tags.len() as f64).sum::<f64>() / n as f64;

    let mut mention_rates = Vec::new();
    for v in videos {
        if let Some(transcript) = &v.transcript {
            let minutes = v.video.duration_minutes();
            if minutes > 0.0 {
                let mentions = text::count_occurrences(&transcript.text, keyword);
                mention_rates.push(mentions as f64 / minutes);
            }
        }
    }
    let transcript_mentions_per_minute = if mention_rates.is_empty() {
        0.0
    } else {
        round2(mention_rates.iter().sum::<f64>() / mention_rates.len() as f64)
    };

    OptimalPlacement {
        in_first_3_title_words: first3_hits * 2 >= n,
        in_first_100_description_chars: early_desc_hits * 2 >= n,
        avg_tag_count: round2(avg_tag_count),
        transcript_mentions_per_minute,
    }
}

fn variations(
    seed: &str,
    platform_suggestions: &[String],
    web_suggestions: &[String],
    extracted: &[ExtractedKeyword],
    needs_established: bool,
) -> Vec<LongTailVariation> {
    fn push_variation(
        seen: &mut HashSet<String>,
        out: &mut Vec<LongTailVariation>,
        keyword: String,
        difficulty: i32,
        floor: u8,
    ) {
        if seen.insert(keyword.to_lowercase()) {
            out.push(LongTailVariation {
                keyword,
                estimated_difficulty: difficulty.max(i32::from(floor)) as u8,
            });
        }
    }

    let base: i32 = if needs_established { 70 } else { 40 };
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<LongTailVariation> = Vec::new();

    for suggestion in platform_suggestions.iter().chain(web_suggestions) {
        let lowered = suggestion.to_lowercase();
        if lowered.len() > seed.len() && lowered.contains(seed) {
            let bonus =
                ((lowered.len() - seed.len()) as i32 * 2).min(i32::from(VARIATION_LENGTH_BONUS_CAP));
            push_variation(
                &mut seen,
                &mut out,
                suggestion.clone(),
                base - bonus,
                VARIATION_MIN_DIFFICULTY,
            );
        }
    }

    for keyword in extracted {
        let term = keyword.term.as_str();
        if term.contains(' ') && term.contains(seed) && term != seed {
            push_variation(
                &mut seen,
                &mut out,
                term.to_string(),
                base - 15,
                EXTRACTED_VARIATION_MIN_DIFFICULTY,
            );
        }
    }

    if out.len() < 3 {
        let singles: Vec<&ExtractedKeyword> = extracted
            .iter()
            .filter(|k| !k.term.contains(' ') && k.term != seed && !seed.contains(&k.term))
            .take(5)
            .collect();
        for keyword in singles {
            push_variation(
                &mut seen,
                &mut out,
                format!("{seed} {}", keyword.term),
                base - 15,
                EXTRACTED_VARIATION_MIN_DIFFICULTY,
            );
        }
    }

    out.sort_by(|a, b| {
        a.estimated_difficulty
            .cmp(&b.estimated_difficulty)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    out.truncate(MAX_VARIATIONS);
    out
}

// ============================================================================
// Per-video signal extraction
// ============================================================================

/// Channel-authority tier by subscriber bucket (1–5).
fn authority_tier(subscribers: u64) -> u8 {
    if subscribers >= 10_000_000 {
        5
    } else if subscribers >= 1_000_000 {
        4
    } else if subscribers >= 100_000 {
        3
    } else if subscribers >= 10_000 {
        2
    } else {
        1
    }
}

/// Extract the ranking-signal vector for one video, given its channel's
/// recent uploads (may be empty when the channel fetch failed).
pub fn video_signals(
    keyword: &str,
    enriched: &EnrichedVideo,
    channel_recent: &[Video],
) -> VideoRankingSignals {
    let kw = keyword.trim().to_lowercase();
    let video = &enriched.video;
    let title = video.title.to_lowercase();
    let description = video.description.to_lowercase();

    let keyword_in_title = title.contains(&kw);
    let keyword_in_first_3_words = title
        .split_whitespace()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .contains(&kw);
    let keyword_in_description = description.contains(&kw);
    let tag_match_count = video
        .tags
        .iter()
        .filter(|t| t.to_lowercase().contains(&kw))
        .count();
    let transcript_mentions = enriched
        .transcript
        .as_ref()
        .map_or(0, |t| text::count_occurrences(&t.text, &kw));
    let engagement_rate = if video.view_count == 0 {
        0.0
    } else {
        round2((video.like_count + video.comment_count) as f64 / video.view_count as f64 * 100.0)
    };

    let channel = enriched.channel.as_ref();
    let channel_authority_tier = authority_tier(channel.map_or(0, |c| c.subscriber_count));
    let keyword_in_channel_name =
        channel.is_some_and(|c| c.title.to_lowercase().contains(&kw));
    let keyword_in_channel_description =
        channel.is_some_and(|c| c.description.to_lowercase().contains(&kw));
    let channel_keyword_match_count = channel.map_or(0, |c| {
        c.keywords.iter().filter(|k| k.to_lowercase().contains(&kw)).count()
    });
    let is_niche_channel = keyword_in_channel_name || channel_keyword_match_count >= 2;
    let comment_keyword_mentions = enriched
        .comments
        .iter()
        .filter(|c| c.text.to_lowercase().contains(&kw))
        .count();

    let channel_videos_analysed = channel_recent.len();
    let channel_videos_with_keyword = channel_recent
        .iter()
        .filter(|v| {
            v.title.to_lowercase().contains(&kw) || v.description.to_lowercase().contains(&kw)
        })
        .count();
    let channel_keyword_ratio = if channel_videos_analysed == 0 {
        0.0
    } else {
        channel_videos_with_keyword as f64 / channel_videos_analysed as f64
    };
    let is_keyword_authority = channel_keyword_ratio >= KEYWORD_AUTHORITY_RATIO;

    let mut reasons = Vec::new();
    if keyword_in_title {
        reasons.push("Keyword appears in the title".to_string());
    }
    if keyword_in_first_3_words {
        reasons.push("Keyword leads the title".to_string());
    }
    if tag_match_count > 0 {
        reasons.push(format!("{tag_match_count} tag(s) carry the keyword"));
    }
    if transcript_mentions > 0 {
        reasons.push(format!("Spoken {transcript_mentions} time(s) in the video"));
    }
    if channel_authority_tier >= 3 {
        reasons.push(format!("Channel authority tier {channel_authority_tier}"));
    }
    if is_niche_channel {
        reasons.push("Channel is focused on this niche".to_string());
    }
    if is_keyword_authority {
        reasons.push(format!(
            "Channel covers the keyword in {:.0}% of recent uploads",
            channel_keyword_ratio * 100.0
        ));
    }
    if comment_keyword_mentions > 0 {
        reasons.push(format!(
            "{comment_keyword_mentions} comment(s) mention the keyword"
        ));
    }

    VideoRankingSignals {
        keyword_in_title,
        keyword_in_first_3_words,
        keyword_in_description,
        tag_match_count,
        transcript_mentions,
        engagement_rate,
        channel_authority_tier,
        keyword_in_channel_name,
        keyword_in_channel_description,
        channel_keyword_match_count,
        is_niche_channel,
        comment_keyword_mentions,
        channel_videos_analysed,
        channel_videos_with_keyword,
        channel_keyword_ratio,
        is_keyword_authority,
        reasons,
    }
}

// ============================================================================
// Channel-keyword-authority post-pass
// ============================================================================

/// Correlate keyword authority with rank over the signal-annotated top
/// videos. The rank comparison uses the same hand-calibrated magnitudes as
/// the corpus factors; the ratio term compares the top-3 mean keyword ratio
/// against the overall mean.
pub fn channel_authority_factor(annotated: &[EnrichedVideo]) -> Option<RankingFactor> {
    let signals: Vec<(usize, &VideoRankingSignals)> = annotated
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.ranking_signals.as_ref().map(|s| (i + 1, s)))
        .collect();
    if signals.is_empty() {
        return None;
    }

    let authority_ranks: Vec<f64> = signals
        .iter()
        .filter(|(_, s)| s.is_keyword_authority)
        .map(|(rank, _)| *rank as f64)
        .collect();
    let other_ranks: Vec<f64> = signals
        .iter()
        .filter(|(_, s)| !s.is_keyword_authority)
        .map(|(rank, _)| *rank as f64)
        .collect();
    let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
    let rank_part = if !authority_ranks.is_empty() && !other_ranks.is_empty() {
        if mean(&authority_ranks) < mean(&other_ranks) {
            0.5
        } else {
            -0.1
        }
    } else {
        0.0
    };

    let ratios: Vec<f64> = signals.iter().map(|(_, s)| s.channel_keyword_ratio).collect();
    let overall_mean = mean(&ratios);
    let top3_mean = mean(&ratios[..ratios.len().min(3)]);
    let ratio_part = (top3_mean - overall_mean) / overall_mean.max(1.0) * 0.5;

    Some(RankingFactor {
        factor: "channel keyword authority".to_string(),
        correlation: round2((rank_part + ratio_part).clamp(-1.0, 1.0)),
    })
}

/// Append the post-pass factor, re-sort by absolute correlation, and trim
/// to six entries.
pub fn merge_authority_factor(insights: &mut RankingInsights, factor: RankingFactor) {
    insights.top_factors.push(factor);
    insights.top_factors.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.factor.cmp(&b.factor))
    });
    insights.top_factors.truncate(6);
}
