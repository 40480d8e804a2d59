//! Core entities shared across the analysis fabric.
//!
//! All records are immutable once produced (slot records are the exception:
//! they evolve in place inside their owning actor before being committed).
//! Durable-slot records use `#[serde(default)]` throughout so that fields
//! added later deserialize from older persisted payloads as zero values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical actor-key form of a caller-supplied keyword: trimmed and
/// lowercased. Display strings keep the caller's casing.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

// ============================================================================
// Platform entities
// ============================================================================

/// A single video as returned by the platform data API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub channel_id: String,
    pub channel_title: String,
    /// Tags in the order the platform returned them.
    pub tags: Vec<String>,
    pub category_id: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO-8601 duration as received (e.g. `PT4M13S`).
    pub duration: String,
    /// Playback definition label (`hd` / `sd`).
    pub definition: String,
    pub thumbnails: Vec<String>,
}

impl Video {
    /// Parse the ISO-8601 duration into fractional minutes. Unparseable or
    /// absent durations yield 0.
    pub fn duration_minutes(&self) -> f64 {
        let mut seconds = 0u64;
        let mut digits = String::new();
        for c in self.duration.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let value: u64 = digits.parse().unwrap_or(0);
            digits.clear();
            match c {
                'H' => seconds += value * 3600,
                'M' => seconds += value * 60,
                'S' => seconds += value,
                _ => {}
            }
        }
        seconds as f64 / 60.0
    }
}

/// Channel details with declared keywords already parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub view_count: u64,
    /// Declared channel keywords, quote-stripped.
    pub keywords: Vec<String>,
    pub thumbnails: Vec<String>,
}

impl Channel {
    /// Parse the platform's space/comma-separated keyword string. Quoted
    /// phrases stay intact, quotes are stripped.
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        for c in raw.chars() {
            match c {
                '"' => in_quotes = !in_quotes,
                ' ' | ',' if !in_quotes => {
                    if !current.is_empty() {
                        keywords.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            keywords.push(current);
        }
        keywords
    }
}

/// Full transcript text for one video. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub text: String,
    pub language: String,
}

/// One top-level comment on a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
    pub reply_count: u64,
    /// Derived: the text contains a question mark.
    pub is_question: bool,
}

impl Comment {
    /// Build a comment, deriving the `is_question` flag from the text.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        video_id: String,
        author: String,
        text: String,
        like_count: u64,
        published_at: DateTime<Utc>,
        reply_count: u64,
    ) -> Self {
        let is_question = text.contains('?');
        Self {
            id,
            video_id,
            author,
            text,
            like_count,
            published_at,
            reply_count,
            is_question,
        }
    }
}

/// A video bundled with the auxiliary data the signal miners consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedVideo {
    pub video: Video,
    pub transcript: Option<Transcript>,
    pub comments: Vec<Comment>,
    pub channel: Option<Channel>,
    /// Present only on the top videos of an analysis result.
    pub ranking_signals: Option<VideoRankingSignals>,
}

/// One page of keyword search results plus the platform's total hit count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub videos: Vec<Video>,
    pub total_results: u64,
}

// ============================================================================
// Ad-network and trends entities
// ============================================================================

/// Competition label used both by the ad network and the content-gap scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competition {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

/// Monthly keyword metrics from the ad network. Zero-filled when the
/// planner has nothing for the keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub monthly_searches: u64,
    pub competition: Competition,
    /// 0–100.
    pub competition_index: u8,
    /// Minor currency units.
    pub low_top_of_page_bid_micros: u64,
    pub high_top_of_page_bid_micros: u64,
}

/// A keyword suggestion from the ad network's planner with its metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordIdea {
    pub keyword: String,
    pub metrics: KeywordMetrics,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
    #[default]
    Unknown,
}

/// Interest data for one keyword in one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendData {
    pub keyword: String,
    /// 0–100.
    pub interest: u8,
    pub direction: TrendDirection,
    /// At most 10 entries each.
    pub related_queries: Vec<String>,
    pub rising_queries: Vec<String>,
}

impl TrendData {
    /// True when the trends source produced no signal at all.
    pub fn is_empty(&self) -> bool {
        self.interest == 0
            && self.direction == TrendDirection::Unknown
            && self.related_queries.is_empty()
            && self.rising_queries.is_empty()
    }
}

// ============================================================================
// Forum and web search entities (pass-through surfaces)
// ============================================================================

/// A community forum post matching a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: String,
    pub title: String,
    pub body: String,
    pub score: i64,
    pub comment_count: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A general web search hit for video content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebVideoHit {
    pub title: String,
    pub url: String,
    pub source: String,
}

// ============================================================================
// Research
// ============================================================================

/// The raw fanned-out signal bundle produced by the research orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub keyword: String,
    pub produced_at: DateTime<Utc>,
    /// Top results, enriched, in search-rank order.
    pub videos: Vec<EnrichedVideo>,
    pub platform_suggestions: Vec<String>,
    pub web_suggestions: Vec<String>,
    pub metrics: KeywordMetrics,
    pub total_results: u64,
}

/// One per-source partial emitted by the streaming research variant, in
/// completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchPartial {
    Search(SearchPage),
    PlatformSuggestions(Vec<String>),
    WebSuggestions(Vec<String>),
}

// ============================================================================
// Signal-mining outputs
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendType {
    Seasonal,
    Trending,
    #[default]
    Consistent,
    Declining,
}

/// Demand classification for a keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDemand {
    pub volume: u64,
    pub trend_type: TrendType,
    /// −100..=100.
    pub momentum: i32,
    /// Month number (1–12) when the keyword peaks, for seasonal keywords.
    pub seasonal_peak_month: Option<u32>,
    /// False when the trends source returned nothing; the score calculator
    /// treats consistent-without-signal as a weaker read.
    pub has_trend_data: bool,
}

/// Upload-recency counts over the researched videos. Cumulative windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadVelocity {
    pub today: usize,
    pub last_3_days: usize,
    pub last_week: usize,
    pub last_month: usize,
    pub last_year: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Hot,
    Active,
    Moderate,
    Slow,
    #[default]
    Dormant,
}

/// Supply-side read of the niche: volume of competing content and how
/// entrenched its producers are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSupply {
    /// Total search hits reported by the platform.
    pub total_videos: u64,
    pub avg_views: f64,
    pub avg_subscribers: f64,
    pub velocity: UploadVelocity,
    /// Demand normalised by supply, 0–2, two decimals. >1 means opportunity.
    pub gap_score: f64,
    pub activity: ActivityLevel,
    pub competition: Competition,
    /// Demand exists but nobody is publishing.
    pub dormant_niche: bool,
}

/// One reverse-engineered ranking factor with its position-bias correlation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingFactor {
    pub factor: String,
    /// −1..=+1, two decimals. Positive: factor-positive videos rank higher.
    pub correlation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelAuthoritySummary {
    pub avg_subscribers: f64,
    pub needs_established_channel: bool,
    pub estimated_min_subs_to_rank: u64,
}

/// Where top-ranking videos place the keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimalPlacement {
    pub in_first_3_title_words: bool,
    pub in_first_100_description_chars: bool,
    pub avg_tag_count: f64,
    pub transcript_mentions_per_minute: f64,
}

/// A derived long-tail phrasing with an estimated difficulty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTailVariation {
    pub keyword: String,
    pub estimated_difficulty: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingInsights {
    /// Strongest factors by absolute correlation.
    pub top_factors: Vec<RankingFactor>,
    pub channel_authority: ChannelAuthoritySummary,
    pub optimal_placement: OptimalPlacement,
    pub long_tail_variations: Vec<LongTailVariation>,
}

/// Per-video ranking-signal vector plus human-readable reasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRankingSignals {
    pub keyword_in_title: bool,
    pub keyword_in_first_3_words: bool,
    pub keyword_in_description: bool,
    pub tag_match_count: usize,
    pub transcript_mentions: usize,
    /// (likes + comments) / views, as a percentage, two decimals.
    pub engagement_rate: f64,
    /// 1–5 by subscriber bucket.
    pub channel_authority_tier: u8,
    pub keyword_in_channel_name: bool,
    pub keyword_in_channel_description: bool,
    pub channel_keyword_match_count: usize,
    pub is_niche_channel: bool,
    pub comment_keyword_mentions: usize,
    pub channel_videos_analysed: usize,
    pub channel_videos_with_keyword: usize,
    /// channel_videos_with_keyword / channel_videos_analysed.
    pub channel_keyword_ratio: f64,
    /// Ratio at or above the authority threshold.
    pub is_keyword_authority: bool,
    pub reasons: Vec<String>,
}

/// A term surfaced by the TF-IDF extractor with its per-source counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedKeyword {
    pub term: String,
    pub tfidf: f64,
    pub count: usize,
    /// Document frequency: distinct videos carrying the term.
    pub video_count: usize,
    pub title_count: usize,
    pub description_count: usize,
    pub tag_count: usize,
    pub transcript_count: usize,
    pub comment_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagOverlap {
    pub tag: String,
    pub video_count: usize,
    pub total_views: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicCluster {
    pub phrase: String,
    pub related_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetVideo {
    pub video_id: String,
    pub title: String,
    pub view_count: u64,
    /// Share of the must-use tags this video carries.
    pub similarity: f64,
}

/// Optimisation guidance mined from the researched corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOptimization {
    pub tag_overlaps: Vec<TagOverlap>,
    pub must_use_tags: Vec<String>,
    pub topic_clusters: Vec<TopicCluster>,
    pub target_videos: Vec<TargetVideo>,
    /// 0–100: share of transcripted videos that mention the keyword.
    pub topic_match_score: u8,
    pub transcript_keywords: Vec<String>,
}

// ============================================================================
// Scores and grades
// ============================================================================

/// Letter grade over the opportunity/difficulty net. Totally ordered,
/// A highest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    #[default]
    F,
}

impl Grade {
    /// Grade from net = opportunity − difficulty.
    pub fn from_net(net: i32) -> Self {
        if net > 40 {
            Grade::A
        } else if net > 30 {
            Grade::B
        } else if net > 0 {
            Grade::C
        } else if net > -20 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// A long-tail is worth surfacing at C or better.
    pub fn is_good(self) -> bool {
        matches!(self, Grade::A | Grade::B | Grade::C)
    }

    fn rank(self) -> u8 {
        match self {
            Grade::A => 4,
            Grade::B => 3,
            Grade::C => 2,
            Grade::D => 1,
            Grade::F => 0,
        }
    }
}

impl PartialOrd for Grade {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Grade {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    /// 0–100.
    pub opportunity: u8,
    /// 0–100.
    pub difficulty: u8,
    pub grade: Grade,
}

// ============================================================================
// Analysis results
// ============================================================================

/// The score-and-grade product of the keyword-analysis actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub keyword: String,
    pub analysed_at: DateTime<Utc>,
    pub search_demand: SearchDemand,
    pub content_supply: ContentSupply,
    pub ranking_insights: RankingInsights,
    pub scores: Scores,
    pub recommendations: Vec<String>,
    /// Strongest extracted terms, at most 20.
    pub top_keywords: Vec<ExtractedKeyword>,
    pub recommendation_optimization: RecommendationOptimization,
    /// Top 5 videos, annotated with per-video ranking signals.
    pub top_videos: Vec<EnrichedVideo>,
}

/// A graded long-tail candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTailResult {
    pub keyword: String,
    /// Which candidate source produced it ("YouTube Trends" / "Google Ads").
    pub source: String,
    pub opportunity: u8,
    pub difficulty: u8,
    pub grade: Grade,
    pub search_volume: u64,
    pub competition: Competition,
    pub video_count: u64,
    pub avg_competitor_views: f64,
    pub analysed_at: DateTime<Utc>,
}

// ============================================================================
// Trending digest
// ============================================================================

/// Compact projection of a trending video kept in the region cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingVideo {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub view_count: u64,
    pub thumbnail: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl From<&Video> for TrendingVideo {
    fn from(v: &Video) -> Self {
        Self {
            id: v.id.clone(),
            title: v.title.clone(),
            channel_title: v.channel_title.clone(),
            view_count: v.view_count,
            thumbnail: v.thumbnails.first().cloned(),
            published_at: v.published_at,
        }
    }
}

/// Summary of one extracted trending keyword and its sub-analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingKeywordSummary {
    pub keyword: String,
    pub grade: Grade,
    pub opportunity: u8,
    pub difficulty: u8,
    pub search_volume: u64,
    /// How many of the region's trending videos carried the keyword.
    pub trending_video_count: usize,
    pub top_video_title: String,
    pub top_video_thumbnail: Option<String>,
}

// ============================================================================
// Durable slot records
// ============================================================================

/// Durable state of a keyword-analysis actor. Both caches age out
/// independently on a 24-hour horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSlot {
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub cached_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub long_tails: Vec<LongTailResult>,
    #[serde(default)]
    pub long_tails_cached_at: Option<DateTime<Utc>>,
}

/// Durable state of a trending-analysis actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingSlot {
    #[serde(default)]
    pub keywords: Vec<TrendingKeywordSummary>,
    #[serde(default)]
    pub videos: Vec<TrendingVideo>,
    #[serde(default)]
    pub last_warmup_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub region: String,
}

// ============================================================================
// Streaming updates
// ============================================================================

/// One update on a long-tail analysis topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTailUpdate {
    pub parent_keyword: String,
    /// The freshly analysed long-tail; absent on the final complete marker.
    pub result: Option<LongTailResult>,
    pub is_complete: bool,
    /// Candidates analysed so far; strictly increases across emissions.
    pub analysed_count: usize,
    /// Candidates queued for this run; constant across emissions.
    pub total_count: usize,
    pub results_so_far: Vec<LongTailResult>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Runtime configuration for the analysis fabric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Region used for trends lookups during keyword analysis.
    pub default_region: String,
    /// Regions the warm-up worker maintains.
    pub regions: Vec<String>,
    /// Hour of day (UTC) for the daily warm-up.
    pub warmup_hour_utc: u32,
    /// Default long-tail count for the public entry points.
    pub max_long_tails: usize,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            default_region: crate::constants::DEFAULT_REGION.to_string(),
            regions: vec![crate::constants::DEFAULT_REGION.to_string()],
            warmup_hour_utc: crate::constants::WARMUP_HOUR_UTC,
            max_long_tails: crate::constants::DEFAULT_MAX_LONG_TAILS,
        }
    }
}
