//! Central constants for cache horizons, fan-out widths, and the
//! signal-mining heuristics.

use std::time::Duration;

// ============================================================================
// Cache freshness
// ============================================================================

/// In-process memo TTL for keyword search results
pub const SEARCH_TTL: Duration = Duration::from_secs(10 * 60);

/// In-process memo TTL for autocomplete suggestions
pub const AUTOCOMPLETE_TTL: Duration = Duration::from_secs(60 * 60);

/// In-process memo TTL for trend data
pub const TRENDS_TTL: Duration = Duration::from_secs(60 * 60);

/// In-process memo TTL for channel details
pub const CHANNEL_DETAILS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// In-process memo TTL for a channel's recent-video list
pub const CHANNEL_VIDEOS_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// In-process memo TTL for video comments
pub const COMMENTS_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// TTL for the cross-cutting web-query cache (forum + video web search)
pub const WEB_QUERY_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Bound on distinct entries in the cross-cutting web-query cache
pub const WEB_QUERY_CACHE_SIZE: usize = 512;

/// In-process memo TTL for a composed research result
pub const RESEARCH_TTL: Duration = Duration::from_secs(60 * 60);

/// Durable horizon for a cached keyword analysis (hours)
pub const ANALYSIS_HORIZON_HOURS: i64 = 24;

/// Durable horizon for a cached long-tail list (hours)
pub const LONG_TAIL_HORIZON_HOURS: i64 = 24;

// ============================================================================
// Fan-out widths
// ============================================================================

/// Maximum videos requested from a keyword search
pub const SEARCH_MAX_RESULTS: usize = 50;

/// Number of search results enriched in research phase 2
pub const RESEARCH_ENRICH_COUNT: usize = 10;

/// Number of top videos annotated with per-video ranking signals
pub const SIGNAL_VIDEO_COUNT: usize = 5;

/// Comments fetched by a full enrichment
pub const COMMENTS_FULL: usize = 50;

/// Comments fetched by a fast enrichment
pub const COMMENTS_FAST: usize = 20;

/// Recent videos fetched per channel for keyword-authority analysis
pub const CHANNEL_RECENT_VIDEOS: usize = 50;

/// Comments considered per video by the keyword extractor
pub const EXTRACT_COMMENT_COUNT: usize = 50;

/// Terms returned by the keyword extractor
pub const EXTRACT_TOP_K: usize = 50;

/// Extracted terms carried on an analysis result
pub const RESULT_TOP_KEYWORDS: usize = 20;

/// Keyword-planner ideas requested for long-tail candidates
pub const PLANNER_IDEA_LIMIT: usize = 50;

/// Long-tail candidates analysed per batch
pub const LONG_TAIL_BATCH_SIZE: usize = 3;

/// Pause between long-tail batches
pub const LONG_TAIL_BATCH_DELAY: Duration = Duration::from_secs(2);

/// Default number of long-tail variations returned
pub const DEFAULT_MAX_LONG_TAILS: usize = 10;

/// Trending videos fetched per region warm-up
pub const TRENDING_VIDEO_COUNT: usize = 50;

/// Keywords extracted and sub-analysed per region warm-up
pub const TRENDING_KEYWORD_COUNT: usize = 20;

/// Hour of day (UTC) at which the warm-up worker re-runs
pub const WARMUP_HOUR_UTC: u32 = 6;

/// Retry pause after a failed warm-up pass
pub const WARMUP_RETRY_DELAY: Duration = Duration::from_secs(60 * 60);

/// Default region for trends and trending digests
pub const DEFAULT_REGION: &str = "US";

// ============================================================================
// Extraction stop words
// ============================================================================

/// Stop words dropped by the TF-IDF keyword extractor.
pub const EXTRACTION_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had",
    "her", "was", "one", "our", "out", "day", "get", "has", "him", "his",
    "how", "man", "new", "now", "old", "see", "two", "way", "who", "its",
    "did", "let", "she", "too", "use", "that", "with", "have", "this",
    "will", "your", "from", "they", "know", "want", "been", "good", "much",
    "some", "time", "very", "when", "come", "here", "just", "like", "long",
    "make", "many", "more", "most", "over", "such", "take", "than", "them",
    "well", "were", "what", "into", "about", "after", "also", "back",
    "because", "could", "does", "even", "first", "going", "their", "there",
    "these", "thing", "think", "only", "other", "really", "right", "should",
    "still", "would", "which", "where", "while", "youre", "dont", "cant",
    "thats", "gonna", "yeah",
];

/// Platform boilerplate excluded on top of the extraction set when mining
/// trending-video titles and tags.
pub const TRENDING_EXTRA_STOP_WORDS: &[&str] = &[
    "video", "videos", "official", "watch", "watching", "full", "live",
    "trailer", "teaser", "episode", "shorts", "channel", "subscribe",
    "like", "comment", "share", "follow", "today", "highlights", "best",
    "top", "part", "feat", "featuring",
];

/// Bigram phrases too generic to anchor a transcript topic cluster.
pub const CLUSTER_PHRASE_BLACKLIST: &[&str] = &[
    "going to", "want to", "have to", "need to", "able to", "kind of",
    "sort of", "lot of", "little bit", "make sure", "thank you",
    "right now", "you know", "you can", "you want", "this video",
];

// ============================================================================
// Seasonality
// ============================================================================

/// Case-insensitive keyword substrings mapped to a seasonal peak month.
pub const SEASONAL_PEAKS: &[(&str, u32)] = &[
    ("christmas", 12),
    ("holiday", 12),
    ("gift", 12),
    ("halloween", 10),
    ("costume", 10),
    ("scary", 10),
    ("summer", 7),
    ("beach", 7),
    ("vacation", 7),
    ("back to school", 8),
    ("school supplies", 8),
    ("tax return", 4),
    ("taxes", 4),
    ("tax", 4),
    ("valentine", 2),
    ("romantic", 2),
    ("thanksgiving", 11),
    ("turkey", 11),
    ("new year", 1),
    ("resolution", 1),
];

// ============================================================================
// Ranking heuristics
// ============================================================================

/// Subscriber average above which a niche is considered to require an
/// established channel to rank.
pub const ESTABLISHED_CHANNEL_SUBS: f64 = 100_000.0;

/// Share of a channel's recent uploads that must carry the keyword for the
/// channel to count as a keyword authority.
pub const KEYWORD_AUTHORITY_RATIO: f64 = 0.30;

/// Long-tail variation difficulty floor for autocomplete-derived candidates
pub const VARIATION_MIN_DIFFICULTY: u8 = 10;

/// Long-tail variation difficulty floor for extraction-derived candidates
pub const EXTRACTED_VARIATION_MIN_DIFFICULTY: u8 = 20;

/// Cap on the length bonus subtracted from variation difficulty
pub const VARIATION_LENGTH_BONUS_CAP: u8 = 30;

/// Variations returned by the ranking analyser
pub const MAX_VARIATIONS: usize = 10;
