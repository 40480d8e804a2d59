//! Shared text cleaning and tokenisation for the statistical miners.

use crate::constants::{EXTRACTION_STOP_WORDS, TRENDING_EXTRA_STOP_WORDS};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhttps?://\S+|\bwww\.\S+").expect("valid url regex"));
static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{6,}$").expect("valid hex regex"));

static EXTRACTION_STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EXTRACTION_STOP_WORDS.iter().copied().collect());
static TRENDING_STOP_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    EXTRACTION_STOP_WORDS
        .iter()
        .chain(TRENDING_EXTRA_STOP_WORDS.iter())
        .copied()
        .collect()
});

/// Stop words for general keyword extraction.
pub(crate) fn extraction_stop_set() -> &'static HashSet<&'static str> {
    &EXTRACTION_STOP_SET
}

/// Augmented stop set for trending-video mining (adds platform boilerplate).
pub(crate) fn trending_stop_set() -> &'static HashSet<&'static str> {
    &TRENDING_STOP_SET
}

/// Strip URLs and HTML tags, decode HTML entities, lowercase.
pub(crate) fn clean_text(raw: &str) -> String {
    let without_urls = URL_RE.replace_all(raw, " ");
    let without_tags = HTML_TAG_RE.replace_all(&without_urls, " ");
    html_escape::decode_html_entities(&without_tags).to_lowercase()
}

/// True for tokens the extractor never counts: short words, stop words,
/// hex blobs, and bare integers.
fn droppable(token: &str, stop: &HashSet<&'static str>) -> bool {
    token.len() < 3
        || stop.contains(token)
        || HEX_RE.is_match(token)
        || token.parse::<i64>().is_ok()
}

/// Clean `raw` and split it into filtered word tokens.
pub(crate) fn tokenize(raw: &str, stop: &HashSet<&'static str>) -> Vec<String> {
    clean_text(raw)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !droppable(t, stop))
        .map(str::to_string)
        .collect()
}

/// Unigrams, bigrams, and trigrams over a filtered token sequence.
pub(crate) fn ngrams(tokens: &[String], max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    for n in 1..=max_n {
        for window in tokens.windows(n) {
            grams.push(window.join(" "));
        }
    }
    grams
}

/// Lowercased words longer than two characters, for relevance checks.
pub(crate) fn word_set(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Count non-overlapping occurrences of `needle` in `haystack`, both
/// compared case-insensitively.
pub(crate) fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(&needle.to_lowercase()).count()
}
