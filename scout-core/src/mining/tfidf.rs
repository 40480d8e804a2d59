//! TF-IDF keyword extraction over a research corpus.
//!
//! Each video is one document. Terms are unigrams, bigrams, and trigrams
//! from the title, description, transcript, and first 50 comments (cleaned
//! and stop-filtered) plus whole tags. IDF uses the natural log; every
//! counted term has document frequency >= 1, so a term present in every
//! document scores exactly zero.

use super::text;
use crate::constants::EXTRACT_COMMENT_COUNT;
use crate::types::{EnrichedVideo, ExtractedKeyword};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct TermStats {
    count: usize,
    title: usize,
    description: usize,
    tags: usize,
    transcript: usize,
    comments: usize,
    videos: HashSet<usize>,
}

enum Source {
    Title,
    Description,
    Tags,
    Transcript,
    Comments,
}

/// Extract the top `top_k` terms by TF-IDF from a video corpus.
pub fn extract_keywords(videos: &[EnrichedVideo], top_k: usize) -> Vec<ExtractedKeyword> {
    if videos.is_empty() {
        return Vec::new();
    }

    let stop = text::extraction_stop_set();
    let mut stats: HashMap<String, TermStats> = HashMap::new();

    let mut record = |term: String, source: &Source, video_idx: usize| {
        let entry = stats.entry(term).or_default();
        entry.count += 1;
        match source {
            Source::Title => entry.title += 1,
            Source::Description => entry.description += 1,
            Source::Tags => entry.tags += 1,
            Source::Transcript => entry.transcript += 1,
            Source::Comments => entry.comments += 1,
        }
        entry.videos.insert(video_idx);
    };

    for (idx, enriched) in videos.iter().enumerate() {
        let video = &enriched.video;

        for (raw, source) in [
            (video.title.as_str(), Source::Title),
            (video.description.as_str(), Source::Description),
        ] {
            let tokens = text::tokenize(raw, stop);
            for gram in text::ngrams(&tokens, 3) {
                record(gram, &source, idx);
            }
        }

        for tag in &video.tags {
            let tag = tag.trim().to_lowercase();
            let tag = tag.split_whitespace().collect::<Vec<_>>().join(" ");
            if tag.len() > 2 {
                record(tag, &Source::Tags, idx);
            }
        }

        if let Some(transcript) = &enriched.transcript {
            let tokens = text::tokenize(&transcript.text, stop);
            for gram in text::ngrams(&tokens, 3) {
                record(gram, &Source::Transcript, idx);
            }
        }

        for comment in enriched.comments.iter().take(EXTRACT_COMMENT_COUNT) {
            let tokens = text::tokenize(&comment.text, stop);
            for gram in text::ngrams(&tokens, 3) {
                record(gram, &Source::Comments, idx);
            }
        }
    }

    let doc_count = videos.len() as f64;
    let mut keywords: Vec<ExtractedKeyword> = stats
        .into_iter()
        .map(|(term, s)| {
            let df = s.videos.len();
            let tfidf = s.count as f64 * (doc_count / df as f64).ln();
            ExtractedKeyword {
                term,
                tfidf,
                count: s.count,
                video_count: df,
                title_count: s.title,
                description_count: s.description,
                tag_count: s.tags,
                transcript_count: s.transcript,
                comment_count: s.comments,
            }
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.tfidf
            .partial_cmp(&a.tfidf)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.term.cmp(&b.term))
    });
    keywords.truncate(top_k);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_video;
    use crate::types::Transcript;

    fn doc(id: &str, title: &str, description: &str) -> EnrichedVideo {
        let mut video = test_video(id, title, 100);
        video.description = description.to_string();
        EnrichedVideo {
            video,
            ..EnrichedVideo::default()
        }
    }

    #[test]
    fn empty_corpus_yields_no_keywords() {
        assert!(extract_keywords(&[], 50).is_empty());
    }

    #[test]
    fn term_in_every_document_scores_zero() {
        let corpus = vec![
            doc("v1", "sourdough bread", "x"),
            doc("v2", "sourdough starter", "y"),
        ];
        let keywords = extract_keywords(&corpus, 100);
        let ubiquitous = keywords.iter().find(|k| k.term == "sourdough").unwrap();
        assert_eq!(ubiquitous.video_count, 2);
        assert_eq!(ubiquitous.tfidf, 0.0);
    }

    #[test]
    fn rarer_terms_outrank_common_ones() {
        let corpus = vec![
            doc("v1", "sourdough bread baking", "easy recipe"),
            doc("v2", "sourdough bread", "easy recipe"),
            doc("v3", "sourdough focaccia", "focaccia focaccia focaccia"),
        ];
        let keywords = extract_keywords(&corpus, 100);
        let focaccia = keywords.iter().find(|k| k.term == "focaccia").unwrap();
        let bread = keywords.iter().find(|k| k.term == "bread").unwrap();
        assert!(focaccia.tfidf > bread.tfidf);
    }

    #[test]
    fn extraction_is_idempotent() {
        let corpus = vec![
            doc("v1", "cast iron skillet", "season your skillet"),
            doc("v2", "cast iron care", "rust removal"),
        ];
        assert_eq!(extract_keywords(&corpus, 30), extract_keywords(&corpus, 30));
    }

    #[test]
    fn tags_and_transcripts_contribute() {
        let mut enriched = doc("v1", "plain", "plain");
        enriched.video.tags = vec!["  Machine   Learning ".to_string(), "ml".to_string()];
        enriched.transcript = Some(Transcript {
            video_id: "v1".into(),
            text: "gradient descent explained".into(),
            language: "en".into(),
        });
        let other = doc("v2", "other", "other");
        let keywords = extract_keywords(&[enriched, other], 100);

        let tag = keywords.iter().find(|k| k.term == "machine learning").unwrap();
        assert_eq!(tag.tag_count, 1);
        // Two-char tag dropped.
        assert!(!keywords.iter().any(|k| k.term == "ml"));
        assert!(keywords.iter().any(|k| k.term == "gradient descent"));
    }
}
