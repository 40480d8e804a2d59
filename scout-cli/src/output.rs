//! Rendering for CLI results: compact human text or raw JSON.

use clap::ValueEnum;
use scout_core::{
    AnalysisResult, LongTailResult, ResearchResult, TrendingKeywordSummary, TrendingVideo,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn render_analysis(format: OutputFormat, analysis: &AnalysisResult) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(analysis).unwrap_or_default(),
        OutputFormat::Human => {
            let mut out = String::new();
            out.push_str(&format!(
                "{}\n  grade {}  opportunity {}  difficulty {}\n",
                analysis.keyword,
                analysis.scores.grade,
                analysis.scores.opportunity,
                analysis.scores.difficulty,
            ));
            out.push_str(&format!(
                "  volume {}  gap {:.2}  competition {:?}  activity {:?}\n",
                analysis.search_demand.volume,
                analysis.content_supply.gap_score,
                analysis.content_supply.competition,
                analysis.content_supply.activity,
            ));
            if !analysis.ranking_insights.top_factors.is_empty() {
                out.push_str("  ranking factors:\n");
                for factor in &analysis.ranking_insights.top_factors {
                    out.push_str(&format!(
                        "    {:+.2}  {}\n",
                        factor.correlation, factor.factor
                    ));
                }
            }
            if !analysis.recommendations.is_empty() {
                out.push_str("  recommendations:\n");
                for recommendation in &analysis.recommendations {
                    out.push_str(&format!("    - {recommendation}\n"));
                }
            }
            out
        }
    }
}

pub fn render_research(format: OutputFormat, research: &ResearchResult) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(research).unwrap_or_default(),
        OutputFormat::Human => {
            let mut out = format!(
                "{}: {} results, {} enriched, volume {}\n",
                research.keyword,
                research.total_results,
                research.videos.len(),
                research.metrics.monthly_searches,
            );
            for enriched in &research.videos {
                out.push_str(&format!(
                    "  {:>10} views  {}\n",
                    enriched.video.view_count, enriched.video.title
                ));
            }
            out
        }
    }
}

pub fn render_long_tails(format: OutputFormat, results: &[LongTailResult]) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(results).unwrap_or_default(),
        OutputFormat::Human => {
            if results.is_empty() {
                return "no long-tail candidates graded A-C\n".to_string();
            }
            let mut out = String::new();
            for result in results {
                out.push_str(&format!(
                    "  [{}] {}  (opp {} diff {}, {} via {})\n",
                    result.grade,
                    result.keyword,
                    result.opportunity,
                    result.difficulty,
                    result.search_volume,
                    result.source,
                ));
            }
            out
        }
    }
}

pub fn render_trending_keywords(
    format: OutputFormat,
    region: &str,
    keywords: &[TrendingKeywordSummary],
) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(keywords).unwrap_or_default(),
        OutputFormat::Human => {
            if keywords.is_empty() {
                return format!("no warmed trending digest for {region}\n");
            }
            let mut out = format!("trending keywords for {region}:\n");
            for summary in keywords {
                out.push_str(&format!(
                    "  [{}] {}  (opp {} diff {}, in {} trending videos)\n",
                    summary.grade,
                    summary.keyword,
                    summary.opportunity,
                    summary.difficulty,
                    summary.trending_video_count,
                ));
            }
            out
        }
    }
}

pub fn render_trending_videos(
    format: OutputFormat,
    region: &str,
    videos: &[TrendingVideo],
) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(videos).unwrap_or_default(),
        OutputFormat::Human => {
            if videos.is_empty() {
                return format!("no warmed trending videos for {region}\n");
            }
            let mut out = format!("trending videos for {region}:\n");
            for video in videos {
                out.push_str(&format!(
                    "  {:>10} views  {}  ({})\n",
                    video.view_count, video.title, video.channel_title
                ));
            }
            out
        }
    }
}
