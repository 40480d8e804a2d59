#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

//! # Scout Core
//!
//! Keyword opportunity analysis for video creators: a fabric of
//! string-keyed, per-instance single-threaded actors that fan out to
//! external signal sources, fuse the returned signals through pure
//! statistical miners, and grade how worthwhile a topic is to produce.
//!
//! ## Core Concepts
//!
//! - **Actors**: key-addressable instances with FIFO mailboxes ([`runtime`])
//! - **Per-source actors**: TTL'd caches over each external adapter,
//!   swallowing failures into neutral values ([`sources`])
//! - **Research**: the two-phase fan-out + enrichment bundle ([`research`])
//! - **Signal miners**: pure TF-IDF, demand, content-gap, ranking, and
//!   scoring computations ([`mining`])
//! - **Keyword analysis**: the durable-cached composition of all of the
//!   above, including recursive long-tail sub-analyses ([`analysis`])
//! - **Trending digest**: the daily-warmed per-region cache ([`trending`],
//!   [`warmup`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use scout_core::runtime::MemoryStateStore;
//! use scout_core::sources::Adapters;
//! use scout_core::{KeywordScout, ScoutConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> scout_core::Result<()> {
//!     // Real deployments hand in HTTP adapters and a redb-backed store.
//!     let scout = KeywordScout::new(
//!         ScoutConfig::default(),
//!         Adapters::disconnected(),
//!         Arc::new(MemoryStateStore::new()),
//!     );
//!
//!     let analysis = scout.analyse_keyword("sourdough bread", 10).await?;
//!     println!(
//!         "{}: opportunity {} difficulty {} grade {}",
//!         analysis.keyword,
//!         analysis.scores.opportunity,
//!         analysis.scores.difficulty,
//!         analysis.scores.grade,
//!     );
//!
//!     let mut updates = scout.on_long_tail_analysed("sourdough bread");
//!     while let Ok(update) = updates.recv().await {
//!         if update.is_complete {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! Source adapters never propagate failures into the pipeline: every
//! per-source actor degrades to an empty or zero value, and every miner
//! treats empty inputs as "insufficient data". The only errors callers see
//! are [`Error::NotFound`] (a video or channel id did not resolve),
//! [`Error::Persist`] (a durable slot write failed), and
//! [`Error::RouteUnavailable`] (the slot store was unreachable at actor
//! activation).

pub mod analysis;
pub mod bus;
pub mod constants;
pub mod enrichment;
pub mod error;
pub mod mining;
pub mod research;
pub mod runtime;
pub mod scout;
pub mod sources;
pub mod trending;
pub mod types;
pub mod warmup;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use bus::LongTailBus;
pub use error::{Error, Result};
pub use scout::KeywordScout;
pub use types::{
    normalize_keyword, ActivityLevel, AnalysisResult, Channel, Comment, Competition, ContentSupply,
    EnrichedVideo, ExtractedKeyword, ForumPost, Grade, KeywordIdea, KeywordMetrics, KeywordSlot,
    LongTailResult, LongTailUpdate, RankingFactor, RankingInsights, RecommendationOptimization,
    ResearchPartial, ResearchResult, ScoutConfig, Scores, SearchDemand, SearchPage, Transcript,
    TrendData, TrendDirection, TrendType, TrendingKeywordSummary, TrendingSlot, TrendingVideo,
    UploadVelocity, Video, VideoRankingSignals, WebVideoHit,
};
