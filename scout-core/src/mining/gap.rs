//! Content-gap scorer: demand normalised by supply and competitor
//! authority.

use crate::types::{
    ActivityLevel, Competition, ContentSupply, EnrichedVideo, KeywordMetrics, UploadVelocity,
};
use chrono::{DateTime, Duration, Utc};

fn velocity(videos: &[EnrichedVideo], now: DateTime<Utc>) -> UploadVelocity {
    let count_since = |days: i64| {
        let cutoff = now - Duration::days(days);
        videos.iter().filter(|v| v.video.published_at >= cutoff).count()
    };
    UploadVelocity {
        today: count_since(1),
        last_3_days: count_since(3),
        last_week: count_since(7),
        last_month: count_since(30),
        last_year: count_since(365),
    }
}

fn gap(volume: u64, video_count: u64, avg_subs: f64) -> f64 {
    if volume == 0 {
        return 0.0;
    }
    if video_count == 0 {
        return 2.0;
    }
    let demand = (volume as f64 / 10_000.0).min(1.0);
    let saturation = (video_count as f64 / 50.0).min(1.0) + 0.1;
    let authority = (avg_subs / 1_000_000.0).min(1.0) + 0.1;
    let raw = demand / (saturation * authority);
    ((raw * 100.0).round() / 100.0).clamp(0.0, 2.0)
}

fn activity(velocity: &UploadVelocity, total_videos: u64) -> ActivityLevel {
    if velocity.last_week >= 3 {
        ActivityLevel::Hot
    } else if velocity.last_week >= 1 {
        ActivityLevel::Active
    } else if velocity.last_month >= 1 {
        ActivityLevel::Moderate
    } else if total_videos > 0 {
        ActivityLevel::Slow
    } else {
        ActivityLevel::Dormant
    }
}

fn competition(gap: f64, avg_subs: f64, avg_views: f64) -> Competition {
    if gap > 1.0 {
        Competition::Low
    } else if avg_subs > 500_000.0 || avg_views > 1_000_000.0 {
        Competition::High
    } else if avg_subs > 100_000.0 || avg_views > 100_000.0 {
        Competition::Medium
    } else {
        Competition::Low
    }
}

fn dormant(volume: u64, velocity: &UploadVelocity, total_videos: u64) -> bool {
    (volume >= 5000 && velocity.last_month == 0)
        || (volume >= 2000 && velocity.last_week == 0 && velocity.last_month <= 2)
        || (volume >= 1000 && velocity.last_week == 0 && total_videos > 0)
}

/// Score the supply side of a niche from the researched videos, the
/// keyword metrics, and the platform's total hit count.
pub fn score(
    videos: &[EnrichedVideo],
    metrics: &KeywordMetrics,
    total_videos: u64,
    now: DateTime<Utc>,
) -> ContentSupply {
    let avg_views = if videos.is_empty() {
        0.0
    } else {
        videos.iter().map(|v| v.video.view_count as f64).sum::<f64>() / videos.len() as f64
    };
    let avg_subscribers = if videos.is_empty() {
        0.0
    } else {
        videos
            .iter()
            .map(|v| v.channel.as_ref().map_or(0.0, |c| c.subscriber_count as f64))
            .sum::<f64>()
            / videos.len() as f64
    };

    let velocity = velocity(videos, now);
    let gap_score = gap(metrics.monthly_searches, total_videos, avg_subscribers);

    ContentSupply {
        total_videos,
        avg_views,
        avg_subscribers,
        velocity,
        gap_score,
        activity: activity(&velocity, total_videos),
        competition: competition(gap_score, avg_subscribers, avg_views),
        dormant_niche: dormant(metrics.monthly_searches, &velocity, total_videos),
    }
}
