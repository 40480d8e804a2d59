//! Opportunity/difficulty scoring and grading, plus the short
//! human-readable recommendations derived from the mined signals.

use crate::types::{
    Competition, ContentSupply, Grade, RankingInsights, Scores, SearchDemand, TrendType,
};
use chrono::{DateTime, Datelike, Utc};

fn volume_points(volume: u64) -> u8 {
    if volume > 100_000 {
        25
    } else if volume > 50_000 {
        22
    } else if volume > 10_000 {
        18
    } else if volume > 1_000 {
        12
    } else if volume > 100 {
        6
    } else {
        3
    }
}

fn gap_points(gap: f64) -> u8 {
    if gap > 1.5 {
        30
    } else if gap > 1.0 {
        25
    } else if gap > 0.5 {
        15
    } else {
        5
    }
}

fn momentum_points(demand: &SearchDemand, now: DateTime<Utc>) -> u8 {
    match demand.trend_type {
        TrendType::Seasonal => {
            let in_season = demand.seasonal_peak_month == Some(now.month());
            if in_season {
                18
            } else {
                8
            }
        }
        TrendType::Trending => 20,
        TrendType::Declining => 3,
        // Consistent reads are only worth full credit when the trends
        // source actually reported data; with no signal at all the read is
        // neutral.
        TrendType::Consistent => {
            if demand.has_trend_data {
                15
            } else {
                10
            }
        }
    }
}

fn rankability_points(insights: &RankingInsights, competition: Competition) -> u8 {
    let mut points: u8 = if insights.channel_authority.needs_established_channel {
        5
    } else {
        25
    };
    if competition == Competition::Low {
        points += 5;
    }
    points.min(25)
}

fn authority_points(avg_subscribers: f64) -> u8 {
    if avg_subscribers > 1_000_000.0 {
        30
    } else if avg_subscribers > 500_000.0 {
        25
    } else if avg_subscribers > 100_000.0 {
        18
    } else if avg_subscribers > 10_000.0 {
        10
    } else {
        5
    }
}

fn saturation_points(video_count: u64) -> u8 {
    if video_count > 100 {
        25
    } else if video_count > 50 {
        20
    } else if video_count > 20 {
        12
    } else if video_count > 10 {
        6
    } else {
        3
    }
}

fn view_competition_points(avg_views: f64) -> u8 {
    if avg_views > 1_000_000.0 {
        25
    } else if avg_views > 500_000.0 {
        20
    } else if avg_views > 100_000.0 {
        15
    } else if avg_views > 10_000.0 {
        8
    } else {
        3
    }
}

fn channel_requirement_points(insights: &RankingInsights) -> u8 {
    let mut points: u8 = if insights.channel_authority.needs_established_channel {
        20
    } else {
        5
    };
    if insights.channel_authority.estimated_min_subs_to_rank > 50_000 {
        points += 5;
    }
    points.min(20)
}

/// Combine the mined signals into 0–100 opportunity and difficulty scores
/// and a letter grade.
pub fn calculate(
    demand: &SearchDemand,
    supply: &ContentSupply,
    insights: &RankingInsights,
    now: DateTime<Utc>,
) -> Scores {
    let opportunity = u32::from(volume_points(demand.volume))
        + u32::from(gap_points(supply.gap_score))
        + u32::from(momentum_points(demand, now))
        + u32::from(rankability_points(insights, supply.competition));
    let difficulty = u32::from(authority_points(supply.avg_subscribers))
        + u32::from(saturation_points(supply.total_videos))
        + u32::from(view_competition_points(supply.avg_views))
        + u32::from(channel_requirement_points(insights));

    let opportunity = opportunity.min(100) as u8;
    let difficulty = difficulty.min(100) as u8;
    let grade = Grade::from_net(i32::from(opportunity) - i32::from(difficulty));

    Scores {
        opportunity,
        difficulty,
        grade,
    }
}

/// Short rule-based guidance strings for the analysis result.
pub fn recommendations(
    keyword: &str,
    demand: &SearchDemand,
    supply: &ContentSupply,
    insights: &RankingInsights,
    scores: &Scores,
) -> Vec<String> {
    let mut out = Vec::new();

    if supply.dormant_niche {
        out.push(format!(
            "\"{keyword}\" shows demand with little fresh supply; publishing now can own the niche"
        ));
    }
    if supply.gap_score > 1.0 {
        out.push(format!(
            "Content gap of {:.2} means demand outstrips supply",
            supply.gap_score
        ));
    }
    match demand.trend_type {
        TrendType::Seasonal => {
            if let Some(month) = demand.seasonal_peak_month {
                out.push(format!(
                    "Seasonal keyword peaking in month {month}; schedule publication ahead of the peak"
                ));
            }
        }
        TrendType::Trending => {
            out.push("Interest is rising; publish while momentum holds".to_string());
        }
        TrendType::Declining => {
            out.push("Interest is declining; consider a fresher angle".to_string());
        }
        TrendType::Consistent => {}
    }
    if insights.channel_authority.needs_established_channel {
        out.push(format!(
            "Top results come from established channels (~{:.0} subscribers on average); differentiation matters",
            insights.channel_authority.avg_subscribers
        ));
    }
    if let Some(variation) = insights.long_tail_variations.first() {
        out.push(format!(
            "Easier entry point: target \"{}\" first",
            variation.keyword
        ));
    }
    out.push(match scores.grade {
        Grade::A | Grade::B => "Strong opportunity for this keyword".to_string(),
        Grade::C => "Workable opportunity with the right packaging".to_string(),
        Grade::D | Grade::F => "Hard to win; consider the suggested variations".to_string(),
    });
    out
}
