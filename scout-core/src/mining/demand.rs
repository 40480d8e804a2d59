//! Search-demand classifier: volume, trend direction, momentum, and
//! seasonality for a keyword.

use crate::constants::SEASONAL_PEAKS;
use crate::types::{KeywordMetrics, SearchDemand, TrendData, TrendDirection, TrendType};

/// Momentum in [−100, +100] from direction and interest.
fn momentum(trend: &TrendData) -> i32 {
    match (trend.direction, trend.interest) {
        (TrendDirection::Rising, interest) if interest > 50 => 50,
        (TrendDirection::Rising, _) => 25,
        (TrendDirection::Stable, _) => 0,
        (TrendDirection::Falling, interest) if interest > 50 => -25,
        (TrendDirection::Falling, _) => -50,
        (TrendDirection::Unknown, _) => 0,
    }
}

/// The peak month for a seasonal keyword, if any phrase matches.
fn seasonal_peak(keyword: &str) -> Option<u32> {
    let kw = keyword.to_lowercase();
    SEASONAL_PEAKS
        .iter()
        .find(|(phrase, _)| kw.contains(phrase))
        .map(|&(_, month)| month)
}

/// Classify demand for a keyword. Both trend data and metrics may be empty;
/// the classification then reads as consistent-without-signal, which the
/// score calculator weighs as neutral.
pub fn classify(keyword: &str, trend: &TrendData, metrics: &KeywordMetrics) -> SearchDemand {
    let momentum = momentum(trend);
    let seasonal_peak_month = seasonal_peak(keyword);

    let trend_type = if seasonal_peak_month.is_some() {
        TrendType::Seasonal
    } else if momentum > 30 {
        TrendType::Trending
    } else if momentum < -30 {
        TrendType::Declining
    } else if trend
        .rising_queries
        .iter()
        .any(|q| q.to_lowercase().contains(&keyword.to_lowercase()))
    {
        TrendType::Trending
    } else {
        TrendType::Consistent
    };

    SearchDemand {
        volume: metrics.monthly_searches,
        trend_type,
        momentum,
        seasonal_peak_month,
        has_trend_data: !trend.is_empty(),
    }
}
