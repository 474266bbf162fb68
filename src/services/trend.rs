//! Month-over-month trend between the two most recent buckets

use crate::types::{Rollup, TrendSummary};

/// Percent change from the second-to-last to the last rollup.
///
/// `rollups` must be sorted ascending by period. Fewer than two buckets,
/// or a zero previous value, give 0 for that figure. Results are rounded
/// to one decimal, half away from zero.
pub fn compute_trend<K>(rollups: &[Rollup<K>]) -> TrendSummary {
    let [.., previous, last] = rollups else {
        return TrendSummary::default();
    };

    TrendSummary {
        sales_trend_pct: percent_change(previous.total_sales as f64, last.total_sales as f64),
        revenue_trend_pct: percent_change(previous.total_revenue, last.total_revenue),
    }
}

fn percent_change(previous: f64, last: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }
    round_one_decimal((last - previous) / previous * 100.0)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
