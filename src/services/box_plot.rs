//! Five-number summaries for price box plots
//!
//! Quantiles use linear interpolation at index `p * (n - 1)` over the sorted
//! prices. Fences sit 1.5 IQR outside the box; whiskers stop at the most
//! extreme observed price inside the fences and never inside the box.

use crate::types::{FiveNumberSummary, SalesRecord};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Per-unit prices grouped by model. Records without a model or without a
/// positive price are left out.
pub fn prices_by_model(records: &[SalesRecord]) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        let (Some(model), Some(price)) = (record.model.as_ref(), record.unit_price()) else {
            continue;
        };
        groups.entry(model.clone()).or_default().push(price);
    }
    groups
}

/// Summaries for every group with at least one positive price.
///
/// Groups are independent and computed in parallel.
pub fn box_plot_stats<G>(
    prices_by_group: &BTreeMap<G, Vec<f64>>,
) -> BTreeMap<G, FiveNumberSummary<G>>
where
    G: Ord + Clone + Send + Sync,
{
    prices_by_group
        .par_iter()
        .filter_map(|(group, prices)| summarize(group.clone(), prices))
        .map(|summary| (summary.group.clone(), summary))
        .collect()
}

/// Five-number summary for one group, `None` when no usable price remains.
pub fn summarize<G>(group: G, prices: &[f64]) -> Option<FiveNumberSummary<G>> {
    let mut sorted: Vec<f64> = prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let min = sorted
        .iter()
        .copied()
        .find(|p| *p >= lower_bound)
        .map_or(q1, |p| p.min(q1));
    let max = sorted
        .iter()
        .rev()
        .copied()
        .find(|p| *p <= upper_bound)
        .map_or(q3, |p| p.max(q3));

    let outliers = sorted
        .iter()
        .copied()
        .filter(|p| *p < lower_bound || *p > upper_bound)
        .collect();

    Some(FiveNumberSummary {
        group,
        min,
        q1,
        median,
        q3,
        max,
        lower_bound,
        upper_bound,
        outliers,
    })
}

/// Linearly interpolated quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let index = (n - 1) as f64 * p;
    let lo = index.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let fraction = index - lo as f64;
    let value = sorted[lo] + (sorted[hi] - sorted[lo]) * fraction;
    // clamp keeps rounding from stepping past the neighbouring values
    Some(value.max(sorted[lo]).min(sorted[hi]))
}
