//! Top-entity selection over rollups

use crate::services::aggregator::{Aggregator, GroupKey};
use crate::types::{Metric, Rollup, SalesRecord, TopEntity};

/// Rollup with the strictly greatest `metric`.
///
/// The scan starts from the "None"/0 sentinel, so only positive values win
/// and an empty or all-zero input returns the sentinel. Ties keep the
/// earliest rollup in input order; pass rollups in key order for a stable
/// answer.
pub fn top_by<K: ToString>(rollups: &[Rollup<K>], metric: Metric) -> TopEntity {
    let mut best: Option<&Rollup<K>> = None;
    let mut best_value = 0.0;

    for rollup in rollups {
        let value = rollup.value(metric);
        if value > best_value {
            best = Some(rollup);
            best_value = value;
        }
    }

    match best {
        Some(rollup) => TopEntity {
            key: rollup.key.to_string(),
            value: best_value,
        },
        None => TopEntity::none(),
    }
}

/// Top entity of `records` along `dimension`.
///
/// Records without a company group under "" and never win the company
/// dimension.
pub fn top_along(records: &[SalesRecord], dimension: GroupKey, metric: Metric) -> TopEntity {
    let mut rollups = Aggregator::by_dimension(records, dimension).into_rollups();
    if dimension == GroupKey::Company {
        rollups.retain(|r| !r.key.is_empty());
    }
    top_by(&rollups, metric)
}
