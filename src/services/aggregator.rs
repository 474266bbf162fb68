//! Rollup aggregation: sum sales and revenue per group key

use crate::types::{Grouped, MonthKey, Rollup, SalesRecord};
use serde::Serialize;
use std::fmt;

/// Dimension for string-keyed rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Month,
    Year,
    Company,
    Model,
}

impl GroupKey {
    /// Key of `record` along this dimension, `None` if it has none.
    ///
    /// Month keys are zero-padded (`2024-03`) so string order is
    /// chronological.
    pub fn key_of(self, record: &SalesRecord) -> Option<String> {
        match self {
            Self::Month => record.month_key().map(|k| k.to_string()),
            Self::Year => record.year().map(|y| y.to_string()),
            Self::Company => Some(record.company.clone()),
            Self::Model => record.model.clone(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Month => "month",
            Self::Year => "year",
            Self::Company => "company",
            Self::Model => "model",
        };
        f.write_str(s)
    }
}

/// Group records by an arbitrary key function.
///
/// Records mapped to `None` are left out of every group and counted in
/// `skipped`. Sums do not depend on record order.
pub fn aggregate<K, F>(records: &[SalesRecord], key_fn: F) -> Grouped<K>
where
    K: Ord + Clone,
    F: Fn(&SalesRecord) -> Option<K>,
{
    let mut grouped = Grouped::default();

    for record in records {
        match key_fn(record) {
            Some(key) => grouped
                .groups
                .entry(key.clone())
                .or_insert_with(|| Rollup::new(key))
                .add(record),
            None => grouped.skipped += 1,
        }
    }

    if grouped.skipped > 0 {
        tracing::debug!(
            skipped = grouped.skipped,
            groups = grouped.groups.len(),
            "records without a group key"
        );
    }
    grouped
}

/// Aggregator for the standard dimensions
pub struct Aggregator;

impl Aggregator {
    /// Monthly rollups, sorted by month ascending
    pub fn by_month(records: &[SalesRecord]) -> Vec<Rollup<MonthKey>> {
        aggregate(records, SalesRecord::month_key).into_rollups()
    }

    /// Yearly rollups, sorted by year ascending
    pub fn by_year(records: &[SalesRecord]) -> Vec<Rollup<i32>> {
        aggregate(records, SalesRecord::year).into_rollups()
    }

    /// Rollups per company, sorted by name. A missing company groups under "".
    pub fn by_company(records: &[SalesRecord]) -> Vec<Rollup<String>> {
        aggregate(records, |r| Some(r.company.clone())).into_rollups()
    }

    /// Rollups per model, sorted by name. Records without a model are skipped.
    pub fn by_model(records: &[SalesRecord]) -> Vec<Rollup<String>> {
        aggregate(records, |r| r.model.clone()).into_rollups()
    }

    /// String-keyed rollups along `dimension`, sorted by key
    pub fn by_dimension(records: &[SalesRecord], dimension: GroupKey) -> Grouped<String> {
        aggregate(records, |r| dimension.key_of(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(
        date: &str,
        company: &str,
        model: Option<&str>,
        sales: u64,
        revenue: f64,
    ) -> SalesRecord {
        SalesRecord {
            date: date.to_string(),
            company: company.to_string(),
            model: model.map(String::from),
            sales,
            revenue,
            price: None,
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            make_record("2024-02-10", "Toyota", Some("Camry"), 20, 640000.0),
            make_record("2024-01-05", "Toyota", Some("Corolla"), 10, 300000.0),
            make_record("2023-12-20", "Honda", Some("Civic"), 5, 125000.0),
            make_record("2024-01-18", "Honda", None, 3, 90000.0),
            make_record("not-a-date", "Ford", Some("F-150"), 7, 350000.0),
        ]
    }

    // ========== aggregate() tests ==========

    #[test]
    fn test_aggregate_empty() {
        let grouped = aggregate(&[], |r: &SalesRecord| Some(r.company.clone()));
        assert!(grouped.groups.is_empty());
        assert_eq!(grouped.skipped, 0);
    }

    #[test]
    fn test_aggregate_counts_skipped() {
        let grouped = aggregate(&sample(), SalesRecord::month_key);
        assert_eq!(grouped.skipped, 1);
        assert_eq!(grouped.groups.len(), 3);
    }

    #[test]
    fn test_aggregate_conserves_totals_by_company() {
        let records = sample();
        let grouped = aggregate(&records, |r| Some(r.company.clone()));
        let expected: u64 = records.iter().map(|r| r.sales).sum();
        assert_eq!(grouped.total_sales(), expected);
        assert_eq!(grouped.skipped, 0);
    }

    #[test]
    fn test_aggregate_order_independent() {
        let records = sample();
        let mut reversed = records.clone();
        reversed.reverse();
        let a = aggregate(&records, |r| Some(r.company.clone()));
        let b = aggregate(&reversed, |r| Some(r.company.clone()));
        for (key, rollup) in &a.groups {
            let other = &b.groups[key];
            assert_eq!(rollup.total_sales, other.total_sales);
            assert!((rollup.total_revenue - other.total_revenue).abs() < 1e-6);
        }
    }

    // ========== Aggregator tests ==========

    #[test]
    fn test_by_month_sorted_ascending() {
        let result = Aggregator::by_month(&sample());
        let keys: Vec<String> = result.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02"]);
        assert_eq!(result[1].total_sales, 13);
        assert!((result[1].total_revenue - 390000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_by_year() {
        let result = Aggregator::by_year(&sample());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, 2023);
        assert_eq!(result[0].total_sales, 5);
        assert_eq!(result[1].key, 2024);
        assert_eq!(result[1].total_sales, 33);
    }

    #[test]
    fn test_by_company_includes_undated_records() {
        let result = Aggregator::by_company(&sample());
        let keys: Vec<&str> = result.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Ford", "Honda", "Toyota"]);
        assert_eq!(result[2].total_sales, 30);
    }

    #[test]
    fn test_by_model_skips_missing_model() {
        let result = Aggregator::by_model(&sample());
        assert_eq!(result.len(), 4);
        let total: u64 = result.iter().map(|r| r.total_sales).sum();
        assert_eq!(total, 42);
    }

    #[test]
    fn test_by_dimension_month_matches_typed() {
        let grouped = Aggregator::by_dimension(&sample(), GroupKey::Month);
        let keys: Vec<&String> = grouped.groups.keys().collect();
        assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02"]);
        assert_eq!(grouped.skipped, 1);
    }

    #[test]
    fn test_by_dimension_model_skipped_count() {
        let grouped = Aggregator::by_dimension(&sample(), GroupKey::Model);
        assert_eq!(grouped.skipped, 1);
    }

    #[test]
    fn test_group_key_display() {
        assert_eq!(GroupKey::Month.to_string(), "month");
        assert_eq!(GroupKey::Model.to_string(), "model");
    }
}
