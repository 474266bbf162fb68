//! Chart-shaped projections over the shared rollups
//!
//! Each function reshapes aggregation output for one chart family; none of
//! them aggregates on its own.

use crate::services::aggregator::{aggregate, Aggregator};
use crate::services::kpi::average_price;
use crate::types::{MonthKey, Rollup, SalesRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the per-company metrics table (also feeds the bar chart).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyMetrics {
    pub company: String,
    pub total_sales: u64,
    pub total_revenue: f64,
    /// `total_revenue / total_sales`, 0 without sales
    pub avg_price: f64,
}

/// One slice of the revenue pie.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenueShare {
    pub company: String,
    pub revenue: f64,
    /// Fraction of the summed revenue in `[0, 1]`
    pub share: f64,
}

/// One stacked bar: sales per company within a year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearStack {
    pub year: i32,
    pub companies: BTreeMap<String, u64>,
    pub total_sales: u64,
}

pub fn company_metrics(records: &[SalesRecord]) -> Vec<CompanyMetrics> {
    Aggregator::by_company(records)
        .into_iter()
        .map(|r| CompanyMetrics {
            avg_price: average_price(r.total_sales, r.total_revenue),
            company: r.key,
            total_sales: r.total_sales,
            total_revenue: r.total_revenue,
        })
        .collect()
}

pub fn revenue_shares(records: &[SalesRecord]) -> Vec<RevenueShare> {
    let rollups = Aggregator::by_company(records);
    let total: f64 = rollups.iter().map(|r| r.total_revenue).sum();

    rollups
        .into_iter()
        .map(|r| RevenueShare {
            share: if total > 0.0 {
                r.total_revenue / total
            } else {
                0.0
            },
            company: r.key,
            revenue: r.total_revenue,
        })
        .collect()
}

/// Sales per company stacked by year, years ascending. Undated records are
/// left out.
pub fn sales_by_year_and_company(records: &[SalesRecord]) -> Vec<YearStack> {
    let grouped = aggregate(records, |r| r.year().map(|y| (y, r.company.clone())));

    let mut stacks: BTreeMap<i32, YearStack> = BTreeMap::new();
    for ((year, company), rollup) in grouped.groups {
        let stack = stacks.entry(year).or_insert_with(|| YearStack {
            year,
            companies: BTreeMap::new(),
            total_sales: 0,
        });
        stack.total_sales = stack.total_sales.saturating_add(rollup.total_sales);
        stack.companies.insert(company, rollup.total_sales);
    }
    stacks.into_values().collect()
}

/// Monthly rollups per company in chronological order (line chart series).
pub fn monthly_series_by_company(
    records: &[SalesRecord],
) -> BTreeMap<String, Vec<Rollup<MonthKey>>> {
    let grouped = aggregate(records, |r| r.month_key().map(|m| (r.company.clone(), m)));

    let mut series: BTreeMap<String, Vec<Rollup<MonthKey>>> = BTreeMap::new();
    // (company, month) ordering yields each company's months ascending
    for ((company, month), rollup) in grouped.groups {
        series.entry(company).or_default().push(Rollup {
            key: month,
            total_sales: rollup.total_sales,
            total_revenue: rollup.total_revenue,
        });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(date: &str, company: &str, sales: u64, revenue: f64) -> SalesRecord {
        SalesRecord {
            date: date.to_string(),
            company: company.to_string(),
            model: None,
            sales,
            revenue,
            price: None,
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            make_record("2023-11-02", "Honda", 4, 100000.0),
            make_record("2024-01-15", "Toyota", 10, 300000.0),
            make_record("2024-02-03", "Toyota", 20, 600000.0),
            make_record("2024-02-20", "Honda", 0, 0.0),
            make_record("unknown", "Ford", 1, 0.0),
        ]
    }

    // ========== company_metrics() tests ==========

    #[test]
    fn test_company_metrics() {
        let rows = company_metrics(&sample());
        assert_eq!(rows.len(), 3);
        let ford = &rows[0];
        assert_eq!(ford.company, "Ford");
        assert_eq!(ford.avg_price, 0.0);
        let toyota = &rows[2];
        assert_eq!(toyota.total_sales, 30);
        assert_eq!(toyota.avg_price, 30000.0);
    }

    #[test]
    fn test_company_metrics_empty() {
        assert!(company_metrics(&[]).is_empty());
    }

    // ========== revenue_shares() tests ==========

    #[test]
    fn test_revenue_shares_sum_to_one() {
        let shares = revenue_shares(&sample());
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let honda = shares.iter().find(|s| s.company == "Honda").unwrap();
        assert!((honda.share - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_shares_zero_total() {
        let shares = revenue_shares(&[make_record("2024-01", "BMW", 1, 0.0)]);
        assert_eq!(shares[0].share, 0.0);
    }

    // ========== sales_by_year_and_company() tests ==========

    #[test]
    fn test_stacks_by_year() {
        let stacks = sales_by_year_and_company(&sample());
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].year, 2023);
        assert_eq!(stacks[0].companies["Honda"], 4);
        assert_eq!(stacks[1].year, 2024);
        assert_eq!(stacks[1].companies["Toyota"], 30);
        assert_eq!(stacks[1].companies["Honda"], 0);
        assert_eq!(stacks[1].total_sales, 30);
    }

    // ========== monthly_series_by_company() tests ==========

    #[test]
    fn test_monthly_series() {
        let series = monthly_series_by_company(&sample());
        assert_eq!(series.len(), 2);
        let toyota: Vec<String> = series["Toyota"].iter().map(|r| r.key.to_string()).collect();
        assert_eq!(toyota, vec!["2024-01", "2024-02"]);
        let honda: Vec<String> = series["Honda"].iter().map(|r| r.key.to_string()).collect();
        assert_eq!(honda, vec!["2023-11", "2024-02"]);
    }

    #[test]
    fn test_monthly_series_empty() {
        assert!(monthly_series_by_company(&[]).is_empty());
    }
}
