//! Dashboard KPI summary built from the aggregation primitives

use crate::services::aggregator::{Aggregator, GroupKey};
use crate::services::top::{top_along, top_by};
use crate::services::trend::compute_trend;
use crate::types::{KpiSummary, Metric, SalesRecord};

/// Headline figures for a record set, `None` when there are no records.
pub fn kpi_summary(records: &[SalesRecord]) -> Option<KpiSummary> {
    if records.is_empty() {
        return None;
    }

    let total_sales = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.sales));
    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();

    Some(KpiSummary {
        total_sales,
        total_revenue,
        avg_price: average_price(total_sales, total_revenue).round(),
        top_model: top_by(&Aggregator::by_model(records), Metric::Sales),
        top_year: top_by(&Aggregator::by_year(records), Metric::Sales),
        top_company: top_along(records, GroupKey::Company, Metric::Sales),
        trend: compute_trend(&Aggregator::by_month(records)),
    })
}

/// `revenue / sales`, 0 without sales
pub fn average_price(sales: u64, revenue: f64) -> f64 {
    if sales == 0 {
        0.0
    } else {
        revenue / sales as f64
    }
}
