//! salescope: analytics aggregation over sales task records
//!
//! Raw task rows are normalized into [`types::SalesRecord`]s, narrowed by
//! time range and company, then rolled up into the series the dashboard
//! charts consume: monthly/yearly/company/model rollups, trend percentages,
//! top entities, KPI summaries and box-plot statistics.

pub mod cli;
pub mod logging;
pub mod services;
pub mod types;
