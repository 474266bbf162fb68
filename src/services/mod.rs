//! Services for record ingestion, aggregation and derived statistics

pub mod aggregator;
pub mod box_plot;
pub mod config;
pub mod data_loader;
pub mod filter;
pub mod ingestor;
pub mod kpi;
pub mod projections;
pub mod top;
pub mod trend;

pub use aggregator::{aggregate, Aggregator, GroupKey};
pub use box_plot::{box_plot_stats, prices_by_model};
pub use config::AnalyticsConfig;
pub use data_loader::DataLoaderService;
pub use filter::{filter_by_companies, filter_by_range, TimeRange};
pub use ingestor::normalize;
pub use kpi::kpi_summary;
pub use top::{top_along, top_by};
pub use trend::compute_trend;
