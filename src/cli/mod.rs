pub mod report;

use crate::logging;
use crate::services::projections::{
    company_metrics, monthly_series_by_company, revenue_shares, sales_by_year_and_company,
};
use crate::services::{
    box_plot_stats, compute_trend, filter_by_companies, filter_by_range, kpi_summary, normalize,
    prices_by_model, top_along, Aggregator, AnalyticsConfig, DataLoaderService, GroupKey, TimeRange,
};
use crate::types::{parse_sale_datetime, CompanySelection, Metric, Rollup, SalesRecord};
use chrono::{NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Sales analytics over task record exports
#[derive(Parser)]
#[command(name = "salescope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Time range: 6m, 1y, 3y, 5y or all
    #[arg(long, global = true)]
    range: Option<String>,

    /// Comma-separated companies to include
    #[arg(long, global = true, value_delimiter = ',')]
    companies: Vec<String>,

    /// Reference time for --range (RFC 3339 or YYYY-MM-DD), defaults to now
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline KPIs: totals, average price, tops and trend
    Kpi { input: PathBuf },

    /// Summed sales and revenue per group
    Rollup {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = GroupKey::Month)]
        by: GroupKey,
    },

    /// Month-over-month trend of the two latest months
    Trend { input: PathBuf },

    /// Group with the highest total
    Top {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = GroupKey::Company)]
        by: GroupKey,
        #[arg(long, value_enum, default_value_t = Metric::Sales)]
        metric: Metric,
    },

    /// Price distribution per model (box-plot statistics)
    Boxplot { input: PathBuf },

    /// Per-company sales, revenue and average price
    Metrics { input: PathBuf },

    /// Per-company share of revenue
    Shares { input: PathBuf },

    /// Sales per company stacked by year
    Stacked { input: PathBuf },

    /// Monthly series per company
    Series { input: PathBuf },
}

#[derive(Serialize)]
struct RollupReport {
    by: GroupKey,
    rollups: Vec<Rollup<String>>,
    skipped: usize,
}

fn parse_now(text: &str) -> Result<NaiveDateTime, String> {
    parse_sale_datetime(text).ok_or_else(|| format!("invalid date '{}'", text))
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = AnalyticsConfig::load(self.config.as_deref())?;
        logging::init(&config.log_filter);

        match &self.command {
            Commands::Kpi { input } => {
                let records = self.load_records(input, &config)?;
                let kpi = kpi_summary(&records);
                self.emit(&kpi, |k| report::kpi_text(k.as_ref()))
            }
            Commands::Rollup { input, by } => {
                let records = self.load_records(input, &config)?;
                let grouped = Aggregator::by_dimension(&records, *by);
                let skipped = grouped.skipped;
                let result = RollupReport {
                    by: *by,
                    rollups: grouped.into_rollups(),
                    skipped,
                };
                self.emit(&result, |r| report::rollup_table(&r.rollups, r.by, r.skipped))
            }
            Commands::Trend { input } => {
                let records = self.load_records(input, &config)?;
                let trend = compute_trend(&Aggregator::by_month(&records));
                self.emit(&trend, report::trend_text)
            }
            Commands::Top { input, by, metric } => {
                let records = self.load_records(input, &config)?;
                let top = top_along(&records, *by, *metric);
                self.emit(&top, |t| report::top_text(t, *by, *metric))
            }
            Commands::Boxplot { input } => {
                let records = self.load_records(input, &config)?;
                let stats: Vec<_> = box_plot_stats(&prices_by_model(&records))
                    .into_values()
                    .collect();
                self.emit(&stats, |s| report::box_plot_table(s))
            }
            Commands::Metrics { input } => {
                let records = self.load_records(input, &config)?;
                self.emit(&company_metrics(&records), |m| report::metrics_table(m))
            }
            Commands::Shares { input } => {
                let records = self.load_records(input, &config)?;
                self.emit(&revenue_shares(&records), |s| report::shares_table(s))
            }
            Commands::Stacked { input } => {
                let records = self.load_records(input, &config)?;
                self.emit(&sales_by_year_and_company(&records), |s| {
                    report::stacked_table(s)
                })
            }
            Commands::Series { input } => {
                let records = self.load_records(input, &config)?;
                self.emit(&monthly_series_by_company(&records), report::series_text)
            }
        }
    }

    fn time_range(&self, config: &AnalyticsConfig) -> TimeRange {
        self.range
            .as_deref()
            .map(TimeRange::parse)
            .unwrap_or(config.default_range)
    }

    fn company_selection(&self, config: &AnalyticsConfig) -> CompanySelection {
        if self.companies.is_empty() {
            config.company_selection()
        } else {
            CompanySelection::from_list(&self.companies)
        }
    }

    /// Load, normalize, then narrow by time range and company selection
    fn load_records(
        &self,
        input: &Path,
        config: &AnalyticsConfig,
    ) -> anyhow::Result<Vec<SalesRecord>> {
        let raw = DataLoaderService::new(input).load()?;
        let records = normalize(&raw);

        let now = self.now.unwrap_or_else(|| Utc::now().naive_utc());
        let records = filter_by_range(&records, self.time_range(config), now);
        let records = filter_by_companies(&records, &self.company_selection(config));

        tracing::debug!(
            input = %input.display(),
            raw = raw.len(),
            kept = records.len(),
            "records loaded"
        );
        Ok(records)
    }

    fn emit<T: Serialize>(
        &self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", render(value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_kpi() {
        let cli = Cli::try_parse_from(["salescope", "kpi", "records.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Kpi { .. }));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["salescope"]).is_err());
    }

    #[test]
    fn test_cli_parse_rollup_default_month() {
        let cli = Cli::try_parse_from(["salescope", "rollup", "r.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Rollup { by: GroupKey::Month, .. }));
    }

    #[test]
    fn test_cli_parse_top_options() {
        let cli = Cli::try_parse_from([
            "salescope", "top", "r.json", "--by", "model", "--metric", "revenue", "--json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Top {
                by: GroupKey::Model,
                metric: Metric::Revenue,
                ..
            }
        ));
        assert!(cli.json);
    }

    #[test]
    fn test_cli_parse_filters() {
        let cli = Cli::try_parse_from([
            "salescope",
            "trend",
            "r.json",
            "--range",
            "1y",
            "--companies",
            "Toyota, Honda",
            "--now",
            "2024-06-30",
        ])
        .unwrap();
        let config = AnalyticsConfig::default();
        assert_eq!(cli.time_range(&config), TimeRange::OneYear);
        let selection = cli.company_selection(&config);
        assert!(selection.contains("Toyota"));
        assert!(selection.contains("Honda"));
        assert!(!selection.contains("Ford"));
        assert_eq!(cli.now.unwrap().to_string(), "2024-06-30 00:00:00");
    }

    #[test]
    fn test_cli_blank_companies_select_all() {
        let cli = Cli::try_parse_from(["salescope", "kpi", "r.json", "--companies", ""]).unwrap();
        let selection = cli.company_selection(&AnalyticsConfig::default());
        assert_eq!(selection, CompanySelection::All);
        assert!(selection.contains(""));
        assert!(selection.contains("Ford"));
    }

    #[test]
    fn test_cli_rejects_bad_now() {
        let result = Cli::try_parse_from(["salescope", "kpi", "r.json", "--now", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_range_falls_back_to_config() {
        let cli = Cli::try_parse_from(["salescope", "kpi", "r.json"]).unwrap();
        let config = AnalyticsConfig {
            default_range: TimeRange::FiveYears,
            ..AnalyticsConfig::default()
        };
        assert_eq!(cli.time_range(&config), TimeRange::FiveYears);
        assert_eq!(cli.company_selection(&config), CompanySelection::All);
    }
}
