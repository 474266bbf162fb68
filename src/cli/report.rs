//! Plain-text rendering of analytics results

use crate::services::projections::{CompanyMetrics, RevenueShare, YearStack};
use crate::services::GroupKey;
use crate::types::{
    FiveNumberSummary, KpiSummary, Metric, MonthKey, Rollup, TopEntity, TrendSummary,
};
use std::collections::BTreeMap;
use std::fmt::Write;

pub const NO_DATA: &str = "No data available\n";

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Whole-dollar amount with separators (e.g., 31333.4 -> "$31,333")
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 {
        format!("-${}", format_number((-rounded) as u64))
    } else {
        format!("${}", format_number(rounded as u64))
    }
}

/// Price with cents, used where whole dollars would hide the spread
pub fn format_price(value: f64) -> String {
    let cents = (value.max(0.0) * 100.0).round() as u64;
    format!("${}.{:02}", format_number(cents / 100), cents % 100)
}

pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Share bar with filled/empty blocks, e.g. 0.5 at width 10 -> "█████░░░░░"
pub fn format_share_bar(share: f64, width: usize) -> String {
    let filled = ((share * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn top_label(top: &TopEntity) -> String {
    if top.is_none() {
        "None".to_string()
    } else {
        format!("{} ({})", top.key, format_number(top.value as u64))
    }
}

pub fn kpi_text(kpi: Option<&KpiSummary>) -> String {
    let Some(kpi) = kpi else {
        return NO_DATA.to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Total sales      {}", format_number(kpi.total_sales));
    let _ = writeln!(
        out,
        "Total revenue    {}",
        format_currency(kpi.total_revenue)
    );
    let _ = writeln!(out, "Average price    {}", format_currency(kpi.avg_price));
    let _ = writeln!(
        out,
        "Sales trend      {}",
        format_pct(kpi.trend.sales_trend_pct)
    );
    let _ = writeln!(
        out,
        "Revenue trend    {}",
        format_pct(kpi.trend.revenue_trend_pct)
    );
    let _ = writeln!(out, "Top company      {}", top_label(&kpi.top_company));
    let _ = writeln!(out, "Top model        {}", top_label(&kpi.top_model));
    let _ = writeln!(out, "Top year         {}", top_label(&kpi.top_year));
    out
}

pub fn rollup_table(rollups: &[Rollup<String>], dimension: GroupKey, skipped: usize) -> String {
    if rollups.is_empty() {
        return NO_DATA.to_string();
    }

    let width = rollups
        .iter()
        .map(|r| r.key.chars().count())
        .max()
        .unwrap_or(0)
        .max(dimension.to_string().len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>12}  {:>16}",
        dimension.to_string(),
        "Sales",
        "Revenue"
    );
    for r in rollups {
        let key = if r.key.is_empty() {
            "(none)"
        } else {
            r.key.as_str()
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:>12}  {:>16}",
            key,
            format_number(r.total_sales),
            format_currency(r.total_revenue)
        );
    }
    if skipped > 0 {
        let _ = writeln!(out, "({} records without a {} key)", skipped, dimension);
    }
    out
}

pub fn trend_text(trend: &TrendSummary) -> String {
    format!(
        "Sales trend      {}\nRevenue trend    {}\n",
        format_pct(trend.sales_trend_pct),
        format_pct(trend.revenue_trend_pct)
    )
}

pub fn top_text(top: &TopEntity, dimension: GroupKey, metric: Metric) -> String {
    if top.is_none() {
        return NO_DATA.to_string();
    }
    let value = match metric {
        Metric::Sales => format_number(top.value as u64),
        Metric::Revenue => format_currency(top.value),
    };
    format!("Top {}: {} ({})\n", dimension, top.key, value)
}

pub fn box_plot_table(stats: &[FiveNumberSummary<String>]) -> String {
    if stats.is_empty() {
        return "No price data available\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>12} {:>12} {:>12} {:>12} {:>12}  Outliers",
        "Model", "Min", "Q1", "Median", "Q3", "Max"
    );
    for s in stats {
        let outliers: Vec<String> = s.outliers.iter().map(|p| format_price(*p)).collect();
        let _ = writeln!(
            out,
            "{:<16} {:>12} {:>12} {:>12} {:>12} {:>12}  {}",
            s.group,
            format_price(s.min),
            format_price(s.q1),
            format_price(s.median),
            format_price(s.q3),
            format_price(s.max),
            outliers.join(", ")
        );
    }
    out
}

pub fn metrics_table(rows: &[CompanyMetrics]) -> String {
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>12} {:>16} {:>12}",
        "Company",
        "Total Sales",
        "Total Revenue",
        "Avg. Price"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<16} {:>12} {:>16} {:>12}",
            row.company,
            format_number(row.total_sales),
            format_currency(row.total_revenue),
            format_currency(row.avg_price)
        );
    }
    out
}

pub fn shares_table(shares: &[RevenueShare]) -> String {
    if shares.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    for s in shares {
        let _ = writeln!(
            out,
            "{:<16} {} {:>6} {:>16}",
            s.company,
            format_share_bar(s.share, 20),
            format_pct(s.share * 100.0),
            format_currency(s.revenue)
        );
    }
    out
}

pub fn stacked_table(stacks: &[YearStack]) -> String {
    if stacks.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    for stack in stacks {
        let _ = writeln!(
            out,
            "{}  total {}",
            stack.year,
            format_number(stack.total_sales)
        );
        for (company, sales) in &stack.companies {
            let _ = writeln!(out, "  {:<16} {:>12}", company, format_number(*sales));
        }
    }
    out
}

pub fn series_text(series: &BTreeMap<String, Vec<Rollup<MonthKey>>>) -> String {
    if series.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    for (company, months) in series {
        let _ = writeln!(out, "{}", company);
        for m in months {
            let _ = writeln!(
                out,
                "  {}  {:>12}  {:>16}",
                m.key,
                format_number(m.total_sales),
                format_currency(m.total_revenue)
            );
        }
    }
    out
}
