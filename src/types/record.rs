//! Sales record types and the derived aggregates built from them

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Key reported by [`TopEntity`] when no group has a positive value.
pub const NONE_KEY: &str = "None";

/// One loosely-typed row as delivered by the task API.
///
/// Every field is optional and may carry any JSON type; numbers frequently
/// arrive as strings. Interpretation happens in the ingestor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub sale_date: Option<Value>,
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub sales: Option<Value>,
    #[serde(default)]
    pub total_sales: Option<Value>,
    #[serde(default)]
    pub revenue: Option<Value>,
    #[serde(default)]
    pub total_revenue: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
}

impl RawRecord {
    /// Field-by-field read of a JSON object. Unknown keys are ignored and
    /// nulls count as missing.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let field = |name: &str| map.get(name).filter(|v| !v.is_null()).cloned();
        Self {
            date: field("date"),
            sale_date: field("sale_date"),
            company: field("company"),
            model: field("model"),
            sales: field("sales"),
            total_sales: field("total_sales"),
            revenue: field("revenue"),
            total_revenue: field("total_revenue"),
            price: field("price"),
        }
    }
}

/// Canonical sale observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    /// Original date text; parsed on demand by date-bucketed consumers.
    pub date: String,
    pub company: String,
    pub model: Option<String>,
    pub sales: u64,
    pub revenue: f64,
    pub price: Option<f64>,
}

impl SalesRecord {
    pub fn sale_datetime(&self) -> Option<NaiveDateTime> {
        parse_sale_datetime(&self.date)
    }

    pub fn month_key(&self) -> Option<MonthKey> {
        let dt = self.sale_datetime()?;
        Some(MonthKey::from_date(dt.date()))
    }

    pub fn year(&self) -> Option<i32> {
        self.sale_datetime().map(|dt| dt.year())
    }

    /// Per-unit price: the record's own `price` when set and non-zero,
    /// otherwise `revenue / sales`. Only strictly positive prices count.
    pub fn unit_price(&self) -> Option<f64> {
        let price = match self.price {
            Some(p) if p != 0.0 && !p.is_nan() => p,
            _ if self.sales > 0 => self.revenue / self.sales as f64,
            _ => return None,
        };
        (price.is_finite() && price > 0.0).then_some(price)
    }
}

fn partial_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{1,2})(?:-(\d{1,2}))?$").expect("valid regex")
    })
}

/// Parse the date forms seen in task records.
///
/// Accepts `YYYY-MM`, `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.f]` (or with
/// a space separator) and RFC 3339 timestamps, which are converted to UTC.
/// Partial dates resolve to midnight on the first day of the period.
pub fn parse_sale_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    let caps = partial_date_regex().captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = match caps.get(3) {
        Some(d) => d.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Calendar month bucket. Orders chronologically, displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Summed sales and revenue for one group key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Rollup<K> {
    pub key: K,
    pub total_sales: u64,
    pub total_revenue: f64,
}

impl<K> Rollup<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            total_sales: 0,
            total_revenue: 0.0,
        }
    }

    pub fn add(&mut self, record: &SalesRecord) {
        self.total_sales = self.total_sales.saturating_add(record.sales);
        self.total_revenue += record.revenue;
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sales => self.total_sales as f64,
            Metric::Revenue => self.total_revenue,
        }
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<K: Ord> {
    pub groups: BTreeMap<K, Rollup<K>>,
    /// Records the key function could not place (no model, bad date, ...)
    pub skipped: usize,
}

impl<K: Ord> Default for Grouped<K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
            skipped: 0,
        }
    }
}

impl<K: Ord> Grouped<K> {
    /// Rollups in ascending key order
    pub fn into_rollups(self) -> Vec<Rollup<K>> {
        self.groups.into_values().collect()
    }

    pub fn total_sales(&self) -> u64 {
        self.groups
            .values()
            .fold(0u64, |acc, r| acc.saturating_add(r.total_sales))
    }

    pub fn total_revenue(&self) -> f64 {
        self.groups.values().map(|r| r.total_revenue).sum()
    }
}

/// Which summed value a selection or ranking looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Sales,
    Revenue,
}

/// Box-plot statistics for one group's prices.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FiveNumberSummary<G> {
    pub group: G,
    /// Lower whisker: smallest observed price inside the lower fence
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Upper whisker: largest observed price inside the upper fence
    pub max: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outliers: Vec<f64>,
}

/// Month-over-month change between the two most recent buckets, in percent.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct TrendSummary {
    pub sales_trend_pct: f64,
    pub revenue_trend_pct: f64,
}

/// Winning group of a top-by selection.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopEntity {
    pub key: String,
    pub value: f64,
}

impl TopEntity {
    pub fn none() -> Self {
        Self {
            key: NONE_KEY.to_string(),
            value: 0.0,
        }
    }

    /// True for the "no data" sentinel
    pub fn is_none(&self) -> bool {
        self.key == NONE_KEY && self.value == 0.0
    }
}

/// Headline figures for the analytics dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KpiSummary {
    pub total_sales: u64,
    pub total_revenue: f64,
    /// Rounded `total_revenue / total_sales`, 0 without sales
    pub avg_price: f64,
    pub top_model: TopEntity,
    pub top_year: TopEntity,
    pub top_company: TopEntity,
    pub trend: TrendSummary,
}
