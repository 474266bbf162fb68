//! Time-range and company filters applied before aggregation

use crate::types::{CompanySelection, SalesRecord};
use chrono::{Months, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Look-back window relative to "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    SixMonths,
    OneYear,
    ThreeYears,
    FiveYears,
    #[default]
    All,
}

impl TimeRange {
    /// Lenient parse: anything unrecognized (including "") means `All`.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "6m" => Self::SixMonths,
            "1y" => Self::OneYear,
            "3y" => Self::ThreeYears,
            "5y" => Self::FiveYears,
            _ => Self::All,
        }
    }

    fn months(self) -> Option<u32> {
        match self {
            Self::SixMonths => Some(6),
            Self::OneYear => Some(12),
            Self::ThreeYears => Some(36),
            Self::FiveYears => Some(60),
            Self::All => None,
        }
    }

    /// Earliest instant kept by this range, `None` for `All`.
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (Aug 31 minus 6 months is Feb 28/29).
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        now.checked_sub_months(Months::new(self.months()?))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
            Self::ThreeYears => "3y",
            Self::FiveYears => "5y",
            Self::All => "all",
        };
        f.write_str(s)
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

/// Keep records dated on or after `now - range`.
///
/// `All` is a pass-through. Records whose date does not parse are dropped
/// for every other range.
pub fn filter_by_range(
    records: &[SalesRecord],
    range: TimeRange,
    now: NaiveDateTime,
) -> Vec<SalesRecord> {
    let Some(cutoff) = range.cutoff(now) else {
        return records.to_vec();
    };

    let kept: Vec<SalesRecord> = records
        .iter()
        .filter(|r| r.sale_datetime().is_some_and(|dt| dt >= cutoff))
        .cloned()
        .collect();

    tracing::debug!(
        range = %range,
        cutoff = %cutoff,
        kept = kept.len(),
        dropped = records.len() - kept.len(),
        "applied time range"
    );
    kept
}

/// Keep records whose company is selected.
pub fn filter_by_companies(
    records: &[SalesRecord],
    selection: &CompanySelection,
) -> Vec<SalesRecord> {
    match selection {
        CompanySelection::All => records.to_vec(),
        CompanySelection::Only(_) => records
            .iter()
            .filter(|r| selection.contains(&r.company))
            .cloned()
            .collect(),
    }
}
