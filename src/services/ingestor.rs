//! Record ingestion: loosely-typed task rows to canonical sales records
//!
//! Field fallbacks, first present non-null value wins:
//! - sales: `total_sales`, then `sales`
//! - revenue: `total_revenue`, then `revenue`
//! - date: `date`, then `sale_date`
//!
//! A present but malformed value does not fall through to the next field;
//! it coerces to zero like every other unusable number.

use crate::types::{RawRecord, SalesRecord};
use serde_json::Value;

/// Normalize raw rows. Never drops a row and never fails.
pub fn normalize(raw: &[RawRecord]) -> Vec<SalesRecord> {
    raw.iter().map(normalize_one).collect()
}

pub fn normalize_one(raw: &RawRecord) -> SalesRecord {
    let sales = first_present(&raw.total_sales, &raw.sales)
        .and_then(coerce_number)
        .map(non_negative)
        .unwrap_or(0.0);
    let revenue = first_present(&raw.total_revenue, &raw.revenue)
        .and_then(coerce_number)
        .map(non_negative)
        .unwrap_or(0.0);

    SalesRecord {
        date: first_present(&raw.date, &raw.sale_date)
            .map(text_of)
            .unwrap_or_default(),
        company: raw.company.as_ref().map(text_of).unwrap_or_default(),
        model: raw
            .model
            .as_ref()
            .map(text_of)
            .filter(|m| !m.trim().is_empty()),
        // f64 -> u64 truncates toward zero and saturates
        sales: sales as u64,
        revenue,
        price: raw
            .price
            .as_ref()
            .and_then(coerce_number)
            .filter(|p| p.is_finite()),
    }
}

fn first_present<'a>(primary: &'a Option<Value>, fallback: &'a Option<Value>) -> Option<&'a Value> {
    match primary {
        Some(v) if !v.is_null() => Some(v),
        _ => fallback.as_ref().filter(|v| !v.is_null()),
    }
}

/// Numeric reading of a JSON value, `None` when it has none.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn non_negative(n: f64) -> f64 {
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
