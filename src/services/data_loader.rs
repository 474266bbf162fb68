//! Loading raw task records from JSON exports
//!
//! Accepts a `.json` file (an array of records, or an object wrapping one
//! under `items`/`records`), a `.jsonl` file with one record per line, or a
//! directory scanned recursively for both.

use crate::types::{AnalyticsError, RawRecord, Result};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const FILE_PATTERNS: [&str; 2] = ["**/*.json", "**/*.jsonl"];

/// Loads raw records from a file or a directory of exports
pub struct DataLoaderService {
    path: PathBuf,
}

impl DataLoaderService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load every record under the configured path.
    ///
    /// A single file propagates its parse error. In a directory, files that
    /// fail to parse are skipped with a warning.
    pub fn load(&self) -> Result<Vec<RawRecord>> {
        if self.path.is_dir() {
            let files = self.collect_files();
            tracing::debug!(dir = %self.path.display(), files = files.len(), "loading directory");
            Ok(parse_files(&files))
        } else {
            parse_file(&self.path)
        }
    }

    /// Export files below the directory, sorted by path
    pub fn collect_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = FILE_PATTERNS
            .iter()
            .flat_map(|pattern| {
                let pattern = self.path.join(pattern);
                glob::glob(&pattern.to_string_lossy())
                    .map(|paths| paths.filter_map(|e| e.ok()).collect::<Vec<_>>())
                    .unwrap_or_default()
            })
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        files
    }
}

/// Parse files in parallel, keeping file order in the output
fn parse_files(files: &[PathBuf]) -> Vec<RawRecord> {
    files
        .par_iter()
        .flat_map(|f| match parse_file(f) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(file = %f.display(), error = %e, "failed to parse export");
                Vec::new()
            }
        })
        .collect()
}

/// Parse one export file, choosing the format by extension
pub fn parse_file(path: &Path) -> Result<Vec<RawRecord>> {
    let is_jsonl = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    if is_jsonl {
        let file = File::open(path)?;
        Ok(parse_jsonl(BufReader::new(file)))
    } else {
        let mut bytes = std::fs::read(path)?;
        parse_json(&mut bytes)
    }
}

/// Parse a JSON document holding an array of records.
///
/// Array elements that are not objects become empty records so that no row
/// is lost; only a document of the wrong overall shape is an error.
pub fn parse_json(bytes: &mut [u8]) -> Result<Vec<RawRecord>> {
    let document: Value =
        simd_json::from_slice(bytes).map_err(|e| AnalyticsError::Parse(e.to_string()))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let wrapped = ["items", "records"]
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                });
            wrapped.ok_or_else(|| {
                AnalyticsError::InvalidInput("object has no `items` or `records` array".into())
            })?
        }
        other => {
            return Err(AnalyticsError::InvalidInput(format!(
                "expected an array of records, found {}",
                json_type_name(&other)
            )))
        }
    };

    Ok(items.into_iter().map(raw_from_value).collect())
}

/// Parse JSON Lines. Blank lines are ignored; malformed lines are skipped
/// with a warning.
pub fn parse_jsonl<R: BufRead>(reader: R) -> Vec<RawRecord> {
    let mut records = Vec::new();

    for (index, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(_) => continue,
        };
        if line.trim().is_empty() {
            continue;
        }

        let mut line_bytes = line.into_bytes();
        match simd_json::from_slice::<Value>(&mut line_bytes) {
            Ok(value) => records.push(raw_from_value(value)),
            Err(e) => tracing::warn!(line = index + 1, error = %e, "skipping malformed line"),
        }
    }

    records
}

fn raw_from_value(value: Value) -> RawRecord {
    let Value::Object(map) = &value else {
        return RawRecord::default();
    };
    match RawRecord::deserialize(&value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "record did not deserialize, reading fields one by one");
            RawRecord::from_map(map)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
