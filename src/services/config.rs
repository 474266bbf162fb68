//! User configuration for default filters and logging

use crate::services::filter::TimeRange;
use crate::types::{AnalyticsError, CompanySelection, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Range applied when `--range` is not given
    pub default_range: TimeRange,
    /// Companies selected by default; empty selects all
    pub companies: Vec<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_range: TimeRange::All,
            companies: Vec::new(),
            log_filter: "warn".to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// `<config dir>/salescope/config.json`, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "salescope").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is
    /// a config error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| AnalyticsError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| AnalyticsError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn company_selection(&self) -> CompanySelection {
        CompanySelection::from_list(&self.companies)
    }
}
