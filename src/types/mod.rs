//! Type definitions for salescope

mod error;
mod record;

pub use error::*;
pub use record::*;

/// Which records a company filter lets through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompanySelection {
    /// No company filtering
    #[default]
    All,
    /// Only the named companies; an empty set selects nothing
    Only(std::collections::BTreeSet<String>),
}

impl CompanySelection {
    /// Build from a list of names.
    ///
    /// Names are trimmed and blank entries dropped; a list with no names
    /// left means "all companies".
    pub fn from_list<I, S>(companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: std::collections::BTreeSet<String> = companies
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    pub fn contains(&self, company: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(company),
        }
    }
}
