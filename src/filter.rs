//! Farm and severity selection over a loaded dataset
//!
//! Filtering is stable: results keep dataset order and borrow the records.
//! An empty result is an ordinary value that callers render like any other.

use crate::constants::SELECT_ALL;
use crate::facets::Facets;
use crate::models::{Dataset, Record};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Severity dimension of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeverityFilter {
    /// The `"Select All"` sentinel: no severity constraint
    All,
    /// Only records whose severity equals this value exactly
    Only(String),
}

impl SeverityFilter {
    /// Interpret a severity facet entry, mapping the sentinel to `All`
    pub fn from_choice(choice: &str) -> Self {
        if choice == SELECT_ALL {
            Self::All
        } else {
            Self::Only(choice.to_string())
        }
    }

    pub fn matches(&self, severity: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => severity == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(SELECT_ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

impl Serialize for SeverityFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Records of `farm` that pass `severity`, in their original order
pub fn filter_records<'a, I>(records: I, farm: &str, severity: &SeverityFilter) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| record.farm_name == farm && severity.matches(record.severity.as_deref()))
        .collect()
}

impl Dataset {
    /// Records of `farm` that pass `severity`, in dataset order
    pub fn filter(&self, farm: &str, severity: &SeverityFilter) -> Vec<&Record> {
        filter_records(self, farm, severity)
    }
}

/// A resolved farm and severity choice, always drawn from the facets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub farm: String,
    pub severity: SeverityFilter,
}

impl Selection {
    /// Resolve externally supplied choices against the facets.
    ///
    /// A farm outside the farm facet falls back to the first farm; a severity
    /// outside the severity facet falls back to `"Select All"`. Returns `None`
    /// only when there are no farms at all.
    pub fn resolve(facets: &Facets, farm: Option<&str>, severity: Option<&str>) -> Option<Self> {
        let default_farm = facets.farms.first()?;

        let farm = match farm {
            Some(requested) if facets.contains_farm(requested) => requested.to_string(),
            Some(requested) => {
                debug!(
                    "Farm '{}' is not in the dataset, defaulting to '{}'",
                    requested, default_farm
                );
                default_farm.clone()
            }
            None => default_farm.clone(),
        };

        let severity = match severity {
            Some(requested) if facets.contains_severity(requested) => {
                SeverityFilter::from_choice(requested)
            }
            Some(requested) => {
                debug!(
                    "Severity '{}' is not in the dataset, defaulting to '{}'",
                    requested, SELECT_ALL
                );
                SeverityFilter::All
            }
            None => SeverityFilter::All,
        };

        Some(Self { farm, severity })
    }

    /// Apply this selection to a dataset
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Record> {
        dataset.filter(&self.farm, &self.severity)
    }
}
