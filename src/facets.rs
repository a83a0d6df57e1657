//! Selectable values for the farm and severity filters
//!
//! Facets are pure derivations of a `Dataset`: distinct values in order of
//! first occurrence. They are cheap to rebuild and hold no state of their own.

use crate::constants::SELECT_ALL;
use crate::models::Dataset;
use serde::Serialize;
use std::collections::HashSet;

/// Both facets of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub farms: Vec<String>,
    pub severities: Vec<String>,
}

impl Facets {
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            farms: farm_facet(dataset),
            severities: severity_facet(dataset),
        }
    }

    pub fn contains_farm(&self, farm: &str) -> bool {
        self.farms.iter().any(|candidate| candidate == farm)
    }

    pub fn contains_severity(&self, severity: &str) -> bool {
        self.severities.iter().any(|candidate| candidate == severity)
    }
}

/// Distinct farm names, first-occurrence order
pub fn farm_facet(dataset: &Dataset) -> Vec<String> {
    distinct_in_order(dataset.iter().map(|record| record.farm_name.as_str()))
}

/// `"Select All"` followed by the distinct present severities
pub fn severity_facet(dataset: &Dataset) -> Vec<String> {
    let mut facet = vec![SELECT_ALL.to_string()];
    facet.extend(distinct_in_order(
        dataset
            .iter()
            .filter_map(|record| record.severity.as_deref()),
    ));
    facet
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
