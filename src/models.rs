//! Core data structures for farm inspection records.
//!
//! A `Dataset` is built once per load and never mutated afterwards; every
//! derived view (facets, filter results, export plans) borrows from it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single `(name, value)` pair from a record's payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One inspection row that survived loading
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Zero-based position among the source's data rows
    pub row_index: usize,
    pub farm_name: String,
    pub image_url: String,
    /// The payload cell exactly as read
    pub raw_payload: String,
    pub attributes: Vec<Attribute>,
    pub severity: Option<String>,
    pub activity_record: String,
    pub date: Option<NaiveDateTime>,
}

/// Counters gathered while loading a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_retained: usize,
    pub payload_dropped: usize,
    pub dates_unparsed: usize,
    /// Cells that were not valid UTF-8, in any column
    pub undecodable_cells: usize,
    pub load_duration: Duration,
}

/// Ordered, immutable collection of records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    stats: LoadStats,
}

impl Dataset {
    pub(crate) fn new(records: Vec<Record>, stats: LoadStats) -> Self {
        Self { records, stats }
    }

    /// Build a dataset from already-loaded records, e.g. a filter result
    pub fn from_records(records: Vec<Record>) -> Self {
        let stats = LoadStats {
            rows_read: records.len(),
            rows_retained: records.len(),
            ..Default::default()
        };
        Self { records, stats }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
