//! Dataset loading from inspection CSV files.
//!
//! Reads the source table, coerces the `Date` column day-first, parses the
//! `json data` payload of every row and projects the severity attribute.
//!
//! Rows whose payload does not parse are dropped from the dataset. A dropped
//! row never appears in any facet, filter result or export; the only trace it
//! leaves is a debug log line and the `payload_dropped` counter.
//!
//! Cells are decoded one at a time, so invalid UTF-8 is a per-row problem too.
//! A payload that does not decode counts as unparsable. A farm name that does
//! not decode drops the row. Other columns read as empty, and the date goes
//! through the date policy like any other unrecognised value.

pub mod columns;
pub mod dates;

#[cfg(test)]
mod tests;

use self::columns::{ColumnMapping, cell, optional_cell};
use self::dates::parse_day_first;

use crate::config::{DatePolicy, LoaderConfig};
use crate::constants::{
    ACTIVITY_COLUMN, DATE_COLUMN, FARM_NAME_COLUMN, IMAGE_URL_COLUMN, PAYLOAD_COLUMN,
};
use crate::error::{FarmError, Result};
use crate::models::{Dataset, LoadStats, Record};
use crate::payload::{parse_payload, project_attribute};

use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Builds a `Dataset` from a CSV source
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    config: LoaderConfig,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the loader
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Load a dataset from a CSV file on disk
    pub fn load_path(&self, path: &Path) -> Result<Dataset> {
        debug!("Loading farm records from {}", path.display());
        let file = File::open(path)?;
        self.load_reader(file)
    }

    /// Load a dataset from any CSV byte stream
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let start_time = Instant::now();
        self.config.validate()?;

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mapping = ColumnMapping::analyze(&headers)?;

        let mut records = Vec::new();
        let mut stats = LoadStats::default();

        for (row_index, row) in csv_reader.byte_records().enumerate() {
            let row = row?;
            stats.rows_read += 1;

            if let Some(record) = self.build_record(row_index, &row, &mapping, &mut stats)? {
                records.push(record);
            }
        }

        stats.rows_retained = records.len();
        stats.load_duration = start_time.elapsed();

        info!(
            "Loaded {} of {} rows ({} dropped for unparsable payloads, {} without a usable date, {} undecodable cells) in {:.2}s",
            stats.rows_retained,
            stats.rows_read,
            stats.payload_dropped,
            stats.dates_unparsed,
            stats.undecodable_cells,
            stats.load_duration.as_secs_f64()
        );

        Ok(Dataset::new(records, stats))
    }

    /// Turn one CSV row into a record, or `None` if the row is unusable
    fn build_record(
        &self,
        row_index: usize,
        row: &ByteRecord,
        mapping: &ColumnMapping,
        stats: &mut LoadStats,
    ) -> Result<Option<Record>> {
        let date = self.coerce_date(row_index, optional_cell(row, mapping.date), stats)?;

        let payload = decode_cell(row_index, PAYLOAD_COLUMN, cell(row, mapping.payload), stats);
        let Some((raw_payload, attributes)) =
            payload.and_then(|raw| Some((raw, parse_payload(raw)?)))
        else {
            debug!("Dropping data row {}: payload is not an attribute list", row_index);
            stats.payload_dropped += 1;
            return Ok(None);
        };

        let Some(farm_name) =
            decode_cell(row_index, FARM_NAME_COLUMN, cell(row, mapping.farm_name), stats)
        else {
            debug!("Dropping data row {}: farm name is not valid UTF-8", row_index);
            return Ok(None);
        };

        let severity =
            project_attribute(Some(attributes.as_slice()), &self.config.severity_attribute);
        let image_url =
            decode_cell(row_index, IMAGE_URL_COLUMN, optional_cell(row, mapping.image_url), stats)
                .unwrap_or_default();
        let activity_record =
            decode_cell(row_index, ACTIVITY_COLUMN, optional_cell(row, mapping.activity), stats)
                .unwrap_or_default();

        Ok(Some(Record {
            row_index,
            farm_name: farm_name.to_string(),
            image_url: image_url.to_string(),
            raw_payload: raw_payload.to_string(),
            attributes,
            severity,
            activity_record: activity_record.to_string(),
            date,
        }))
    }

    fn coerce_date(
        &self,
        row_index: usize,
        raw: &[u8],
        stats: &mut LoadStats,
    ) -> Result<Option<chrono::NaiveDateTime>> {
        let parsed = match decode_cell(row_index, DATE_COLUMN, raw, stats) {
            Some(value) if value.trim().is_empty() => return Ok(None),
            Some(value) => parse_day_first(value),
            None => None,
        };
        if parsed.is_some() {
            return Ok(parsed);
        }

        let value = String::from_utf8_lossy(raw);
        match self.config.date_policy {
            DatePolicy::Strict => Err(FarmError::DateParse {
                row: row_index,
                value: value.into_owned(),
            }),
            DatePolicy::Lenient => {
                warn!(
                    "Data row {} has an unrecognised date '{}', leaving it empty",
                    row_index, value
                );
                stats.dates_unparsed += 1;
                Ok(None)
            }
        }
    }
}

/// Decode one cell as UTF-8, counting it when it is not
fn decode_cell<'r>(
    row_index: usize,
    column: &str,
    bytes: &'r [u8],
    stats: &mut LoadStats,
) -> Option<&'r str> {
    match std::str::from_utf8(bytes) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!("Data row {} has invalid UTF-8 in '{}': {}", row_index, column, error);
            stats.undecodable_cells += 1;
            None
        }
    }
}
