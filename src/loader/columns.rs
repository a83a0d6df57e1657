//! Header-to-index mapping for the inspection CSV
//!
//! Resolves the known columns once from the header row so that per-row access
//! is an index lookup. Mandatory columns are checked here, before any data row
//! is read.

use crate::constants::{
    ACTIVITY_COLUMN, DATE_COLUMN, FARM_NAME_COLUMN, IMAGE_URL_COLUMN, MANDATORY_COLUMNS,
    PAYLOAD_COLUMN,
};
use crate::error::{FarmError, Result};
use csv::{ByteRecord, StringRecord};
use std::collections::HashMap;

/// Column positions for one source file
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub farm_name: usize,
    pub payload: usize,
    pub image_url: Option<usize>,
    pub activity: Option<usize>,
    pub date: Option<usize>,
}

impl ColumnMapping {
    /// Analyze the header row and locate the known columns
    pub fn analyze(headers: &StringRecord) -> Result<Self> {
        let mut name_to_index = HashMap::new();

        for (index, header) in headers.iter().enumerate() {
            let column_name = header.trim_start_matches('\u{feff}').trim().to_string();
            // First occurrence wins for duplicated headers
            name_to_index.entry(column_name).or_insert(index);
        }

        for column in MANDATORY_COLUMNS {
            if !name_to_index.contains_key(*column) {
                let mut available: Vec<&str> = name_to_index.keys().map(String::as_str).collect();
                available.sort_unstable();
                return Err(FarmError::Schema {
                    column: column.to_string(),
                    available: available.join(", "),
                });
            }
        }

        let farm_name = name_to_index[FARM_NAME_COLUMN];
        let payload = name_to_index[PAYLOAD_COLUMN];
        let image_url = name_to_index.get(IMAGE_URL_COLUMN).copied();
        let activity = name_to_index.get(ACTIVITY_COLUMN).copied();
        let date = name_to_index.get(DATE_COLUMN).copied();

        Ok(Self {
            farm_name,
            payload,
            image_url,
            activity,
            date,
        })
    }
}

/// Raw bytes of the cell at `index`, or an empty cell for short rows.
///
/// Data rows are read undecoded; each cell is checked for UTF-8 on its own so
/// one bad byte only affects the row it sits in.
pub fn cell(record: &ByteRecord, index: usize) -> &[u8] {
    record.get(index).unwrap_or_default()
}

/// Cell for an optional column
pub fn optional_cell(record: &ByteRecord, index: Option<usize>) -> &[u8] {
    index.map(|index| cell(record, index)).unwrap_or_default()
}
