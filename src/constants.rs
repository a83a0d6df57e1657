//! Column names, sentinels and formats shared across the crate.

// =============================================================================
// Source Columns
// =============================================================================

/// Farm identifier column
pub const FARM_NAME_COLUMN: &str = "farmName";

/// Image reference column
pub const IMAGE_URL_COLUMN: &str = "Image URL";

/// Embedded attribute payload column (mandatory)
pub const PAYLOAD_COLUMN: &str = "json data";

/// Free-text activity column
pub const ACTIVITY_COLUMN: &str = "activity_record";

/// Inspection date column
pub const DATE_COLUMN: &str = "Date";

/// Columns without which a load cannot proceed
pub const MANDATORY_COLUMNS: &[&str] = &[PAYLOAD_COLUMN, FARM_NAME_COLUMN];

// =============================================================================
// Attributes and Facets
// =============================================================================

/// Attribute projected into the first-class severity column
pub const SEVERITY_ATTRIBUTE: &str = "Severity";

/// Severity facet entry meaning "no severity filter"
pub const SELECT_ALL: &str = "Select All";

// =============================================================================
// Dates
// =============================================================================

/// Day-first date layouts, tried in order. Time-of-day suffixes are tried
/// separately against `DATE_TIME_SUFFIXES`.
pub const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// ISO layouts accepted alongside the day-first ones
pub const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Optional time-of-day suffixes appended to any date layout
pub const DATE_TIME_SUFFIXES: &[&str] = &[" %H:%M:%S", " %H:%M", "T%H:%M:%S", "T%H:%M"];

/// Date layout used inside export filenames
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Export
// =============================================================================

/// Placeholder for records without a parsed date
pub const UNKNOWN_DATE: &str = "unknown_date";

/// Extension given to every exported image
pub const IMAGE_EXTENSION: &str = "jpg";

/// Default manifest filename
pub const DEFAULT_MANIFEST_NAME: &str = "images_manifest.csv";
