//! Farm Records Library
//!
//! Loads farm inspection records from CSV exports, where each row carries a
//! JSON attribute payload in its `json data` cell, and offers the selection
//! workflow of the inspection dashboard as plain data operations.
//!
//! This library provides tools for:
//! - Parsing embedded attribute payloads without ever failing the caller
//! - Projecting a named attribute ("Severity") into a filterable column
//! - Building farm and severity facets for selection
//! - Stable farm/severity filtering and selection defaulting
//! - Rendering results and planning image exports

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod facets;
pub mod filter;
pub mod loader;
pub mod models;
pub mod payload;
pub mod render;

// Re-export commonly used types
pub use config::{DatePolicy, ExportConfig, LoaderConfig};
pub use error::{FarmError, Result};
pub use export::{ExportPlan, FetchOutcome, ImageFetcher};
pub use facets::{Facets, farm_facet, severity_facet};
pub use filter::{Selection, SeverityFilter, filter_records};
pub use loader::DatasetLoader;
pub use models::{Attribute, Dataset, LoadStats, Record};
pub use payload::{parse_payload, project_attribute};
