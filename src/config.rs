//! Configuration for loading and exporting farm records.
//!
//! Both structures carry sensible defaults and are adjusted through
//! builder-style `with_*` methods, mostly from CLI flags.

use crate::constants::{IMAGE_EXTENSION, SEVERITY_ATTRIBUTE, UNKNOWN_DATE};
use crate::error::{FarmError, Result};
use serde::{Deserialize, Serialize};

/// What to do with a date cell that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatePolicy {
    /// Keep the row, leave its date absent and log a warning
    #[default]
    Lenient,
    /// Abort the whole load
    Strict,
}

/// Dataset loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Policy for malformed date cells
    pub date_policy: DatePolicy,

    /// Attribute name projected into the severity column (exact match)
    pub severity_attribute: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            date_policy: DatePolicy::Lenient,
            severity_attribute: SEVERITY_ATTRIBUTE.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Abort loading on the first malformed date
    pub fn with_strict_dates(mut self) -> Self {
        self.date_policy = DatePolicy::Strict;
        self
    }

    /// Set the date policy explicitly
    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    /// Project a different attribute name as severity
    pub fn with_severity_attribute(mut self, name: impl Into<String>) -> Self {
        self.severity_attribute = name.into();
        self
    }

    /// Reject configurations that could never match anything
    pub fn validate(&self) -> Result<()> {
        if self.severity_attribute.is_empty() {
            return Err(FarmError::Configuration {
                message: "severity attribute name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Image export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Label used in filenames when a record has no date
    pub unknown_date_label: String,

    /// File extension for exported images
    pub image_extension: String,

    /// Show a progress bar while fetching images
    pub show_progress: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            unknown_date_label: UNKNOWN_DATE.to_string(),
            image_extension: IMAGE_EXTENSION.to_string(),
            show_progress: true,
        }
    }
}

impl ExportConfig {
    /// Disable the progress bar (quiet mode, tests)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }
}
