//! Command-line interface components.

use crate::config::{ExportConfig, LoaderConfig};
use crate::render::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "farm-records")]
#[command(about = "Browse, filter and export farm inspection records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Abort when a date cell cannot be parsed instead of leaving it empty
    #[arg(long, global = true)]
    pub strict_dates: bool,

    /// Attribute name projected as the severity level
    #[arg(long, global = true, default_value = crate::constants::SEVERITY_ATTRIBUTE)]
    pub severity_attribute: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the selectable farms and severity levels
    Facets {
        /// Inspection CSV file
        #[arg(value_name = "CSV")]
        source: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the records for one farm, optionally narrowed to a severity
    Show {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write the image manifest for a selection, optionally copying local images
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Manifest CSV path (defaults to ./images_manifest.csv)
        #[arg(short, long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Copy images referenced by local path or file:// URL into this directory
        #[arg(long, value_name = "DIR")]
        images: Option<PathBuf>,
    },
}

/// Source and selection shared by `show` and `export`
#[derive(ClapArgs, Debug)]
pub struct SelectionArgs {
    /// Inspection CSV file
    #[arg(value_name = "CSV")]
    pub source: PathBuf,

    /// Farm to show (defaults to the first farm in the file)
    #[arg(short, long)]
    pub farm: Option<String>,

    /// Severity level, or "Select All" for every level
    #[arg(short, long)]
    pub severity: Option<String>,
}

impl Args {
    /// Loader configuration implied by the global flags
    pub fn loader_config(&self) -> LoaderConfig {
        let config = LoaderConfig::default().with_severity_attribute(&self.severity_attribute);
        if self.strict_dates {
            config.with_strict_dates()
        } else {
            config
        }
    }

    /// Export configuration implied by the global flags
    pub fn export_config(&self) -> ExportConfig {
        if self.quiet {
            ExportConfig::default().without_progress()
        } else {
            ExportConfig::default()
        }
    }

    /// Log level for the subscriber's default filter
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("farm_records={}", log_level)));

    // A subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatePolicy;

    #[test]
    fn test_parse_show_command() {
        let args = Args::parse_from([
            "farm-records",
            "show",
            "farms.csv",
            "--farm",
            "Acme",
            "--severity",
            "High",
            "--format",
            "json",
        ]);
        match args.command {
            Command::Show { selection, format } => {
                assert_eq!(selection.source, PathBuf::from("farms.csv"));
                assert_eq!(selection.farm.as_deref(), Some("Acme"));
                assert_eq!(selection.severity.as_deref(), Some("High"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["farm-records", "facets", "farms.csv", "--strict-dates", "-v"]);
        assert_eq!(args.loader_config().date_policy, DatePolicy::Strict);
        assert_eq!(args.loader_config().severity_attribute, "Severity");
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_export_defaults() {
        let args = Args::parse_from(["farm-records", "export", "farms.csv", "-q"]);
        assert_eq!(args.log_level(), "warn");
        assert!(!args.export_config().show_progress);
        match args.command {
            Command::Export {
                manifest, images, ..
            } => {
                assert!(manifest.is_none());
                assert!(images.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Args::try_parse_from(["farm-records", "facets", "farms.csv", "-v", "-q"]);
        assert!(result.is_err());
    }
}
