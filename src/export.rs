//! Image export planning for a filter result.
//!
//! The crate decides *what* to export and under which name; fetching image
//! bytes and packaging them are collaborator concerns behind the
//! `ImageFetcher` and `ArchiveSink` traits. Each entry is fetched exactly
//! once and a failed fetch means the image is skipped, never retried.

use crate::config::ExportConfig;
use crate::constants::EXPORT_DATE_FORMAT;
use crate::error::{FarmError, Result};
use crate::models::Record;

use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Characters that cannot appear in a filename on common filesystems
fn unsafe_filename_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid regex"))
}

/// Build `<farm>_<date or unknown>_<position + 1>.<ext>`
pub fn export_filename(
    farm_name: &str,
    date: Option<NaiveDateTime>,
    position: usize,
    config: &ExportConfig,
) -> String {
    let farm = unsafe_filename_chars().replace_all(farm_name, "_");
    let date = date
        .map(|date| date.format(EXPORT_DATE_FORMAT).to_string())
        .unwrap_or_else(|| config.unknown_date_label.clone());
    format!(
        "{}_{}_{}.{}",
        farm,
        date,
        position + 1,
        config.image_extension
    )
}

/// One image to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub filename: String,
    pub image_url: String,
}

/// Result of fetching a single image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Image(Vec<u8>),
    Skip(String),
}

/// Source of image bytes
pub trait ImageFetcher {
    /// Fetch the image at `url`. Failures are reported as `Skip`.
    fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Destination for exported images
pub trait ArchiveSink {
    fn add(&mut self, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// Counters for an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub exported: usize,
    pub skipped: Vec<(String, String)>,
}

impl ExportReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Ordered export entries for a filter result
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    entries: Vec<ExportEntry>,
    config: ExportConfig,
}

impl ExportPlan {
    /// Plan one entry per record, numbered by position in `records`
    pub fn for_records(records: &[&Record], config: ExportConfig) -> Self {
        let entries = records
            .iter()
            .enumerate()
            .map(|(position, record)| ExportEntry {
                filename: export_filename(&record.farm_name, record.date, position, &config),
                image_url: record.image_url.clone(),
            })
            .collect();
        Self { entries, config }
    }

    pub fn entries(&self) -> &[ExportEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write a `filename,image_url` CSV manifest
    pub fn write_manifest<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["filename", "image_url"])?;
        for entry in &self.entries {
            csv_writer.write_record([entry.filename.as_str(), entry.image_url.as_str()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Fetch every entry once and hand the bytes to `sink`
    pub fn export(
        &self,
        fetcher: &dyn ImageFetcher,
        sink: &mut dyn ArchiveSink,
    ) -> Result<ExportReport> {
        self.export_with_progress(fetcher, sink, &self.progress_bar())
    }

    fn export_with_progress(
        &self,
        fetcher: &dyn ImageFetcher,
        sink: &mut dyn ArchiveSink,
        progress: &ProgressBar,
    ) -> Result<ExportReport> {
        let mut report = ExportReport::default();

        for entry in &self.entries {
            progress.set_message(entry.filename.clone());
            match fetcher.fetch(&entry.image_url) {
                FetchOutcome::Image(bytes) => {
                    if let Err(error) = sink.add(&entry.filename, &bytes) {
                        progress.finish_and_clear();
                        return Err(error);
                    }
                    report.exported += 1;
                }
                FetchOutcome::Skip(reason) => {
                    warn!("Skipping image {} ({}): {}", entry.filename, entry.image_url, reason);
                    report.skipped.push((entry.filename.clone(), reason));
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        debug!(
            "Export finished: {} written, {} skipped",
            report.exported,
            report.skipped_count()
        );
        Ok(report)
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new(self.entries.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            progress.set_style(style);
        }
        progress
    }
}

/// Reads images from the local filesystem; remote URLs are skipped
#[derive(Debug, Clone, Default)]
pub struct LocalFileFetcher {
    base_dir: Option<PathBuf>,
}

impl LocalFileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `base_dir`
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        let path = match url.strip_prefix("file://") {
            Some(path) => PathBuf::from(path),
            None if url.contains("://") => return None,
            None => PathBuf::from(url),
        };
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path),
        }
    }
}

impl ImageFetcher for LocalFileFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome {
        let Some(path) = self.resolve(url) else {
            return FetchOutcome::Skip(format!("not a local image reference: '{}'", url));
        };
        match fs::read(&path) {
            Ok(bytes) => FetchOutcome::Image(bytes),
            Err(error) => FetchOutcome::Skip(format!("{}: {}", path.display(), error)),
        }
    }
}

/// Writes each image as a file inside a directory
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create the directory if needed
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArchiveSink for DirectorySink {
    fn add(&mut self, filename: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(filename);
        fs::write(&path, bytes).map_err(|error| FarmError::Export {
            path,
            reason: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attribute;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn record(farm: &str, url: &str, date: Option<NaiveDateTime>) -> Record {
        Record {
            row_index: 0,
            farm_name: farm.to_string(),
            image_url: url.to_string(),
            raw_payload: String::new(),
            attributes: vec![Attribute::new("Severity", "High")],
            severity: Some("High".to_string()),
            activity_record: String::new(),
            date,
        }
    }

    fn march_fifth() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn quiet() -> ExportConfig {
        ExportConfig::default().without_progress()
    }

    /// Fetcher that serves a fixed set of URLs and records every call
    struct MapFetcher {
        known: Vec<(&'static str, &'static [u8])>,
        calls: RefCell<Vec<String>>,
    }

    impl ImageFetcher for MapFetcher {
        fn fetch(&self, url: &str) -> FetchOutcome {
            self.calls.borrow_mut().push(url.to_string());
            self.known
                .iter()
                .find(|(known, _)| *known == url)
                .map(|(_, bytes)| FetchOutcome::Image(bytes.to_vec()))
                .unwrap_or_else(|| FetchOutcome::Skip("404".to_string()))
        }
    }

    #[derive(Default)]
    struct MemorySink {
        files: Vec<(String, Vec<u8>)>,
    }

    impl ArchiveSink for MemorySink {
        fn add(&mut self, filename: &str, bytes: &[u8]) -> Result<()> {
            self.files.push((filename.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_filename_with_date() {
        let name = export_filename("Acme", Some(march_fifth()), 0, &quiet());
        assert_eq!(name, "Acme_2024-03-05_1.jpg");
    }

    #[test]
    fn test_filename_unknown_date() {
        let name = export_filename("Acme", None, 4, &quiet());
        assert_eq!(name, "Acme_unknown_date_5.jpg");
    }

    #[test]
    fn test_filename_sanitised() {
        let name = export_filename("North/South: Farm?", None, 0, &quiet());
        assert_eq!(name, "North_South_ Farm__unknown_date_1.jpg");
    }

    #[test]
    fn test_plan_positions_follow_filter_order() {
        let first = record("Acme", "http://a", Some(march_fifth()));
        let second = record("Acme", "http://b", None);
        let plan = ExportPlan::for_records(&[&first, &second], quiet());

        assert_eq!(
            plan.entries(),
            &[
                ExportEntry {
                    filename: "Acme_2024-03-05_1.jpg".to_string(),
                    image_url: "http://a".to_string()
                },
                ExportEntry {
                    filename: "Acme_unknown_date_2.jpg".to_string(),
                    image_url: "http://b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_empty_plan() {
        let plan = ExportPlan::for_records(&[], quiet());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_manifest_csv() {
        let only = record("Acme", "http://a,b", None);
        let plan = ExportPlan::for_records(&[&only], quiet());
        let mut buffer = Vec::new();
        plan.write_manifest(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "filename,image_url\nAcme_unknown_date_1.jpg,\"http://a,b\"\n"
        );
    }

    #[test]
    fn test_export_skips_failures_without_retry() {
        let records = [
            record("Acme", "http://ok", None),
            record("Acme", "http://missing", None),
            record("Acme", "http://ok", None),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let plan = ExportPlan::for_records(&refs, quiet());

        let fetcher = MapFetcher {
            known: vec![("http://ok", &b"jpeg"[..])],
            calls: RefCell::new(Vec::new()),
        };
        let mut sink = MemorySink::default();
        let report = plan.export(&fetcher, &mut sink).unwrap();

        assert_eq!(fetcher.calls.borrow().len(), 3);
        assert_eq!(report.exported, 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].0, "Acme_unknown_date_2.jpg");
        let names: Vec<&str> = sink.files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Acme_unknown_date_1.jpg", "Acme_unknown_date_3.jpg"]);
    }

    struct FailingSink;

    impl ArchiveSink for FailingSink {
        fn add(&mut self, filename: &str, _bytes: &[u8]) -> Result<()> {
            Err(FarmError::Export {
                path: PathBuf::from(filename),
                reason: "disk full".to_string(),
            })
        }
    }

    #[test]
    fn test_export_stops_on_sink_failure() {
        let records = [
            record("Acme", "http://ok", None),
            record("Acme", "http://ok", None),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let plan = ExportPlan::for_records(&refs, quiet());

        let fetcher = MapFetcher {
            known: vec![("http://ok", &b"jpeg"[..])],
            calls: RefCell::new(Vec::new()),
        };
        let progress = ProgressBar::hidden();
        let result = plan.export_with_progress(&fetcher, &mut FailingSink, &progress);

        match result {
            Err(FarmError::Export { path, reason }) => {
                assert_eq!(path, PathBuf::from("Acme_unknown_date_1.jpg"));
                assert_eq!(reason, "disk full");
            }
            other => panic!("expected export error, got {other:?}"),
        }
        assert_eq!(fetcher.calls.borrow().len(), 1);
        assert!(progress.is_finished());
    }

    #[test]
    fn test_local_fetcher_and_directory_sink() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("photo.jpg"), b"bytes").unwrap();

        let fetcher = LocalFileFetcher::new().with_base_dir(temp_dir.path());
        assert_eq!(
            fetcher.fetch("photo.jpg"),
            FetchOutcome::Image(b"bytes".to_vec())
        );
        let absolute = format!("file://{}", temp_dir.path().join("photo.jpg").display());
        assert_eq!(fetcher.fetch(&absolute), FetchOutcome::Image(b"bytes".to_vec()));
        assert!(matches!(fetcher.fetch("https://example.com/x.jpg"), FetchOutcome::Skip(_)));
        assert!(matches!(fetcher.fetch(""), FetchOutcome::Skip(_)));
        assert!(matches!(fetcher.fetch("missing.jpg"), FetchOutcome::Skip(_)));

        let out_dir = temp_dir.path().join("out");
        let mut sink = DirectorySink::create(&out_dir).unwrap();
        sink.add("Acme_unknown_date_1.jpg", b"bytes").unwrap();
        assert_eq!(
            fs::read(sink.dir().join("Acme_unknown_date_1.jpg")).unwrap(),
            b"bytes"
        );
    }
}
