//! Terminal and JSON rendering of a filter result
//!
//! Renderers take plain data (a selection and the records it matched) and
//! write to any `io::Write`; they never touch the dataset or the filter.

use crate::facets::Facets;
use crate::filter::Selection;
use crate::models::{Attribute, Record};
use chrono::NaiveDateTime;
use colored::*;
use serde::Serialize;
use std::io::{self, Write};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct RecordView<'a> {
    image: String,
    farm_name: &'a str,
    image_url: &'a str,
    severity: Option<&'a str>,
    attributes: &'a [Attribute],
    activity_record: &'a str,
    date: Option<NaiveDateTime>,
}

impl<'a> From<&'a Record> for RecordView<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            image: image_caption(record),
            farm_name: &record.farm_name,
            image_url: &record.image_url,
            severity: record.severity.as_deref(),
            attributes: &record.attributes,
            activity_record: &record.activity_record,
            date: record.date,
        }
    }
}

#[derive(Serialize)]
struct ResultView<'a> {
    selection: &'a Selection,
    matches: usize,
    records: Vec<RecordView<'a>>,
}

/// Caption shown next to a record's image, numbered from the source row
pub fn image_caption(record: &Record) -> String {
    format!("Image {}", record.row_index + 1)
}

fn display_date(date: Option<NaiveDateTime>) -> String {
    date.map(|date| date.to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Render a filter result in the requested format
pub fn render_records<W: Write>(
    writer: &mut W,
    selection: &Selection,
    records: &[&Record],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(writer, selection, records),
        OutputFormat::Json => render_json(writer, selection, records),
    }
}

/// Human-readable listing of the matched records
pub fn render_text<W: Write>(
    writer: &mut W,
    selection: &Selection,
    records: &[&Record],
) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} | {} {} | {} {}",
        "Farm:".bright_cyan(),
        selection.farm.bright_white().bold(),
        "Severity:".bright_cyan(),
        selection.severity.to_string().bright_white(),
        "Matches:".bright_cyan(),
        records.len().to_string().bright_white().bold()
    )?;

    if records.is_empty() {
        writeln!(writer, "\n{}", "No records match this selection.".bright_yellow())?;
        return Ok(());
    }

    for record in records {
        writeln!(writer)?;
        writeln!(
            writer,
            "{} {}",
            image_caption(record).bright_green().bold(),
            record.image_url
        )?;
        writeln!(writer, "Farm Name: {}", record.farm_name)?;
        writeln!(writer, "Other Information:")?;
        for attribute in &record.attributes {
            writeln!(writer, "  {}: {}", attribute.name, attribute.value)?;
        }
        writeln!(writer, "{}", "Activity".bright_yellow())?;
        writeln!(writer, "  {}", record.activity_record)?;
        writeln!(writer, "{}", "Activity Date".bright_yellow())?;
        writeln!(writer, "  {}", display_date(record.date))?;
    }

    Ok(())
}

/// JSON document with the selection and matched records
pub fn render_json<W: Write>(
    writer: &mut W,
    selection: &Selection,
    records: &[&Record],
) -> io::Result<()> {
    let view = ResultView {
        selection,
        matches: records.len(),
        records: records.iter().map(|record| RecordView::from(*record)).collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &view)?;
    writeln!(writer)
}

/// Listing of both facets
pub fn render_facets<W: Write>(
    writer: &mut W,
    facets: &Facets,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, facets)?;
            writeln!(writer)
        }
        OutputFormat::Text => {
            writeln!(writer, "{}", "Farms".bright_green().bold())?;
            for farm in &facets.farms {
                writeln!(writer, "  {}", farm)?;
            }
            writeln!(writer, "{}", "Severity".bright_green().bold())?;
            for severity in &facets.severities {
                writeln!(writer, "  {}", severity)?;
            }
            Ok(())
        }
    }
}
