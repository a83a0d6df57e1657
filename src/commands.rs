//! Subcommand implementations for the farm-records CLI
//!
//! Each command loads the dataset, derives what it needs and hands plain data
//! to the renderer or exporter. Library errors are wrapped with `anyhow`
//! context here.

use crate::cli::{Args, Command, SelectionArgs};
use crate::config::{ExportConfig, LoaderConfig};
use crate::constants::DEFAULT_MANIFEST_NAME;
use crate::export::{DirectorySink, ExportPlan, LocalFileFetcher};
use crate::facets::Facets;
use crate::filter::Selection;
use crate::loader::DatasetLoader;
use crate::models::Dataset;
use crate::render::{OutputFormat, render_facets, render_records};

use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Dispatch to the requested subcommand
pub fn run(args: Args) -> Result<()> {
    let loader_config = args.loader_config();
    let export_config = args.export_config();
    debug!("Loader configuration: {:?}", loader_config);

    match args.command {
        Command::Facets { source, format } => run_facets(&source, loader_config, format),
        Command::Show { selection, format } => run_show(&selection, loader_config, format),
        Command::Export {
            selection,
            manifest,
            images,
        } => run_export(&selection, loader_config, export_config, manifest, images),
    }
}

fn load_dataset(source: &Path, config: LoaderConfig) -> Result<Dataset> {
    DatasetLoader::new()
        .with_config(config)
        .load_path(source)
        .with_context(|| format!("Failed to load farm records from {}", source.display()))
}

fn resolve_selection(args: &SelectionArgs, dataset: &Dataset) -> Option<Selection> {
    let facets = Facets::build(dataset);
    let selection =
        Selection::resolve(&facets, args.farm.as_deref(), args.severity.as_deref());
    if selection.is_none() {
        info!("{} contains no usable records", args.source.display());
    }
    selection
}

/// Print both facets
pub fn run_facets(source: &Path, config: LoaderConfig, format: OutputFormat) -> Result<()> {
    let dataset = load_dataset(source, config)?;
    let facets = Facets::build(&dataset);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_facets(&mut out, &facets, format).context("Failed to write facets")?;
    Ok(())
}

/// Print the records matching a selection
pub fn run_show(args: &SelectionArgs, config: LoaderConfig, format: OutputFormat) -> Result<()> {
    let dataset = load_dataset(&args.source, config)?;
    let Some(selection) = resolve_selection(args, &dataset) else {
        println!("{}", "No farms to show.".bright_yellow());
        return Ok(());
    };

    let records = selection.apply(&dataset);
    debug!(
        "Selection {} / {} matched {} records",
        selection.farm,
        selection.severity,
        records.len()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_records(&mut out, &selection, &records, format).context("Failed to write records")?;
    Ok(())
}

/// Write the image manifest and optionally copy local images
pub fn run_export(
    args: &SelectionArgs,
    loader_config: LoaderConfig,
    export_config: ExportConfig,
    manifest: Option<PathBuf>,
    images: Option<PathBuf>,
) -> Result<()> {
    let dataset = load_dataset(&args.source, loader_config)?;
    let Some(selection) = resolve_selection(args, &dataset) else {
        println!("{}", "No farms to export.".bright_yellow());
        return Ok(());
    };

    let records = selection.apply(&dataset);
    let plan = ExportPlan::for_records(&records, export_config);

    let manifest_path = manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_NAME));
    let file = File::create(&manifest_path)
        .with_context(|| format!("Failed to create manifest {}", manifest_path.display()))?;
    let mut writer = BufWriter::new(file);
    plan.write_manifest(&mut writer)
        .with_context(|| format!("Failed to write manifest {}", manifest_path.display()))?;
    writer.flush()?;

    println!(
        "  {} {} entries to {}",
        "Manifest:".bright_cyan(),
        plan.entries().len().to_string().bright_white().bold(),
        manifest_path.display()
    );
    if plan.is_empty() {
        println!("{}", "No records match this selection.".bright_yellow());
        return Ok(());
    }

    if let Some(images_dir) = images {
        let base_dir = args
            .source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let fetcher = LocalFileFetcher::new().with_base_dir(base_dir);
        let mut sink = DirectorySink::create(&images_dir)
            .with_context(|| format!("Failed to create {}", images_dir.display()))?;

        let report = plan.export(&fetcher, &mut sink)?;
        println!(
            "  {} {} images to {}",
            "Copied:".bright_cyan(),
            report.exported.to_string().bright_white().bold(),
            sink.dir().display()
        );
        if report.skipped_count() > 0 {
            println!(
                "  {} {}",
                "Skipped:".bright_red(),
                report.skipped_count().to_string().bright_red().bold()
            );
        }
    }

    Ok(())
}
