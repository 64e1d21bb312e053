//! Batch processing of a directory of records.

use crate::pipeline::{RecordError, process_record};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use sismo_config::{ArrivalTable, PipelineConfig};
use sismo_io::{FigureSink, JsonLinesSink};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

/// Name of the figure stream written into the output directory.
pub const FIGURES_FILE: &str = "figures.jsonl";

#[derive(Args)]
pub struct ProcessArgs {
    /// Directory of text records
    #[arg(value_name = "DATA_DIR")]
    data_dir: PathBuf,

    /// Pipeline configuration (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra arrival picks (TOML), merged over the built-in table
    #[arg(short, long)]
    arrivals: Option<PathBuf>,

    /// Directory for figures and spectra
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Process records in parallel
    #[arg(long)]
    parallel: bool,
}

/// Sorted list of the regular files in `dir`.
fn record_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read data directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    config.validate()?;
    let periods = config.response.periods()?;

    let mut arrivals = ArrivalTable::builtin();
    if let Some(path) = &args.arrivals {
        arrivals.merge(ArrivalTable::load(path)?);
    }

    let files = record_files(&args.data_dir)?;
    if files.is_empty() {
        anyhow::bail!("no records found in {}", args.data_dir.display());
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("cannot create output directory {}", args.output.display()))?;
    let sink = Mutex::new(JsonLinesSink::create(args.output.join(FIGURES_FILE))?);

    println!(
        "Processing {} record(s) from {}...",
        files.len(),
        args.data_dir.display()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let handle = |path: &PathBuf| -> bool {
        info!(file = %path.display(), "processing");
        let outcome = process_record(path, &config, &periods, &arrivals).and_then(|record| {
            let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
            record.emit(&mut *sink, &args.output)?;
            Ok(record)
        });
        pb.inc(1);
        match outcome {
            Ok(record) => {
                info!(record = %record.id, spectra = record.spectra_count(), "record processed");
                true
            }
            Err(err) => {
                log_skip(path, &err);
                false
            }
        }
    };

    let processed = if args.parallel {
        files.par_iter().filter(|path| handle(path)).count()
    } else {
        files.iter().filter(|path| handle(path)).count()
    };
    pb.finish_with_message("done");

    let skipped = files.len() - processed;
    let figures = sink.into_inner().unwrap_or_else(PoisonError::into_inner).written();

    println!("\nSummary:");
    println!("  Processed: {processed}");
    println!("  Skipped:   {skipped}");
    println!("  Figures:   {figures}");
    println!("  Output:    {}", args.output.display());
    info!(processed, skipped, "done");

    Ok(())
}

fn log_skip(path: &Path, err: &RecordError) {
    error!(
        file = %path.display(),
        stage = err.stage(),
        "skipping record: {err}"
    );
}
