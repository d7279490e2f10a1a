//! Batch processing command for multiple resume files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::{StreamExt, stream};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use rescan_core::{DocumentKind, ParsedCandidate, ResumeDocumentParser};

use super::load_config;
use crate::output::{OutputFormat, SummaryWriter, format_candidate};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching resume files (e.g. "resumes/**/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Directory for per-file outputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for per-file outputs
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Summary CSV path (default: timestamped file in the output directory)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of documents processed in parallel (default: batch.max_concurrency)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Disable the OCR fallback for scanned PDFs
    #[arg(long)]
    no_ocr: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.no_ocr {
        config.ocr.enabled = false;
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_resume(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let summary_path = args.summary.clone().unwrap_or_else(|| {
        let name = format!(
            "resume_summary_{}.csv",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        args.output_dir
            .as_ref()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(&name))
    });
    let mut summary = SummaryWriter::create(&summary_path, config.batch.write_batch_size)?;

    let jobs = args.jobs.unwrap_or(config.batch.max_concurrency).max(1);
    debug!("Processing with {} parallel jobs", jobs);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(ResumeDocumentParser::from_config(&config));
    let mut results = stream::iter(files)
        .map(|path| {
            let parser = Arc::clone(&parser);
            async move {
                let candidate = parse_in_background(parser, path.clone()).await;
                (path, candidate)
            }
        })
        .buffered(jobs);

    let mut processed = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    while let Some((path, candidate)) = results.next().await {
        processed += 1;

        if candidate.has_errors() {
            warn!("Failed to process {}: {}", path.display(), candidate.errors.join("; "));
            failed.push((path.clone(), candidate.errors.join("; ")));
        }

        if let Some(ref output_dir) = args.output_dir {
            if let Err(e) = write_output(output_dir, &path, &candidate, args.format) {
                warn!("Failed to write output for {}: {}", path.display(), e);
            }
        }

        summary.push(candidate)?;
        pb.inc(1);
    }

    summary.finish()?;
    pb.finish_with_message("Complete");

    println!(
        "{} Summary written to {}",
        style("✓").green(),
        summary_path.display()
    );
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        processed,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(processed - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

fn is_resume(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(DocumentKind::from_filename)
        .is_some()
}

/// Parse on the blocking pool; a crashed worker still yields an error row.
async fn parse_in_background(parser: Arc<ResumeDocumentParser>, path: PathBuf) -> ParsedCandidate {
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match tokio::task::spawn_blocking(move || parser.parse_file(&path)).await {
        Ok(candidate) => candidate,
        Err(e) => ParsedCandidate::failed(source, format!("Parse error: {}", e)),
    }
}

fn write_output(
    output_dir: &Path,
    path: &Path,
    candidate: &ParsedCandidate,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("resume");
    let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));

    fs::write(&output_path, format_candidate(candidate, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}
