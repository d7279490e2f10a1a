//! Process command - extract contact details from a single resume.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rescan_core::ResumeDocumentParser;

use super::load_config;
use crate::download::{Downloader, filename_from_url};
use crate::output::{OutputFormat, format_candidate};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or DOCX)
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Download the resume from a URL instead of reading a file
    #[arg(long)]
    url: Option<String>,

    /// Bearer token sent with the download
    #[arg(long, env = "RESCAN_BEARER_TOKEN", requires = "url", hide_env_values = true)]
    bearer: Option<String>,

    /// File name of the downloaded resume (default: last URL path segment)
    #[arg(long, requires = "url")]
    filename: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Disable the OCR fallback for scanned PDFs
    #[arg(long)]
    no_ocr: bool,

    /// Show the extraction confidence score
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.no_ocr {
        config.ocr.enabled = false;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let (filename, data) = match (&args.input, &args.url) {
        (Some(input), _) => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            let filename = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());

            pb.set_message("Reading file...");
            (filename, fs::read(input)?)
        }
        (None, Some(url)) => {
            let filename = match args.filename.clone().or_else(|| filename_from_url(url)) {
                Some(name) => name,
                None => anyhow::bail!("Cannot infer a file name from {}; pass --filename", url),
            };

            pb.set_message("Downloading...");
            let downloader = Downloader::new(&config.batch, args.bearer.clone())?;
            (filename, downloader.fetch(url).await?)
        }
        (None, None) => anyhow::bail!("Either an input file or --url is required"),
    };

    info!("Processing resume: {}", filename);
    pb.set_message("Extracting contact details...");

    let parser = ResumeDocumentParser::from_config(&config);
    let candidate = {
        let filename = filename.clone();
        tokio::task::spawn_blocking(move || parser.parse_resume_bytes(&filename, &data)).await?
    };

    pb.finish_and_clear();

    let output = format_candidate(&candidate, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            candidate.confidence * 100.0
        );
        if candidate.ocr_used {
            println!("{} Text was recovered with OCR", style("ℹ").blue());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if candidate.has_errors() {
        anyhow::bail!("Failed to parse {}: {}", filename, candidate.errors.join("; "));
    }

    Ok(())
}
