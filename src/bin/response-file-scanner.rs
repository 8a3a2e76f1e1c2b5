//! Prints a verdict for every record of a response log.
//!
//! Usage:
//!   response-file-scanner /var/spool/exim4/hybrid-analyzer/response.log
//!   response-file-scanner --verbose --rating 50 response.log

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use varist_ha::{ProcessOptions, Processor};

#[derive(Parser, Debug)]
#[command(name = "response-file-scanner", version)]
#[command(about = "Print verdicts for every record of a Varist response log")]
struct Cli {
    /// Print a human-readable trace instead of verdict lines
    #[arg(short, long)]
    verbose: bool,

    /// Minimum object rating shown in verbose mode
    #[arg(long, default_value_t = 0.0)]
    rating: f64,

    /// Response log to read
    path: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.path)
        .with_context(|| format!("Cannot open file: {}", cli.path.display()))?;

    let options = ProcessOptions::new()
        .with_min_rating(cli.rating)
        .with_verbose(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut processor = Processor::new();

    let summary = processor
        .process_stream(BufReader::new(file), &mut out, &options)
        .context("Processing failed")?;
    tracing::debug!(records = summary.records, rejected = summary.rejected, "Log processed");

    if cli.verbose {
        processor.write_category_counts(&mut out)?;
    }

    Ok(())
}
