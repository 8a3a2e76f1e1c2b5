//! Scans one spooled mail through the hybrid analyzer and prints its verdict.
//!
//! Called by the MTA once per message. Every outcome is a single verdict line
//! on stdout; failures are prefixed with an RFC 3339 timestamp.
//!
//! Usage:
//!   varist-scan --senderip 192.0.2.10 --mailfrom alice@example.org \
//!       --msgid 1qX2-0004 --scanfile /spool/1qX2-0004.eml

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, SecondsFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use varist_ha::analyzer::{
    scan_and_report, AnalyzerConfig, HttpAnalyzer, ResponseLog, ScanFailure, ScanRequest,
};
use varist_ha::{ProcessOptions, Processor, Verdict};

const DEFAULT_CONFIG_FILE: &str = "/workdir/userconf/confremote/varistav.conf";
const DEFAULT_RESPONSE_FILE: &str =
    "/workdir/workspace/var/spool/exim4/hybrid-analyzer/response.log";
const TIMEOUT_ENV: &str = "VARIST_HA_TIMEOUT";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolves the request timeout. An explicit flag wins; an environment value
/// that does not parse falls back to the default instead of aborting, so the
/// MTA still gets a verdict line.
fn timeout_secs(flag: Option<u64>, env: Option<&str>) -> u64 {
    flag.or_else(|| env.and_then(|value| value.parse().ok()))
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

#[derive(Parser, Debug)]
#[command(name = "varist-scan", version)]
#[command(about = "Scan one mail through the Varist hybrid analyzer")]
struct Cli {
    /// Sender IP address
    #[arg(long, default_value = "")]
    senderip: String,

    /// MAIL FROM address
    #[arg(long, default_value = "")]
    mailfrom: String,

    /// Message ID
    #[arg(long, default_value = "")]
    msgid: String,

    /// Path to the file to scan
    #[arg(long, default_value = "")]
    scanfile: String,

    /// Path to the config INI file
    #[arg(long = "config-file", env = "VARIST_CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Path to the response log file
    #[arg(
        long = "response-file",
        env = "VARIST_RESPONSE_FILE",
        default_value = DEFAULT_RESPONSE_FILE
    )]
    response_file: PathBuf,

    /// Analyzer HTTP request timeout in seconds, 0 for none
    /// [env: VARIST_HA_TIMEOUT] [default: 10]
    #[arg(long = "ha-timeout")]
    ha_timeout: Option<u64>,

    /// Print a human-readable trace instead of the verdict line
    #[arg(short)]
    verbose: bool,

    /// Minimum object rating shown in verbose mode
    #[arg(long, default_value_t = 0.0)]
    rating: f64,
}

impl Cli {
    fn request(&self) -> ScanRequest {
        ScanRequest {
            sender_ip: self.senderip.clone(),
            mail_from: self.mailfrom.clone(),
            msg_id: self.msgid.clone(),
            scan_file: self.scanfile.clone(),
        }
    }
}

async fn run<W: Write>(
    cli: &Cli,
    processor: &mut Processor,
    out: &mut W,
    options: &ProcessOptions,
) -> Result<Verdict, ScanFailure> {
    let request = cli.request();
    if !request.is_complete() {
        return Err(ScanFailure::MissingParameters);
    }

    let env_timeout = std::env::var(TIMEOUT_ENV).ok();
    let timeout = timeout_secs(cli.ha_timeout, env_timeout.as_deref());
    let config = AnalyzerConfig::from_ini_file(&cli.config_file)?
        .with_timeout(Duration::from_secs(timeout));
    let analyzer = HttpAnalyzer::new(config)?;
    let log = ResponseLog::new(&cli.response_file);

    scan_and_report(&analyzer, &log, &request, processor, out, options).await
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ProcessOptions::new()
        .with_min_rating(cli.rating)
        .with_verbose(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut processor = Processor::new();

    let written = match run(&cli, &mut processor, &mut out, &options).await {
        Ok(_) if cli.verbose => processor
            .write_category_counts(&mut out)
            .map_err(io::Error::other),
        Ok(_) => Ok(()),
        Err(failure) => {
            tracing::warn!(msg_id = %cli.msgid, error = %failure, "Scan failed");
            let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            writeln!(out, "{} {}", timestamp, failure.verdict()).and_then(|()| out.flush())
        }
    };

    if let Err(e) = written {
        tracing::error!(error = %e, "Failed to write verdict");
    }
}
