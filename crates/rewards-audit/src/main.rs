//! CLI entry point for the rewards data-quality audit.

use anyhow::Result;
use clap::Parser;
use rewards_audit::{Audit, AuditConfig};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "One-shot data-quality audit over brands, receipts and users exports",
    long_about = "Loads brands.json, receipts.json and users.json, then reports missing \
                  values, duplicates, column types, dangling references, outliers, email \
                  formats and categorical values.\n\n\
                  EXAMPLES:\n  \
                  # Audit the exports in the current directory\n  \
                  rewards-audit\n\n  \
                  # Audit another directory with wider fences\n  \
                  rewards-audit --data-dir exports/2021-03 --iqr-multiplier 3\n\n  \
                  # Machine-readable report\n  \
                  rewards-audit --json | jq .references"
)]
struct Args {
    /// Directory holding the dataset files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Brands file name, relative to the data directory
    #[arg(long, default_value = "brands.json")]
    brands: String,

    /// Receipts file name, relative to the data directory
    #[arg(long, default_value = "receipts.json")]
    receipts: String,

    /// Users file name, relative to the data directory
    #[arg(long, default_value = "users.json")]
    users: String,

    /// Tukey fence multiplier for outlier detection
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the report)
    #[arg(short, long)]
    quiet: bool,

    /// Output the report as JSON instead of text
    ///
    /// Disables all logs; only the JSON report is written to stdout.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the report. When `json_output`
/// is true, logging is disabled entirely.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = AuditConfig::builder()
        .data_dir(&args.data_dir)
        .brands_file(&args.brands)
        .receipts_file(&args.receipts)
        .users_file(&args.users)
        .iqr_multiplier(args.iqr_multiplier)
        .build()?;

    info!("Auditing datasets in {}", config.data_dir.display());

    let audit = Audit::builder()
        .config(config)
        .on_progress(|update| {
            debug!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    let report = match audit.run() {
        Ok(report) => report,
        Err(e) => {
            if args.json {
                println!("{}", e.to_json_pretty()?);
            }
            return Err(anyhow::Error::new(e).context("Audit failed"));
        }
    };

    if args.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        println!("{report}");
    }

    Ok(())
}
