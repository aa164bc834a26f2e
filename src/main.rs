//! CLI entry point for the player tier rater.
//!
//! Provides subcommands for a full qualification run, an averages-only pass
//! and re-displaying a previously saved tier file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use player_tier_rater::RaterError;
use player_tier_rater::analyzers::analyzer::{AnalyzeOptions, analyze, averages};
use player_tier_rater::analyzers::qualify::ThresholdTable;
use player_tier_rater::output::{read_tier, show_table};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "player_tier_rater")]
#[command(about = "Rate players against dataset averages and fixed thresholds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute averages, classify players into tiers and save both tiers
    Analyze {
        /// Local path, http(s) URL or s3://bucket/key of the player CSV
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Directory the tier CSV files are written to
        #[arg(short, long, default_value = "results")]
        output_dir: PathBuf,

        /// JSON file overriding the Average tier thresholds
        #[arg(long)]
        thresholds: Option<String>,

        /// Worker threads for aggregation and classification
        #[arg(long)]
        threads: Option<usize>,

        /// Optional: S3 bucket to upload tier files and the run summary to
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Key prefix for uploaded objects
        #[arg(long, default_value = "results")]
        s3_prefix: String,

        /// Gzip compress tier files before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Rows of each saved tier to display after writing
        #[arg(long, default_value_t = 100)]
        show: usize,
    },
    /// Print the per-metric averages of a dataset
    Averages {
        /// Local path, http(s) URL or s3://bucket/key of the player CSV
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Worker threads for aggregation
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Display a saved tier file
    Show {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum rows to display
        #[arg(short, long, default_value_t = 100)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/player_tier_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("player_tier_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Analyze {
            source,
            output_dir,
            thresholds,
            threads,
            s3_bucket,
            s3_prefix,
            gzip,
            show,
        } => {
            let thresholds = match thresholds {
                Some(path) => ThresholdTable::load(&path)?,
                None => ThresholdTable::default(),
            };
            let options = AnalyzeOptions {
                output_dir,
                thresholds,
                threads,
                s3_bucket,
                s3_prefix,
                gzip,
                show_rows: show,
            };
            analyze(&source, &options).await
        }
        Commands::Averages { source, threads } => averages(&source, threads).await.map(|_| ()),
        Commands::Show { file, limit } => {
            let table = read_tier(&file)?;
            show_table(&file.display().to_string(), &table, limit);
            Ok(())
        }
    };

    match outcome {
        Ok(()) => {
            info!("Run complete");
            Ok(ExitCode::SUCCESS)
        }
        // Dataset problems end the run with a report, not a crash.
        Err(e) => match e.downcast_ref::<RaterError>() {
            Some(RaterError::MissingFields { missing }) => {
                error!(?missing, "{e}");
                Ok(ExitCode::FAILURE)
            }
            Some(core) => {
                error!(error = %core, "Run aborted");
                Ok(ExitCode::FAILURE)
            }
            None => Err(e),
        },
    }
}
