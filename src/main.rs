//! CLI entry point for the deposit rater.
//!
//! Reads a deposits spreadsheet from a file or URL, sums the deposits ending
//! in `.01` per initiator, and prints or exports the totals.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use deposit_rater::config::AppConfig;
use deposit_rater::fetch::{BasicClient, load_upload};
use deposit_rater::output::{
    NO_MATCHES_NOTICE, export_csv, render_failure, render_json, render_metrics, render_summary,
    render_table, write_xlsx,
};
use deposit_rater::{AggregationResult, Outcome, Session, Upload, read_table};
use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "deposit_rater")]
#[command(about = "Sums deposits ending in .01 per initiator", long_about = None)]
struct Cli {
    /// JSON config file with column names and export settings
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a deposits spreadsheet (.xls, .xlsx or .csv)
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// How to print results on stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write results to an Excel file (defaults to the configured file name)
        #[arg(short = 'x', long, value_name = "PATH")]
        export: Option<Option<String>>,

        /// Write results to a CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<String>,

        /// Name of the initiator column
        #[arg(long)]
        initiator_column: Option<String>,

        /// Name of the deposit column
        #[arg(long)]
        deposit_column: Option<String>,
    },
    /// List the column names found in the first sheet
    Columns {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/deposit_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("deposit_rater.log"));

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
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            source,
            format,
            export,
            csv,
            initiator_column,
            deposit_column,
        } => {
            let config = config.with_columns(initiator_column, deposit_column);
            let upload = fetch_upload(&config, &source).await?;

            let mut session = Session::new(config.columns());
            let outcome = session.process(&upload);

            let export = Exports {
                xlsx: export.map(|path| path.unwrap_or_else(|| config.export_file_name.clone())),
                csv,
            };
            report(&outcome, &upload, &config, format, &export)
        }
        Commands::Columns { source } => list_columns(&config, &source).await,
    }
}

struct Exports {
    xlsx: Option<String>,
    csv: Option<String>,
}

async fn fetch_upload(config: &AppConfig, source: &str) -> Result<Upload> {
    let client = BasicClient::new(Duration::from_secs(config.http_timeout_secs))?;
    load_upload(&client, source).await
}

/// Prints the outcome and writes the requested exports.
///
/// A hard failure maps to a failing exit code; "no matches" does not.
#[tracing::instrument(skip_all, fields(upload = %upload.name))]
fn report(
    outcome: &Outcome,
    upload: &Upload,
    config: &AppConfig,
    format: OutputFormat,
    export: &Exports,
) -> Result<ExitCode> {
    let initiator_header = config.initiator_column.as_str();

    match outcome {
        Outcome::Failed(e) => {
            error!(error = %e, "Processing failed");
            eprintln!("{}", render_failure(e));
            return Ok(ExitCode::FAILURE);
        }
        Outcome::NoMatches(result) => {
            warn!("No deposits ending in .01");
            match format {
                OutputFormat::Text => {
                    println!("{NO_MATCHES_NOTICE}\n");
                    print!("{}", render_table(result, initiator_header));
                }
                OutputFormat::Json => println!("{}", render_json(result, &upload.name)?),
            }
            if export.xlsx.is_some() || export.csv.is_some() {
                info!("Nothing to export");
            }
        }
        Outcome::Matched(result) => {
            match format {
                OutputFormat::Text => {
                    println!("{}\n", render_metrics(result));
                    println!("{}\n", render_summary(result));
                    print!("{}", render_table(result, initiator_header));
                }
                OutputFormat::Json => println!("{}", render_json(result, &upload.name)?),
            }
            write_exports(result, initiator_header, export)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn write_exports(result: &AggregationResult, initiator_header: &str, export: &Exports) -> Result<()> {
    if let Some(path) = &export.xlsx {
        write_xlsx(path, result, initiator_header)?;
    }
    if let Some(path) = &export.csv {
        export_csv(path, result, initiator_header)?;
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
async fn list_columns(config: &AppConfig, source: &str) -> Result<ExitCode> {
    let upload = fetch_upload(config, source).await?;

    match read_table(&upload) {
        Ok(table) => {
            info!(columns = table.columns().len(), rows = table.len(), "Header read");
            for column in table.columns() {
                println!("{column}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Read failed");
            eprintln!("Error al leer el archivo: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
