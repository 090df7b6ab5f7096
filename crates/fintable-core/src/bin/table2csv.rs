use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use fintable_core::{
    CsvOptions, ExportOptions, ExportReport, TableKindSelection, extract_html_to_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "table2csv",
    version,
    about = "Export price and dividend tables from saved HTML pages as CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify, standardize and write one CSV per recognized table.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input HTML path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for <type>_<index>.csv files.
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Table kind: auto, price or dividend.
    #[arg(long, default_value = "auto")]
    kind: String,

    /// Export only the classified table at this index.
    #[arg(long)]
    table: Option<usize>,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExportOptions> {
    let kind = TableKindSelection::from_str(&args.kind)
        .map_err(|error| anyhow!("invalid table kind: {error}"))
        .context("failed to parse --kind")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExportOptions {
        kind,
        csv: CsvOptions {
            delimiter: args.delimiter as u8,
        },
        table: args.table,
    })
}

fn log_report(report: &ExportReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} table={:?} count={:?}: {}",
                warning.code, warning.table_index, warning.count, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExportReport> {
    let options = parse_options(args)?;
    let html = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;
    let report = extract_html_to_csv(&html, &options)
        .with_context(|| format!("failed to export tables from '{}'", args.input.display()))?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create '{}'", args.output_dir.display()))?;
    for table in &report.tables {
        let path = args
            .output_dir
            .join(format!("{}_{}.csv", table.table_type, table.index));
        fs::write(&path, &table.csv)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        if args.verbose {
            eprintln!(
                "wrote {} ({} rows, timeframe={})",
                path.display(),
                table.row_count,
                table.timeframe.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(report)
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fintable_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.row_count() > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
