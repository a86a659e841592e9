//! Command-line converter turning benchmark spreadsheets into the JSON
//! fixtures the table views consume.
//!
//! With no arguments the tool scans the input root for workbooks and writes a
//! mirrored JSON tree, counting successes and failures per file; a bad file is
//! skipped, a missing input root ends the run with exit code 1. A single file
//! argument converts just that file, fatally. `--url` fetches the workbook
//! over HTTP instead.
use anyhow::Result;
use benchtab::convert::{convert, convert_tree, fetch, write_table};
use benchtab::table::Table;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "benchtab")]
#[command(about = "Convert benchmark spreadsheets into JSON table fixtures")]
#[command(version)]
struct Cli {
    /// Convert a single workbook instead of scanning the input tree
    file: Option<PathBuf>,

    /// Fetch a workbook over HTTP and convert it
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,

    /// Root directory scanned for workbooks in batch mode
    #[arg(long, default_value = "public")]
    input: PathBuf,

    /// Root directory of the mirrored JSON tree in batch mode
    #[arg(long, default_value = "src/data")]
    output: PathBuf,

    /// Output file for single-file and fetch modes (stdout when omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(url) = &cli.url {
        let table = fetch(url)?;
        emit(&table, cli.out.as_deref())?;
    } else if let Some(file) = &cli.file {
        let table = convert(file)?;
        emit(&table, cli.out.as_deref())?;
    } else {
        let report = convert_tree(&cli.input, &cli.output)?;
        println!("Done. {}/{} converted.", report.converted, report.total());
    }
    Ok(())
}

/// Writes a converted table to the requested output file, or to stdout.
fn emit(table: &Table, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            write_table(table, path)?;
            info!(
                "{} -> {} ({} rows, {} columns)",
                table.metadata.source,
                path.display(),
                table.metadata.total_rows,
                table.metadata.total_columns,
            );
        }
        None => println!("{}", serde_json::to_string_pretty(table)?),
    }
    Ok(())
}
