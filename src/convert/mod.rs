//! # Conversion Pipeline
//!
//! Turns spreadsheet workbooks into JSON table fixtures. Three entry points
//! share the same core transform:
//!
//! - [`convert`] reads one workbook file,
//! - [`convert_tree`] scans a directory tree and writes a mirrored JSON tree,
//!   isolating per-file failures so one bad workbook cannot abort the batch,
//! - [`fetch`] downloads a workbook over HTTP and converts it in memory.
//!
//! The transform itself is one-shot and deterministic: the first sheet's first
//! row becomes the headers, every following row is zipped positionally against
//! them, and absent cells become empty strings. Re-running a conversion on
//! unchanged input produces an identical document except for the generation
//! timestamp.
mod fetch;

pub use self::fetch::fetch;

use crate::error::BenchtabError;
use crate::spreadsheet::Workbook;
use crate::table::{CellValue, Metadata, Row, Table};
use chrono::{SecondsFormat, Utc};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File extensions scanned in batch mode.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// Spreadsheet applications leave `~$`-prefixed lock files next to open
/// workbooks; the batch scan skips them.
const LOCK_FILE_PREFIX: &str = "~$";

/// Converts a single workbook file into a table.
///
/// # Arguments
/// * `path` - Path to the workbook file
///
/// # Errors
/// * [`BenchtabError::NotFound`] when the file does not exist
/// * [`BenchtabError::EmptyInput`] when the workbook has no sheets or the
///   first sheet parses to zero rows
/// * [`BenchtabError::SpreadsheetError`] when the bytes are not a readable
///   workbook
pub fn convert<P: AsRef<Path>>(path: P) -> Result<Table, BenchtabError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BenchtabError::NotFound(path.to_path_buf()));
    }
    let source = source_path(path);
    let mut workbook = Workbook::open(path)?;
    let sheet = workbook
        .first_sheet_name()
        .ok_or_else(|| BenchtabError::EmptyInput(source.clone()))?;
    let grid = workbook.grid(&sheet)?;
    table_from_grid(grid, source, sheet)
}

/// Builds a table from a sheet grid: first row headers, the rest data rows.
///
/// Each data row is zipped positionally against the headers; absent cells are
/// normalized to empty strings, so every stored row reads cleanly through any
/// header.
pub(crate) fn table_from_grid(
    grid: Vec<Vec<CellValue>>,
    source: String,
    sheet: String,
) -> Result<Table, BenchtabError> {
    let mut rows_2d = grid.into_iter();
    let headers: Vec<String> = match rows_2d.next() {
        Some(header_row) => header_row.iter().map(CellValue::to_string).collect(),
        None => return Err(BenchtabError::EmptyInput(source)),
    };

    let rows: Vec<Row> = rows_2d
        .map(|cells| {
            let mut cells = cells.into_iter();
            headers
                .iter()
                .map(|header| {
                    let value = match cells.next() {
                        Some(CellValue::Empty) | None => CellValue::Text(String::new()),
                        Some(value) => value,
                    };
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    let metadata = Metadata {
        total_rows: rows.len(),
        total_columns: headers.len(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        source,
        sheet,
    };

    Ok(Table {
        headers,
        rows,
        metadata,
    })
}

/// Normalized relative source identifier for a workbook path: relative to the
/// working directory when possible, forward slashes throughout.
fn source_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).map(Path::to_path_buf).ok())
        .unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

/// Writes a table as a two-space-indented JSON document, creating parent
/// directories on demand.
pub fn write_table(table: &Table, path: &Path) -> Result<(), BenchtabError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(table)?;
    fs::write(path, json)?;
    Ok(())
}

/// Outcome counts of a batch conversion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files converted and written
    pub converted: usize,
    /// Files that failed and were skipped
    pub failed: usize,
}

impl BatchReport {
    /// Total number of files the batch attempted.
    pub fn total(&self) -> usize {
        self.converted + self.failed
    }
}

/// Converts every workbook under `input_root` into a mirrored JSON tree under
/// `output_root`.
///
/// Per-file failures are logged, counted, and skipped; the batch continues.
/// Only a missing input root aborts the run.
///
/// # Arguments
/// * `input_root` - Directory tree scanned for workbooks
/// * `output_root` - Root of the mirrored `.json` tree
pub fn convert_tree(input_root: &Path, output_root: &Path) -> Result<BatchReport, BenchtabError> {
    if !input_root.is_dir() {
        return Err(BenchtabError::NotFound(input_root.to_path_buf()));
    }

    let mut report = BatchReport::default();
    for file in list_workbooks(input_root)? {
        let relative = file.strip_prefix(input_root).unwrap_or(&file);
        let target = output_root.join(relative).with_extension("json");
        match convert(&file).and_then(|table| {
            write_table(&table, &target)?;
            Ok(table)
        }) {
            Ok(table) => {
                info!(
                    "{} -> {} ({} rows, {} columns)",
                    file.display(),
                    target.display(),
                    table.metadata.total_rows,
                    table.metadata.total_columns,
                );
                report.converted += 1;
            }
            Err(error) => {
                warn!("{}: {error}", file.display());
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

/// Lists workbook files under a root, sorted for deterministic batch order,
/// excluding `~$` lock files.
fn list_workbooks(root: &Path) -> Result<Vec<PathBuf>, BenchtabError> {
    let mut files = Vec::new();
    for extension in WORKBOOK_EXTENSIONS {
        let pattern = format!("{}/**/*.{extension}", root.display());
        for entry in glob(&pattern)? {
            let path = entry?;
            let is_lock_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(LOCK_FILE_PREFIX))
                .unwrap_or(false);
            if !is_lock_file {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;
    use std::path::Path;

    fn write_fixture(path: &Path) {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write(0, 0, "A").expect("write header");
        worksheet.write(0, 1, "B").expect("write header");
        worksheet.write(1, 0, 1).expect("write cell");
        worksheet.write(1, 1, "x").expect("write cell");
        worksheet.write(2, 0, 2).expect("write cell");
        worksheet.write(2, 1, "").expect("write cell");
        workbook.save(path).expect("save workbook");
    }

    #[test]
    fn round_trip_preserves_headers_and_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fixture.xlsx");
        write_fixture(&path);

        let table = convert(&path).expect("convert");
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("A"), &CellValue::Number(1.0));
        assert_eq!(table.rows[0].get("B"), &CellValue::Text("x".to_owned()));
        assert_eq!(table.rows[1].get("A"), &CellValue::Number(2.0));
        assert_eq!(table.rows[1].get("B"), &CellValue::Text(String::new()));
        assert_eq!(table.metadata.total_rows, 2);
        assert_eq!(table.metadata.total_columns, 2);
        assert_eq!(table.metadata.sheet, "Sheet1");
    }

    #[test]
    fn reconversion_differs_only_in_timestamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fixture.xlsx");
        write_fixture(&path);

        let first = convert(&path).expect("convert");
        let second = convert(&path).expect("convert");
        assert_eq!(first.headers, second.headers);
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.metadata.source, second.metadata.source);
        assert_eq!(first.metadata.sheet, second.metadata.sheet);
        assert_eq!(first.metadata.total_rows, second.metadata.total_rows);
        assert_eq!(first.metadata.total_columns, second.metadata.total_columns);
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = convert(Path::new("does/not/exist.xlsx"));
        assert!(matches!(result, Err(BenchtabError::NotFound(_))));
    }

    #[test]
    fn empty_sheet_is_empty_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.xlsx");
        let mut workbook = XlsxWorkbook::new();
        workbook.add_worksheet();
        workbook.save(&path).expect("save workbook");

        let result = convert(&path);
        assert!(matches!(result, Err(BenchtabError::EmptyInput(_))));
    }

    #[test]
    fn header_only_workbooks_convert_to_zero_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("headers.xlsx");
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write(0, 0, "Model").expect("write header");
        workbook.save(&path).expect("save workbook");

        let table = convert(&path).expect("convert");
        assert_eq!(table.headers, vec!["Model"]);
        assert!(table.rows.is_empty());
        assert_eq!(table.metadata.total_rows, 0);
    }

    #[test]
    fn batch_isolates_per_file_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("public");
        let output = dir.path().join("data");
        fs::create_dir_all(input.join("sub")).expect("create tree");

        write_fixture(&input.join("good.xlsx"));
        write_fixture(&input.join("sub").join("nested.xlsx"));
        fs::write(input.join("bad.xlsx"), b"not a workbook").expect("write junk");
        fs::write(input.join("~$good.xlsx"), b"lock file").expect("write lock file");

        let report = convert_tree(&input, &output).expect("batch");
        assert_eq!(report.converted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 3);
        assert!(output.join("good.json").is_file());
        assert!(output.join("sub").join("nested.json").is_file());
        assert!(!output.join("~$good.json").exists());
        assert!(!output.join("bad.json").exists());
    }

    #[test]
    fn missing_input_root_aborts_the_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = convert_tree(&dir.path().join("missing"), &dir.path().join("out"));
        assert!(matches!(result, Err(BenchtabError::NotFound(_))));
    }

    #[test]
    fn written_artifact_parses_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fixture.xlsx");
        write_fixture(&path);

        let table = convert(&path).expect("convert");
        let target = dir.path().join("out").join("fixture.json");
        write_table(&table, &target).expect("write");

        let text = fs::read_to_string(&target).expect("read artifact");
        let back: Table = serde_json::from_str(&text).expect("parse artifact");
        assert_eq!(back, table);
    }
}
