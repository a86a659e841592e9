//! # Spreadsheet Access Module
//!
//! Unified reading of the workbook formats the converter accepts: Excel
//! (`.xlsx`, `.xlsm`, `.xls`, `.xla`), Excel Binary (`.xlsb`) and OpenDocument
//! (`.ods`). The module hides the per-format readers behind a single
//! `Workbook` enum and hands the rest of the crate plain grids of
//! [`CellValue`](crate::table::CellValue) rows, bounded by each sheet's used
//! range, with no type coercion beyond what the source format provides.
use crate::table::CellValue;
use calamine::{
    open_workbook, CellErrorType, Data, Ods, OdsError, Reader, Xls, XlsError, Xlsb, XlsbError,
    Xlsx, XlsxError,
};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use thiserror::Error;

/// Errors raised while opening or reading a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Error in Excel 2007+ format (.xlsx, .xlsm)
    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] XlsxError),

    /// Error in Excel Binary format (.xlsb)
    #[error("Invalid xlsb file format: {0}")]
    InvalidXlsbFileFormat(#[from] XlsbError),

    /// Error in legacy Excel format (.xls, .xla)
    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] XlsError),

    /// Error in OpenDocument format (.ods)
    #[error("Invalid ods file format: {0}")]
    InvalidOdsFileFormat(#[from] OdsError),

    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },
}

/// Type alias for buffered file reader
pub type FileReader = BufReader<File>;

/// Workbook formats the crate can read, detected from a file extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Excel 2007+ format (.xlsx, .xlsm, .xlam)
    Xlsx,
    /// Excel Binary format (.xlsb)
    Xlsb,
    /// Legacy Excel format (.xls, .xla)
    Xls,
    /// OpenDocument format (.ods)
    Ods,
}

impl WorkbookFormat {
    /// Detects the workbook format from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlam" => Some(Self::Xlsx),
            "xlsb" => Some(Self::Xlsb),
            "xls" | "xla" => Some(Self::Xls),
            "ods" => Some(Self::Ods),
            _ => None,
        }
    }
}

/// Wrapper enum over the per-format calamine readers.
///
/// Provides a unified interface for listing sheets and extracting cell grids,
/// abstracting away the differences between the supported formats.
pub enum Workbook<RS: Read + Seek> {
    /// Excel 2007+ reader (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<RS>),
    /// Excel Binary reader (.xlsb)
    Xlsb(Xlsb<RS>),
    /// Legacy Excel reader (.xls, .xla)
    Xls(Xls<RS>),
    /// OpenDocument reader (.ods)
    Ods(Ods<RS>),
}

impl Workbook<FileReader> {
    /// Opens a workbook file, dispatching on its extension.
    ///
    /// # Arguments
    /// * `path` - Path to the workbook file
    ///
    /// # Returns
    /// The appropriate reader, or an error when the extension is not a
    /// supported workbook format or the file cannot be parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SpreadsheetError> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(OsStr::to_str)
            .and_then(WorkbookFormat::from_extension)
            .ok_or_else(|| SpreadsheetError::InvalidFileFormat {
                name: path.to_string_lossy().to_string(),
            })?;
        match format {
            WorkbookFormat::Xlsx => Ok(Self::Xlsx(open_workbook(path)?)),
            WorkbookFormat::Xlsb => Ok(Self::Xlsb(open_workbook(path)?)),
            WorkbookFormat::Xls => Ok(Self::Xls(open_workbook(path)?)),
            WorkbookFormat::Ods => Ok(Self::Ods(open_workbook(path)?)),
        }
    }
}

impl<RS: Read + Seek> Workbook<RS> {
    /// Opens a workbook from an in-memory reader, for content that never
    /// touches the filesystem (the HTTP fetch path).
    ///
    /// # Arguments
    /// * `reader` - Seekable reader positioned at the start of the workbook bytes
    /// * `format` - Workbook format, typically detected from the resource name
    pub fn from_reader(reader: RS, format: WorkbookFormat) -> Result<Self, SpreadsheetError> {
        match format {
            WorkbookFormat::Xlsx => Ok(Self::Xlsx(Xlsx::new(reader)?)),
            WorkbookFormat::Xlsb => Ok(Self::Xlsb(Xlsb::new(reader)?)),
            WorkbookFormat::Xls => Ok(Self::Xls(Xls::new(reader)?)),
            WorkbookFormat::Ods => Ok(Self::Ods(Ods::new(reader)?)),
        }
    }

    /// Returns the names of all sheets in the workbook, in file order.
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Returns the name of the first sheet, the only one the converter reads.
    pub fn first_sheet_name(&self) -> Option<String> {
        self.sheet_names().first().cloned()
    }

    /// Reads a sheet into a dense grid of cell values.
    ///
    /// The grid covers the sheet's used range: every row has the same width
    /// and gaps inside the range come back as [`CellValue::Empty`]. An empty
    /// sheet yields an empty grid, not an error; the caller decides whether
    /// that is acceptable.
    ///
    /// # Arguments
    /// * `sheet_name` - Name of the sheet to read
    pub fn grid(&mut self, sheet_name: &str) -> Result<Vec<Vec<CellValue>>, SpreadsheetError> {
        let range = match self {
            Self::Xlsx(xlsx) => xlsx.worksheet_range(sheet_name)?,
            Self::Xlsb(xlsb) => xlsb.worksheet_range(sheet_name)?,
            Self::Xls(xls) => xls.worksheet_range(sheet_name)?,
            Self::Ods(ods) => ods.worksheet_range(sheet_name)?,
        };
        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect())
    }
}

/// Converts a calamine cell into the crate's cell value type.
///
/// Numbers stay numbers and booleans stay booleans; date and duration cells
/// are rendered to text since the tables this crate serves carry no temporal
/// columns of their own. Formula error cells become their Excel display text.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(value) => CellValue::Text(value.to_owned()),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => CellValue::Text(datetime.to_string()),
            None => CellValue::Number(value.as_f64()),
        },
        Data::DateTimeIso(value) => CellValue::Text(value.to_owned()),
        Data::DurationIso(value) => CellValue::Text(value.to_owned()),
        Data::Error(error) => CellValue::Text(error_text(error).to_owned()),
    }
}

/// Excel display text for formula error cells.
fn error_text(error: &CellErrorType) -> &'static str {
    match error {
        CellErrorType::Null => "#NULL!",
        CellErrorType::Div0 => "#DIV/0!",
        CellErrorType::Value => "#VALUE!",
        CellErrorType::Ref => "#REF!",
        CellErrorType::Name => "#NAME?",
        CellErrorType::Num => "#NUM!",
        CellErrorType::NA => "#N/A",
        CellErrorType::GettingData => "#GETTING_DATA",
    }
}
