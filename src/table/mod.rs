//! # Table Model
//!
//! The in-memory table produced by ingestion and consumed by the view engine,
//! together with its JSON artifact form:
//!
//! ```text
//! { "headers": [...],
//!   "data": [{ "<header>": string|number|boolean, ... }, ...],
//!   "metadata": { "totalRows": n, "totalColumns": n,
//!                 "generatedAt": "...", "source": "...", "sheet": "..." } }
//! ```
//!
//! Cell values are a tagged variant with explicit coercion rules; nothing in
//! the crate coerces implicitly. Rows preserve header insertion order so the
//! serialized artifact is stable across runs.
pub mod columns;
pub mod style;
pub mod view;

use crate::text::is_truthy_token;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Largest float that still round-trips through a 64-bit JSON integer.
const MAX_INTEGRAL: f64 = 9_007_199_254_740_992.0;

/// A single cell value: string, number, boolean, or absent.
///
/// `Empty` only exists between the source format and normalization, and as the
/// result of reading a column a row does not carry; ingestion rewrites absent
/// cells to empty text before a row is stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Absent cell
    #[default]
    Empty,
    /// Boolean values (true/false)
    Bool(bool),
    /// Numeric values
    Number(f64),
    /// Text values
    Text(String),
}

impl CellValue {
    /// True for absent cells and empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the cell, when one exists.
    ///
    /// Text parses after trimming; booleans and absent cells have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Permissive boolean reading used by flag columns: boolean `true`,
    /// numeric `1`, or one of the accepted yes/sí/si/true/1 spellings.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Number(value) => *value == 1.0,
            Self::Text(value) => is_truthy_token(value),
            Self::Empty => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => {
                if value.fract() == 0.0 && value.abs() < MAX_INTEGRAL {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => {
                // Whole numbers round-trip as JSON integers, like the source cells
                if value.fract() == 0.0 && value.abs() < MAX_INTEGRAL {
                    serializer.serialize_i64(*value as i64)
                } else {
                    serializer.serialize_f64(*value)
                }
            }
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellValueVisitor;

        impl Visitor<'_> for CellValueVisitor {
            type Value = CellValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number, boolean, or null")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(CellValue::Bool(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(CellValue::Number(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(CellValue::Number(value as f64))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(CellValue::Number(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(CellValue::Text(value.to_owned()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(CellValue::Text(value))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(CellValue::Empty)
            }
        }

        deserializer.deserialize_any(CellValueVisitor)
    }
}

/// One data row: a header-keyed mapping that preserves insertion order.
///
/// Duplicate headers collide silently, last value wins, matching what the
/// source spreadsheets produce when a header repeats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value under a header, replacing any previous value in place.
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        let header = header.into();
        match self.cells.iter_mut().find(|(key, _)| *key == header) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    /// Reads the value under a header. Missing columns read as
    /// [`CellValue::Empty`], never an error.
    pub fn get(&self, header: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value)
            .unwrap_or(&CellValue::Empty)
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the row carries no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over `(header, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates over the cell values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, value)| value)
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(pairs: I) -> Self {
        let mut row = Row::new();
        for (header, value) in pairs {
            row.insert(header, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of header names to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut row = Row::new();
                while let Some((header, value)) = access.next_entry::<String, CellValue>()? {
                    row.insert(header, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Conversion metadata carried alongside the data rows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Number of data rows (the header row does not count)
    pub total_rows: usize,
    /// Number of header columns
    pub total_columns: usize,
    /// Conversion wall-clock time, ISO-8601 with millisecond precision
    pub generated_at: String,
    /// Normalized relative path or URL of the source workbook
    pub source: String,
    /// Name of the sheet the data came from
    pub sheet: String,
}

/// A converted table: ordered headers, ordered rows, and metadata.
///
/// Invariants established at conversion time: `metadata.total_rows ==
/// rows.len()`, `metadata.total_columns == headers.len()`, and every row's key
/// set is a subset of `headers`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Column headers in source order
    pub headers: Vec<String>,
    /// Data rows in source order
    #[serde(rename = "data")]
    pub rows: Vec<Row>,
    /// Conversion metadata
    pub metadata: Metadata,
}
