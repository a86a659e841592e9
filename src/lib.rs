//! # Benchtab
//!
//! Benchmark result tables as data: a spreadsheet-to-JSON conversion pipeline
//! and a deterministic tabular view engine for presenting the converted rows.
//!
//! ## Features
//!
//! - **Multi-format ingestion**: Convert Excel (`.xlsx`, `.xlsm`, `.xls`) and
//!   OpenDocument (`.ods`) workbooks into a stable JSON artifact, offline in
//!   batch, per file, or fetched over HTTP at load time
//! - **Header resolution**: Tolerate header label variation (accents, case,
//!   punctuation, synonyms) through per-schema canonical keys
//! - **Global filtering**: Accent- and punctuation-insensitive AND-of-tokens
//!   substring search across whole rows
//! - **Column-aware sorting**: Stable, numeric-aware per-column sort
//! - **Subset toggle**: Restrict the view to rows whose flag column parses
//!   truthy
//! - **Pagination**: Fixed page size with clamped page indexes and the counts
//!   a pagination control needs
//! - **Rendering policy**: Severity tiers for percentage and correlation
//!   columns, badges for flags, parsed `label [url]` reference entries
//!
//! The view engine is purely synchronous: every interaction is a discrete
//! state transition and the visible page is re-derived from scratch on each
//! query.
pub mod convert;
pub mod error;
pub mod spreadsheet;
pub mod table;
pub mod text;

pub use crate::error::BenchtabError;
