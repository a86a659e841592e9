//! # Tabular View Engine
//!
//! Deterministic projection from a converted table plus explicit view state to
//! the page of rows a presentation layer should show. The pipeline order is
//! fixed: subset restriction, then global filter, then sort, then pagination.
//! Every stage is a pure function of its inputs and the projection is fully
//! recomputed on each query; there is no incremental state to invalidate.
//!
//! The global filter is an AND-of-substrings over the whole row: filter text
//! and cell content are both normalized (case, accents and punctuation
//! removed) and every search token must appear somewhere in the row.

use crate::table::columns::{Columns, Schema};
use crate::table::{CellValue, Row, Table};
use crate::text::search_tokens;
use std::cmp::Ordering;

/// Rows shown per page unless the caller picks another size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Direction of the active column sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The explicit, per-table-instance view state.
///
/// Created when a table is mounted, mutated only through the [`TableView`]
/// transition methods, and discarded with the view. The stored page index may
/// point past the end after the filter shrinks the row set; the projection
/// clamps it instead of rewriting it.
#[derive(Clone, Debug)]
pub struct ViewState {
    /// Global substring filter text, verbatim as typed
    pub filter: String,
    /// Active sort column (actual header name) and direction, at most one
    pub sort: Option<(String, SortDirection)>,
    /// When false, only rows whose flag column parses truthy are visible
    pub show_all: bool,
    /// Requested page index, clamped at projection time
    pub page: usize,
    /// Fixed page size, always positive
    pub page_size: usize,
}

impl ViewState {
    /// Fresh state: empty filter, no sort, every row visible, first page.
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            filter: String::new(),
            sort: None,
            show_all: true,
            page: 0,
            page_size,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of projected rows plus the counts a pagination control needs.
#[derive(Debug)]
pub struct Page<'a> {
    /// The visible slice of the filtered and sorted rows
    pub rows: Vec<&'a Row>,
    /// Effective (clamped) page index
    pub page_index: usize,
    /// Total number of pages after filtering
    pub page_count: usize,
    /// Total number of rows after filtering
    pub total: usize,
    /// 1-based index of the first shown row, 0 when the page is empty
    pub first: usize,
    /// 1-based index of the last shown row
    pub last: usize,
}

/// A model selected through the model-identity column.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSelection {
    /// Display value of the model cell
    pub name: String,
    /// Configured aux columns as `(canonical key, display value)` pairs
    pub aux: Vec<(String, String)>,
}

/// A table bound to its resolved schema and view state.
///
/// All mutations are discrete state transitions; [`TableView::visible_page`]
/// re-derives the visible rows from scratch on every call.
pub struct TableView {
    table: Table,
    columns: Columns,
    state: ViewState,
}

impl TableView {
    /// Binds a table to a schema with the default page size.
    pub fn new(table: Table, schema: &Schema) -> Self {
        Self::with_page_size(table, schema, DEFAULT_PAGE_SIZE)
    }

    /// Binds a table to a schema with an explicit page size.
    pub fn with_page_size(table: Table, schema: &Schema, page_size: usize) -> Self {
        let columns = schema.resolve(&table.headers);
        Self {
            table,
            columns,
            state: ViewState::new(page_size),
        }
    }

    /// The underlying table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The resolved columns.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// The current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replaces the global filter text. The page index is deliberately left
    /// alone; the projection clamps it when the filtered set shrinks.
    pub fn set_global_filter(&mut self, text: &str) {
        self.state.filter = text.to_owned();
    }

    /// Header-click sort: cycles none → ascending → descending → none on the
    /// same column, restarts at ascending on a new column. The flag column
    /// hosting the subset toggle is exempt from header-click sorting.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.columns.toggle_header() == Some(column) {
            return;
        }
        self.state.sort = match self.state.sort.take() {
            Some((active, SortDirection::Ascending)) if active == column => {
                Some((active, SortDirection::Descending))
            }
            Some((active, SortDirection::Descending)) if active == column => None,
            _ => Some((column.to_owned(), SortDirection::Ascending)),
        };
    }

    /// Sets or clears the sort directly.
    pub fn set_sort(&mut self, column: &str, direction: Option<SortDirection>) {
        self.state.sort = direction.map(|direction| (column.to_owned(), direction));
    }

    /// Sets the subset toggle: `true` shows every row, `false` restricts the
    /// view to rows whose flag column parses truthy.
    pub fn set_subset_toggle(&mut self, show_all: bool) {
        self.state.show_all = show_all;
    }

    /// Requests a page, clamped to the currently valid range.
    pub fn set_page(&mut self, index: usize) {
        let total = project(&self.table, &self.columns, &self.state).len();
        let page_count = total.div_ceil(self.state.page_size);
        self.state.page = if page_count == 0 {
            0
        } else {
            index.min(page_count - 1)
        };
    }

    /// Projects the visible page: subset restriction → filter → sort → slice.
    pub fn visible_page(&self) -> Page<'_> {
        let rows = project(&self.table, &self.columns, &self.state);
        let total = rows.len();
        let page_size = self.state.page_size;
        let page_count = total.div_ceil(page_size);
        let page_index = if page_count == 0 {
            0
        } else {
            self.state.page.min(page_count - 1)
        };
        let start = page_index * page_size;
        let end = (start + page_size).min(total);
        Page {
            rows: rows[start..end].to_vec(),
            page_index,
            page_count,
            total,
            first: if total == 0 { 0 } else { start + 1 },
            last: end,
        }
    }

    /// Selection raised when the model-identity cell of a row is activated.
    /// Returns `None` when the schema has no model column or the cell is empty.
    pub fn select_model(&self, row: &Row) -> Option<ModelSelection> {
        let header = self.columns.model_header()?;
        let name = row.get(header).to_string();
        if name.is_empty() {
            return None;
        }
        let aux = self
            .columns
            .selection_aux()
            .iter()
            .map(|(key, header)| ((*key).to_owned(), row.get(header).to_string()))
            .collect();
        Some(ModelSelection { name, aux })
    }
}

/// The pure filter pipeline: subset restriction, global filter, sort.
///
/// Pagination is left to the caller so counts can be derived from the full
/// projected set.
pub fn project<'a>(table: &'a Table, columns: &Columns, state: &ViewState) -> Vec<&'a Row> {
    let mut rows: Vec<&Row> = table.rows.iter().collect();

    if !state.show_all {
        if let Some(flag) = columns.toggle_header() {
            rows.retain(|row| row.get(flag).is_truthy());
        }
    }

    let tokens = search_tokens(&state.filter);
    if !tokens.is_empty() {
        rows.retain(|row| row_matches(row, &tokens));
    }

    if let Some((column, direction)) = &state.sort {
        rows.sort_by(|a, b| {
            let ordering = compare_cells(a.get(column), b.get(column));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

/// Whether a row's concatenated normalized content contains every token.
fn row_matches(row: &Row, tokens: &[String]) -> bool {
    let content = row
        .values()
        .map(CellValue::to_string)
        .collect::<Vec<String>>()
        .join(" ");
    let content = crate::text::normalize(&content, false);
    tokens.iter().all(|token| content.contains(token.as_str()))
}

/// Value comparison for sorting: numeric when both sides read as numbers,
/// numeric before non-numeric, lexicographic otherwise.
fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().cmp(&b.to_string()),
    }
}
