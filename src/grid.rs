//! Grid normalization.
//!
//! Turns a sheet's sparse cell store into a dense rectangle of display
//! strings, cuts it into a header line and labelled data rows according to a
//! [`LayoutDescriptor`], and fills blank cells downward.
//!
//! Everything here is a pure transform; nothing is cached between calls.

use serde::{Deserialize, Serialize};

use crate::types::{OccupiedRange, SparseCells, Workbook};

/// One row of display strings.
pub type Row = Vec<String>;

/// Fully populated rectangle of display strings; index 0 is the range's
/// first row/column.
pub type DenseGrid = Vec<Row>;

/// Where headers, row labels and data live inside the dense grid.
///
/// The default matches the sheets this viewer was written for: titles on the
/// first row, the row label in column B, data from column C onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutDescriptor {
    /// Grid row holding the column titles
    pub header_row: usize,
    /// Grid column holding each data row's label
    pub label_col: usize,
    /// First grid column holding data (and titles)
    pub data_start_col: usize,
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        Self {
            header_row: 0,
            label_col: 1,
            data_start_col: 2,
        }
    }
}

/// Headers and fill-down rows derived from one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetData {
    pub headers: Row,
    pub rows: Vec<Row>,
}

impl SheetData {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Build the dense grid for `range`.
///
/// Each coordinate takes the cell's formatted text, falling back to its raw
/// value, or `""` when the store has no entry. A missing range yields an
/// empty grid, which callers treat as an empty sheet.
pub fn build_dense_grid(cells: &SparseCells, range: Option<OccupiedRange>) -> DenseGrid {
    let Some(range) = range else {
        return DenseGrid::new();
    };

    (range.min_row..=range.max_row)
        .map(|row| {
            (range.min_col..=range.max_col)
                .map(|col| {
                    cells
                        .get(row, col)
                        .map(|cell| cell.display_text())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// Split a dense grid into column titles and labelled data rows.
///
/// Titles are the header row from `data_start_col` on. Each data row is the
/// label cell followed by the data cells of a row below the header. Rows too
/// short to reach the label column contribute an empty label and no data.
pub fn extract_headers_and_rows(grid: &[Row], layout: &LayoutDescriptor) -> (Row, Vec<Row>) {
    let headers = grid
        .get(layout.header_row)
        .map(|row| row.iter().skip(layout.data_start_col).cloned().collect())
        .unwrap_or_default();

    let rows = grid
        .iter()
        .skip(layout.header_row.saturating_add(1))
        .map(|row| {
            let label = row.get(layout.label_col).cloned().unwrap_or_default();
            std::iter::once(label)
                .chain(row.iter().skip(layout.data_start_col).cloned())
                .collect()
        })
        .collect();

    (headers, rows)
}

/// Replace empty cells with the value above them, cumulatively.
///
/// The previous row used for filling is the already-filled one, so a value
/// keeps propagating through consecutive blanks. Each row is only filled up
/// to its own length; rows are never padded or truncated.
pub fn fill_down(rows: Vec<Row>) -> Vec<Row> {
    let mut filled: Vec<Row> = Vec::with_capacity(rows.len());

    for mut row in rows {
        if let Some(previous) = filled.last() {
            for (cell, above) in row.iter_mut().zip(previous) {
                if cell.is_empty() {
                    cell.clone_from(above);
                }
            }
        }
        filled.push(row);
    }

    filled
}

/// Derive headers and filled rows for the named sheet.
///
/// A missing sheet, a sheet without an occupied range, or one whose range is
/// too large for a dense grid is not an error: it is logged and produces
/// empty data.
pub fn load_sheet(workbook: &Workbook, sheet_name: &str, layout: &LayoutDescriptor) -> SheetData {
    let Some(sheet) = workbook.sheet(sheet_name) else {
        log::warn!("Sheet \"{sheet_name}\" not found in workbook.");
        return SheetData::default();
    };

    let Some(range) = sheet.range else {
        log::warn!("Sheet \"{sheet_name}\" is empty or invalid.");
        return SheetData::default();
    };
    if !range.fits_grid() {
        log::warn!("Sheet \"{sheet_name}\" range {range} is too large to display.");
        return SheetData::default();
    }

    let grid = build_dense_grid(&sheet.cells, Some(range));
    let (headers, rows) = extract_headers_and_rows(&grid, layout);
    log::debug!(
        "Sheet \"{sheet_name}\" {range}: {} headers, {} rows",
        headers.len(),
        rows.len()
    );

    SheetData {
        headers,
        rows: fill_down(rows),
    }
}
