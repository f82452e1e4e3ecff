//! Common test utilities and assertion helpers.
//!
//! Thin wrappers over the library that panic with a readable message, so the
//! integration tests can stay focused on what they check.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

// Re-export fixtures for convenience
pub use super::fixtures::*;

use xlgrid::cell_ref::parse_cell_ref;
use xlgrid::grid::{load_sheet, LayoutDescriptor, Row, SheetData};
use xlgrid::Workbook;

/// Parse XLSX bytes, panicking on failure.
#[must_use]
pub fn parse_workbook(data: &[u8]) -> Workbook {
    xlgrid::parser::parse(data).expect("Failed to parse XLSX")
}

/// Headers and filled rows of `sheet` with the default layout.
#[must_use]
pub fn load_default(workbook: &Workbook, sheet: &str) -> SheetData {
    load_sheet(workbook, sheet, &LayoutDescriptor::default())
}

/// Build owned rows from string literals.
#[must_use]
pub fn rows(data: &[&[&str]]) -> Vec<Row> {
    data.iter()
        .map(|r| r.iter().map(ToString::to_string).collect())
        .collect()
}

/// Assert the display text of the cell at an A1 reference.
pub fn assert_cell_text(workbook: &Workbook, sheet: &str, cell_ref: &str, expected: &str) {
    let sheet_ref = workbook
        .sheet(sheet)
        .unwrap_or_else(|| panic!("Sheet {sheet} not found"));
    let (row, col) = parse_cell_ref(cell_ref).unwrap_or_else(|| panic!("Bad reference {cell_ref}"));
    let actual = sheet_ref
        .cells
        .get(row, col)
        .map(xlgrid::CellValue::display_text)
        .unwrap_or_else(|| panic!("Cell {sheet}!{cell_ref} is empty"));
    assert_eq!(actual, expected, "Cell {sheet}!{cell_ref}");
}

/// Assert that nothing is stored at an A1 reference.
pub fn assert_cell_missing(workbook: &Workbook, sheet: &str, cell_ref: &str) {
    let (row, col) = parse_cell_ref(cell_ref).unwrap();
    assert!(
        workbook.sheet(sheet).unwrap().cells.get(row, col).is_none(),
        "Cell {sheet}!{cell_ref} should be empty"
    );
}
