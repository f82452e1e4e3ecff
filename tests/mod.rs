//! Integration tests for xlgrid.
//!
//! This module provides the test infrastructure for testing the reader and
//! the viewer end to end. It includes:
//!
//! - `fixtures`: Builders for creating valid XLSX files in memory
//! - `common`: Assertion helpers and parsing utilities
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use crate::common::{assert_cell_text, parse_workbook, XlsxBuilder};
//!
//! fn test_percent() {
//!     let xlsx = XlsxBuilder::new()
//!         .add_sheet("Sheet1")
//!         .add_cell("A1", 0.25, Some("0%"))
//!         .build();
//!     let workbook = parse_workbook(&xlsx);
//!     assert_cell_text(&workbook, "Sheet1", "A1", "25%");
//! }
//! ```
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

pub mod common;
pub mod fixtures;

// Re-export commonly used items at the top level
pub use common::{assert_cell_missing, assert_cell_text, load_default, parse_workbook, rows};
pub use fixtures::{CellValue, SheetBuilder, XlsxBuilder};
