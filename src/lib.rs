//! xlgrid - spreadsheet sheet viewer
//!
//! Reads an XLSX workbook, rebuilds a sheet's sparse cells into a dense grid,
//! splits it into column titles and labelled rows, fills blank cells from the
//! row above, and renders the result as an HTML table:
//! - Own ZIP + SpreadsheetML reader with number formatting
//! - Configurable header row, label column and data start column
//! - Explicit view state with superseded file reads ignored
//! - Browser bindings via WebAssembly and a native CLI
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use xlgrid::{grid, parser, LayoutDescriptor};
//!
//! # fn main() -> xlgrid::Result<()> {
//! let bytes = std::fs::read("skills.xlsx")?;
//! let workbook = parser::parse(&bytes)?;
//! let data = grid::load_sheet(&workbook, "Sheet1", &LayoutDescriptor::default());
//! println!("{:?}", data.headers);
//! # Ok(())
//! # }
//! ```

pub mod cell_ref;
pub mod error;
pub mod grid;
pub mod html;
pub mod numfmt;
pub mod parser;
pub mod types;
pub mod view;
pub mod xml_helpers;

// Browser surface
#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use error::{Result, XlgridError};
pub use grid::{LayoutDescriptor, SheetData};
pub use types::*;
pub use view::{ReadOutcome, ReadTicket, ViewController, ViewPhase, ViewState};
#[cfg(target_arch = "wasm32")]
pub use wasm::SheetViewer;

/// Parse an XLSX file and return its sheet names.
///
/// # Errors
/// Returns an error if the XLSX file is invalid or cannot be parsed.
#[wasm_bindgen]
pub fn list_sheets(data: &[u8]) -> std::result::Result<Vec<String>, JsValue> {
    let workbook = parser::parse(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(workbook.sheet_names())
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
