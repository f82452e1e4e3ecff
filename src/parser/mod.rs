//! Main XLSX parser
//!
//! Orchestrates reading the workbook parts from the ZIP archive: relationships,
//! sheet list, shared strings, number formats, then each worksheet in order.

mod relationships;
mod styles;
mod worksheet;

use serde::Serialize;
use std::io::Cursor;
use zip::ZipArchive;

use crate::error::{Result, XlgridError};
use crate::types::Workbook;

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};
use styles::parse_number_formats;
use worksheet::{parse_sheet, SheetContext};

/// Compound File Binary signature used by legacy `.xls` workbooks.
const CFB_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::Instant;
    thread_local! {
        static START: Instant = Instant::now();
    }
    START.with(|s| s.elapsed().as_secs_f64() * 1000.0)
}

/// Timing and size figures for one parse.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ParseMetrics {
    pub parse_ms: f64,
    pub shared_strings_ms: f64,
    pub styles_ms: f64,
    pub sheets_ms: f64,
    pub sheets_count: u64,
    pub shared_strings_count: u64,
    pub num_fmts_count: u64,
    pub total_cells: u64,
}

/// Parse an XLSX file from bytes.
///
/// # Errors
/// Returns an error when the bytes are not a readable XLSX package: not a ZIP
/// archive, a legacy `.xls` file, a missing `xl/workbook.xml`, or malformed
/// XML in any part that is read.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    parse_internal(data, None)
}

/// Parse an XLSX file from bytes and return timing metrics.
///
/// # Errors
/// Same conditions as [`parse`].
pub fn parse_with_metrics(data: &[u8]) -> Result<(Workbook, ParseMetrics)> {
    let mut metrics = ParseMetrics::default();
    let workbook = parse_internal(data, Some(&mut metrics))?;
    Ok((workbook, metrics))
}

fn parse_internal(data: &[u8], mut metrics: Option<&mut ParseMetrics>) -> Result<Workbook> {
    let total_start = now_ms();

    if data.starts_with(&CFB_MAGIC) {
        return Err(XlgridError::Parse(
            "legacy .xls (BIFF) workbooks are not supported; save as .xlsx".to_string(),
        ));
    }

    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let relationships = parse_workbook_relationships(&mut archive)?;
    let (sheet_info, date1904) = get_sheet_info(&mut archive, &relationships.worksheets)?;

    let shared_strings_start = now_ms();
    let shared_strings =
        parse_shared_strings(&mut archive, relationships.shared_strings.as_deref())?;
    if let Some(m) = metrics.as_mut() {
        m.shared_strings_ms = now_ms() - shared_strings_start;
        m.shared_strings_count = shared_strings.len() as u64;
    }

    let styles_start = now_ms();
    let number_formats = parse_number_formats(&mut archive, relationships.styles.as_deref())?;
    if let Some(m) = metrics.as_mut() {
        m.styles_ms = now_ms() - styles_start;
        m.num_fmts_count = number_formats.len() as u64;
    }

    let ctx = SheetContext {
        shared_strings: &shared_strings,
        number_formats: &number_formats,
        date1904,
    };

    let sheets_start = now_ms();
    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in &sheet_info {
        let sheet = parse_sheet(&mut archive, info, &ctx)?;
        log::debug!(
            "Parsed sheet \"{}\" from {}: {} cells",
            sheet.name,
            info.path,
            sheet.cells.len()
        );
        sheets.push(sheet);
    }

    if let Some(m) = metrics.as_mut() {
        m.sheets_ms = now_ms() - sheets_start;
        m.sheets_count = sheets.len() as u64;
        m.total_cells = sheets.iter().map(|s| s.cells.len() as u64).sum();
        m.parse_ms = now_ms() - total_start;
    }

    Ok(Workbook { sheets, date1904 })
}
