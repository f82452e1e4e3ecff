use serde::{Deserialize, Serialize};
use std::fmt;

use super::SparseCells;
use crate::cell_ref::{format_cell_ref, parse_cell_range};

/// Declared occupied rectangle of a sheet, zero-based and inclusive.
///
/// Always well-formed: `min_row <= max_row` and `min_col <= max_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedRange {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl OccupiedRange {
    /// Largest rectangle the viewer will materialize as a dense grid.
    pub const MAX_CELLS: u64 = 2_000_000;

    /// Returns `None` for an inverted rectangle; such a sheet is treated as absent.
    pub fn new(min_row: u32, min_col: u32, max_row: u32, max_col: u32) -> Option<Self> {
        if min_row > max_row || min_col > max_col {
            return None;
        }
        Some(Self {
            min_row,
            min_col,
            max_row,
            max_col,
        })
    }

    /// Parse an A1 range such as `"B2:F30"`.
    pub fn parse(range: &str) -> Option<Self> {
        let (min_row, min_col, max_row, max_col) = parse_cell_range(range)?;
        Self::new(min_row, min_col, max_row, max_col)
    }

    pub fn row_count(&self) -> usize {
        span(self.min_row, self.max_row)
    }

    pub fn col_count(&self) -> usize {
        span(self.min_col, self.max_col)
    }

    /// Number of coordinates inside the rectangle.
    pub fn cell_count(&self) -> u64 {
        let rows = u64::from(self.max_row - self.min_row) + 1;
        let cols = u64::from(self.max_col - self.min_col) + 1;
        rows.saturating_mul(cols)
    }

    /// Whether the dense grid for this range stays under [`Self::MAX_CELLS`].
    pub fn fits_grid(&self) -> bool {
        self.cell_count() <= Self::MAX_CELLS
    }

    pub fn is_single_cell(&self) -> bool {
        self.min_row == self.max_row && self.min_col == self.max_col
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_row: self.min_row.min(other.min_row),
            min_col: self.min_col.min(other.min_col),
            max_row: self.max_row.max(other.max_row),
            max_col: self.max_col.max(other.max_col),
        }
    }
}

fn span(min: u32, max: u32) -> usize {
    usize::try_from(max - min).map_or(usize::MAX, |d| d.saturating_add(1))
}

impl fmt::Display for OccupiedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            return f.write_str(&format_cell_ref(self.min_row, self.min_col));
        }
        write!(
            f,
            "{}:{}",
            format_cell_ref(self.min_row, self.min_col),
            format_cell_ref(self.max_row, self.max_col)
        )
    }
}

/// One worksheet as seen by the viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub cells: SparseCells,
    /// `None` when the sheet declares no occupied region
    pub range: Option<OccupiedRange>,
}

/// Parsed workbook: sheets in workbook order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Dates use the 1904 epoch
    pub date1904: bool,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
