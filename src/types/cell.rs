use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::OccupiedRange;

/// Raw cell value as stored in the sheet XML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v", rename_all = "camelCase")]
pub enum CellRaw {
    Text(String),
    Number(f64),
    Boolean(bool),
    Error(String),
}

impl CellRaw {
    /// Plain string form of the raw value, used when no formatted text exists.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) | Self::Error(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(true) => "TRUE".to_string(),
            Self::Boolean(false) => "FALSE".to_string(),
        }
    }
}

/// A single populated cell: raw value plus the optional formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    pub raw: CellRaw,
    /// Text as the spreadsheet application would display it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl CellValue {
    pub fn new(raw: CellRaw, formatted: Option<String>) -> Self {
        Self { raw, formatted }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(CellRaw::Text(s.into()), None)
    }

    pub fn number(n: f64) -> Self {
        Self::new(CellRaw::Number(n), None)
    }

    /// Formatted text when available, otherwise the raw value.
    pub fn display_text(&self) -> String {
        match &self.formatted {
            Some(text) => text.clone(),
            None => self.raw.display(),
        }
    }
}

/// Sparse cell store: only cells with content, keyed by zero-based `(row, col)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseCells {
    #[serde(with = "cell_entries")]
    cells: HashMap<(u32, u32), CellValue>,
}

impl SparseCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the cell at `(row, col)`.
    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        self.cells.insert((row, col), value);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), &CellValue)> {
        self.cells.iter().map(|(&pos, value)| (pos, value))
    }

    /// Smallest rectangle containing every stored cell, `None` when empty.
    pub fn bounding_range(&self) -> Option<OccupiedRange> {
        let mut keys = self.cells.keys();
        let &(first_row, first_col) = keys.next()?;
        let (mut min_row, mut min_col, mut max_row, mut max_col) =
            (first_row, first_col, first_row, first_col);
        for &(row, col) in keys {
            min_row = min_row.min(row);
            min_col = min_col.min(col);
            max_row = max_row.max(row);
            max_col = max_col.max(col);
        }
        OccupiedRange::new(min_row, min_col, max_row, max_col)
    }
}

impl FromIterator<((u32, u32), CellValue)> for SparseCells {
    fn from_iter<I: IntoIterator<Item = ((u32, u32), CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// JSON object keys must be strings, so the map travels as a list of entries.
mod cell_entries {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    use super::CellValue;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        r: u32,
        c: u32,
        cell: CellValue,
    }

    pub(super) fn serialize<S: Serializer>(
        cells: &HashMap<(u32, u32), CellValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<Entry> = cells
            .iter()
            .map(|(&(r, c), cell)| Entry {
                r,
                c,
                cell: cell.clone(),
            })
            .collect();
        entries.sort_by_key(|e| (e.r, e.c));
        entries.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<(u32, u32), CellValue>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| ((e.r, e.c), e.cell)).collect())
    }
}
