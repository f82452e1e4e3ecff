//! A1-style cell references.
//!
//! Coordinates are zero-based `(row, col)` everywhere in the crate; the
//! textual form is the usual `$`-tolerant column-letters + row-number pair.

/// Last zero-based row a worksheet can address (`1048576` in A1 form).
pub const MAX_ROW: u32 = 1_048_575;

/// Last zero-based column a worksheet can address (`XFD`).
pub const MAX_COL: u32 = 16_383;

/// Parse an A1 reference from raw bytes into zero-based `(row, col)`.
///
/// Works directly on quick-xml attribute values. Returns `None` when either
/// the column letters or the row digits are missing, the row is `0`, or the
/// position lies past `XFD1048576`.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        match b {
            b'$' => {}
            b'A'..=b'Z' | b'a'..=b'z' if !saw_row => {
                let letter = u32::from(b.to_ascii_uppercase() - b'A') + 1;
                col = col.checked_mul(26)?.checked_add(letter)?;
                saw_col = true;
            }
            b'0'..=b'9' if saw_col => {
                row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    let (row, col) = (row - 1, col - 1);
    if row > MAX_ROW || col > MAX_COL {
        return None;
    }
    Some((row, col))
}

/// Parse an A1 reference like `"C7"` into zero-based `(row, col)`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Parse a range like `"A1:D10"` (or a single `"B2"`) into
/// `(start_row, start_col, end_row, end_col)`.
///
/// Corners are normalized so that start <= end on both axes.
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    let (start, end) = range.split_once(':').unwrap_or((range, range));
    let (r1, c1) = parse_cell_ref(start)?;
    let (r2, c2) = parse_cell_ref(end)?;
    Some((r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2)))
}

/// Column letters for a zero-based column index (`0 -> "A"`, `27 -> "AB"`).
pub fn column_name(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        let rem = u8::try_from(rem).unwrap_or(0);
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format zero-based `(row, col)` as an A1 reference.
pub fn format_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_name(col), u64::from(row) + 1)
}
