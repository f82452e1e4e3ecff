//! Worksheet parsing: one sheet XML part into a sparse cell store.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_ref_bytes, MAX_COL, MAX_ROW};
use crate::error::Result;
use crate::numfmt::{format_general, format_number_compiled, CompiledFormat};
use crate::types::{CellRaw, CellValue, OccupiedRange, Sheet, SparseCells};
use crate::xml_helpers::{attr_string, attr_u32, read_string_item, read_text};

/// Sheet metadata from workbook.xml
#[derive(Debug, Clone)]
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// Workbook-wide lookups every sheet needs to resolve cell values.
pub(super) struct SheetContext<'a> {
    pub shared_strings: &'a [String],
    pub number_formats: &'a [CompiledFormat],
    pub date1904: bool,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Number,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Number,
    }
}

/// Parse a single worksheet part from the archive.
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    ctx: &SheetContext<'_>,
) -> Result<Sheet> {
    let file = archive.by_name(&info.path)?;
    read_sheet(BufReader::new(file), &info.name, ctx)
}

pub(super) fn read_sheet<R: BufRead>(
    reader: R,
    name: &str,
    ctx: &SheetContext<'_>,
) -> Result<Sheet> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut builder = SheetBuilder::new(ctx);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => builder.element(&mut xml, e, true)?,
            Event::Empty(ref e) => builder.element(&mut xml, e, false)?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(builder.finish(name))
}

/// Accumulates cells while walking `<sheetData>`.
struct SheetBuilder<'a> {
    ctx: &'a SheetContext<'a>,
    cells: SparseCells,
    dimension: Option<OccupiedRange>,
    current_row: Option<u32>,
    next_col: u32,
}

impl<'a> SheetBuilder<'a> {
    fn new(ctx: &'a SheetContext<'a>) -> Self {
        Self {
            ctx,
            cells: SparseCells::new(),
            dimension: None,
            current_row: None,
            next_col: 0,
        }
    }

    fn element<R: BufRead>(
        &mut self,
        xml: &mut Reader<R>,
        e: &BytesStart<'_>,
        has_children: bool,
    ) -> Result<()> {
        match e.local_name().as_ref() {
            b"dimension" => {
                self.dimension = attr_string(e, b"ref").and_then(|r| OccupiedRange::parse(&r));
            }
            b"row" => {
                // `r` is optional; rows without it follow the previous one
                let row = attr_u32(e, b"r")
                    .and_then(|r| r.checked_sub(1))
                    .unwrap_or_else(|| self.current_row.map_or(0, |r| r.saturating_add(1)));
                self.current_row = Some(row);
                self.next_col = 0;
            }
            b"c" => {
                let (row, col) = match attr_string(e, b"r") {
                    Some(reference) => match parse_cell_ref_bytes(reference.as_bytes()) {
                        Some(position) => position,
                        None => {
                            log::warn!("Skipping cell with unusable reference \"{reference}\"");
                            return Ok(());
                        }
                    },
                    None => (self.current_row.unwrap_or(0), self.next_col),
                };
                self.next_col = col.saturating_add(1);
                if row > MAX_ROW || col > MAX_COL {
                    log::warn!("Skipping cell outside the sheet at row {row}, column {col}");
                    return Ok(());
                }

                let tag = attr_string(e, b"t")
                    .map_or(CellTypeTag::Number, |t| parse_cell_type_tag(t.as_bytes()));
                let style_idx = attr_u32(e, b"s");

                // <c r="A1" s="3"/> carries formatting only
                if has_children {
                    let raw = read_cell_content(xml)?;
                    if let Some(value) = resolve_cell_value(raw, tag, style_idx, self.ctx) {
                        self.cells.insert(row, col, value);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Occupied range: the declared dimension widened to cover every parsed
    /// cell, or the cells' bounding box when no dimension is declared. A bare
    /// `A1` dimension over no cells is how writers mark an empty sheet.
    ///
    /// A declaration too large for a dense grid (writers sometimes emit the
    /// whole sheet) shrinks to the cells' bounding box; if even that is too
    /// large the sheet is treated as having no usable range.
    fn finish(self, name: &str) -> Sheet {
        let bounds = self.cells.bounding_range();
        let declared = match (self.dimension, bounds) {
            (Some(dim), Some(bounds)) => Some(dim.union(&bounds)),
            (Some(dim), None) if !dim.is_single_cell() => Some(dim),
            (Some(_), None) => None,
            (None, bounds) => bounds,
        };
        let range = match declared {
            Some(range) if !range.fits_grid() => {
                log::warn!("Sheet \"{name}\" range {range} is too large, using occupied cells");
                bounds.filter(|bounds| {
                    let fits = bounds.fits_grid();
                    if !fits {
                        log::warn!("Sheet \"{name}\" cells span {bounds}, too large to display");
                    }
                    fits
                })
            }
            range => range,
        };
        if let (Some(dim), Some(range)) = (self.dimension, range) {
            if dim != range {
                log::debug!("Sheet \"{name}\" declares {dim} but holds cells in {range}");
            }
        }

        Sheet {
            name: name.to_string(),
            cells: self.cells,
            range,
        }
    }
}

/// Read the children of a `<c>` element and return its stored value.
fn read_cell_content<R: BufRead>(xml: &mut Reader<R>) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let mut value = None;
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref inner) => match inner.local_name().as_ref() {
                b"v" => value = Some(read_text(xml, b"v")?),
                b"is" => value = Some(read_string_item(xml, b"is")?),
                _ => {}
            },
            Event::End(ref inner) if inner.local_name().as_ref() == b"c" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(value)
}

/// Turn the stored text of a cell into its raw value and display text.
pub(super) fn resolve_cell_value(
    raw: Option<String>,
    tag: CellTypeTag,
    style_idx: Option<u32>,
    ctx: &SheetContext<'_>,
) -> Option<CellValue> {
    let raw = raw?;
    let value = match tag {
        CellTypeTag::Shared => {
            let idx: usize = raw.trim().parse().ok()?;
            let Some(text) = ctx.shared_strings.get(idx) else {
                log::warn!("Shared string index {idx} out of range");
                return None;
            };
            CellValue::text(text.as_str())
        }
        CellTypeTag::Str | CellTypeTag::Inline | CellTypeTag::Date => CellValue::text(raw),
        CellTypeTag::Bool => match raw.trim() {
            "1" | "true" => CellValue::new(CellRaw::Boolean(true), None),
            "0" | "false" => CellValue::new(CellRaw::Boolean(false), None),
            _ => CellValue::text(raw),
        },
        CellTypeTag::Error => CellValue::new(CellRaw::Error(raw), None),
        CellTypeTag::Number => {
            let Ok(number) = raw.trim().parse::<f64>() else {
                return Some(CellValue::text(raw));
            };
            let format = style_idx.and_then(|idx| ctx.number_formats.get(idx as usize));
            let formatted = match format {
                Some(format) => format_number_compiled(number, format, ctx.date1904),
                None => format_general(number),
            };
            CellValue::new(CellRaw::Number(number), Some(formatted))
        }
    };
    Some(value)
}
