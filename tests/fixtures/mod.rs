//! Test fixtures for generating valid XLSX files in memory.
//!
//! This module provides builders for creating XLSX files programmatically,
//! useful for testing the xlgrid reader with known inputs.
//!
//! # Example
//!
//! ```rust
//! use fixtures::XlsxBuilder;
//!
//! let xlsx = XlsxBuilder::new()
//!     .add_sheet("Sheet1")
//!     .add_cell("C1", "Q1", None)
//!     .add_cell("C2", 0.25, Some("0%"))
//!     .build();
//!
//! let workbook = xlgrid::parser::parse(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Cell value types for the builder.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A string value, written to the shared string table.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// An error value (e.g., "#DIV/0!").
    Error(String),
    /// An inline string (not shared).
    InlineString(String),
    /// An empty cell (style only).
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// A cell in the sheet.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
    /// Number format code applied through a cell style
    pub number_format: Option<String>,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
    /// `<dimension ref>`; omitted when `None`
    pub dimension: Option<String>,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a cell with a value and optional number format.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(
        mut self,
        cell_ref: &str,
        value: V,
        number_format: Option<&str>,
    ) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            number_format: number_format.map(ToString::to_string),
        });
        self
    }

    /// Declare the sheet's dimension.
    #[must_use]
    pub fn dimension(mut self, range: &str) -> Self {
        self.dimension = Some(range.to_string());
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for a whole workbook.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    date1904: bool,
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished sheet.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Add a simple sheet by name (returns a builder for chaining).
    #[must_use]
    pub fn add_sheet(self, name: &str) -> XlsxSheetAdder {
        XlsxSheetAdder {
            builder: self,
            sheet: SheetBuilder::new(name),
        }
    }

    /// Use the 1904 date system.
    #[must_use]
    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Collect number formats and shared strings
        let mut styles = StylesCollector::default();
        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let Some(ref code) = cell.number_format {
                    styles.add_format(code);
                }
                if let CellValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        let mut put = |name: &str, body: String| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", generate_content_types(self.sheets.len()));
        put("_rels/.rels", generate_rels());
        put(
            "xl/_rels/workbook.xml.rels",
            generate_workbook_rels(self.sheets.len(), !shared_strings.is_empty()),
        );
        put("xl/workbook.xml", generate_workbook(&self.sheets, self.date1904));
        put("xl/styles.xml", styles.generate_styles_xml());
        if !shared_strings.is_empty() {
            put("xl/sharedStrings.xml", generate_shared_strings(&shared_strings));
        }
        for (i, sheet) in self.sheets.iter().enumerate() {
            put(
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                generate_sheet_xml(sheet, &shared_strings, &styles),
            );
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

/// Helper for fluent sheet building within `XlsxBuilder`.
pub struct XlsxSheetAdder {
    builder: XlsxBuilder,
    sheet: SheetBuilder,
}

impl XlsxSheetAdder {
    /// Add a cell to the current sheet.
    #[must_use]
    pub fn add_cell<V: Into<CellValue>>(
        mut self,
        cell_ref: &str,
        value: V,
        number_format: Option<&str>,
    ) -> Self {
        self.sheet = self.sheet.cell(cell_ref, value, number_format);
        self
    }

    /// Declare the current sheet's dimension.
    #[must_use]
    pub fn dimension(mut self, range: &str) -> Self {
        self.sheet = self.sheet.dimension(range);
        self
    }

    /// Finish the current sheet and return the builder.
    #[must_use]
    pub fn done(mut self) -> XlsxBuilder {
        self.builder.sheets.push(self.sheet);
        self.builder
    }

    /// Build the XLSX directly (finishes the current sheet automatically).
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.done().build()
    }
}

// ============================================================================
// Styles Collector
// ============================================================================

/// Collects number formats; one cell style per distinct format code.
#[derive(Debug, Default)]
struct StylesCollector {
    /// (numFmtId, code) in first-use order
    formats: Vec<(u32, String)>,
}

impl StylesCollector {
    fn add_format(&mut self, code: &str) {
        if self.formats.iter().any(|(_, c)| c == code) {
            return;
        }
        let id = builtin_format_id(code).unwrap_or(164 + self.formats.len() as u32);
        self.formats.push((id, code.to_string()));
    }

    /// Style index (`s` attribute); index 0 is the default General style.
    fn style_index(&self, code: &str) -> u32 {
        self.formats
            .iter()
            .position(|(_, c)| c == code)
            .map_or(0, |i| i as u32 + 1)
    }

    fn generate_styles_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        let custom: Vec<&(u32, String)> =
            self.formats.iter().filter(|(id, _)| *id >= 164).collect();
        if !custom.is_empty() {
            xml.push_str(&format!(r#"<numFmts count="{}">"#, custom.len()));
            for (id, code) in custom {
                xml.push_str(&format!(
                    r#"<numFmt numFmtId="{id}" formatCode="{}"/>"#,
                    escape_xml(code)
                ));
            }
            xml.push_str("</numFmts>");
        }
        xml.push_str(r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#);
        xml.push_str(r#"<fills count="1"><fill><patternFill patternType="none"/></fill></fills>"#);
        xml.push_str(r#"<borders count="1"><border/></borders>"#);
        xml.push_str(&format!(
            r#"<cellXfs count="{}"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>"#,
            self.formats.len() + 1
        ));
        for (id, _) in &self.formats {
            xml.push_str(&format!(
                r#"<xf numFmtId="{id}" fontId="0" fillId="0" borderId="0" applyNumberFormat="1"/>"#
            ));
        }
        xml.push_str("</cellXfs></styleSheet>");
        xml
    }
}

fn builtin_format_id(code: &str) -> Option<u32> {
    match code {
        "0" => Some(1),
        "0.00" => Some(2),
        "#,##0" => Some(3),
        "#,##0.00" => Some(4),
        "0%" => Some(9),
        "0.00%" => Some(10),
        "m/d/yy" => Some(14),
        _ => None,
    }
}

// ============================================================================
// XML Generators
// ============================================================================

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn generate_workbook_rels(sheet_count: usize, has_shared_strings: bool) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    ));
    if has_shared_strings {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            sheet_count + 2
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetBuilder], date1904: bool) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    if date1904 {
        xml.push_str(r#"<workbookPr date1904="1"/>"#);
    }
    xml.push_str("<sheets>");
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!("<si><t>{}</t></si>", escape_xml(s)));
    }
    xml.push_str("</sst>");
    xml
}

fn generate_sheet_xml(
    sheet: &SheetBuilder,
    shared_strings: &[String],
    styles: &StylesCollector,
) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    if let Some(ref dimension) = sheet.dimension {
        xml.push_str(&format!(r#"<dimension ref="{dimension}"/>"#));
    }
    xml.push_str("<sheetData>");

    // Group cells by row
    let mut rows: BTreeMap<u32, Vec<&CellEntry>> = BTreeMap::new();
    for cell in &sheet.cells {
        rows.entry(row_number(&cell.cell_ref)).or_default().push(cell);
    }

    for (row_num, cells) in rows {
        xml.push_str(&format!(r#"<row r="{row_num}">"#));
        for cell in cells {
            let mut attrs = format!(r#"r="{}""#, cell.cell_ref);
            if let Some(ref code) = cell.number_format {
                attrs.push_str(&format!(r#" s="{}""#, styles.style_index(code)));
            }
            match &cell.value {
                CellValue::String(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap_or(0);
                    xml.push_str(&format!(r#"<c {attrs} t="s"><v>{idx}</v></c>"#));
                }
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c {attrs}><v>{n}</v></c>"#));
                }
                CellValue::Boolean(b) => {
                    let v = if *b { "1" } else { "0" };
                    xml.push_str(&format!(r#"<c {attrs} t="b"><v>{v}</v></c>"#));
                }
                CellValue::Error(e) => {
                    xml.push_str(&format!(r#"<c {attrs} t="e"><v>{}</v></c>"#, escape_xml(e)));
                }
                CellValue::InlineString(s) => {
                    xml.push_str(&format!(
                        r#"<c {attrs} t="inlineStr"><is><t>{}</t></is></c>"#,
                        escape_xml(s)
                    ));
                }
                CellValue::Empty => {
                    xml.push_str(&format!(r#"<c {attrs}/>"#));
                }
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// One-based row number of an A1 reference.
fn row_number(cell_ref: &str) -> u32 {
    cell_ref
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '$')
        .parse()
        .expect("cell reference needs a row number")
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Create a minimal valid XLSX with a single empty sheet.
#[must_use]
pub fn minimal_xlsx() -> Vec<u8> {
    XlsxBuilder::new()
        .add_sheet("Sheet1")
        .dimension("A1")
        .build()
}

/// The layout the viewer expects by default: quarter titles from C1, the
/// skill label in column B, values from column C, and gaps to fill.
#[must_use]
pub fn skills_sheet(name: &str) -> SheetBuilder {
    SheetBuilder::new(name)
        .dimension("A1:E5")
        .cell("A1", "Area", None)
        .cell("C1", "Q1", None)
        .cell("D1", "Q2", None)
        .cell("E1", "Q3", None)
        .cell("A2", "Dev", None)
        .cell("B2", "Learning", None)
        .cell("C2", 4, None)
        .cell("D2", 5, None)
        .cell("E2", 0.5, Some("0%"))
        .cell("C3", 3, None)
        .cell("B4", "Mentoring", None)
        .cell("D4", 2, None)
        .cell("E5", true, None)
}
