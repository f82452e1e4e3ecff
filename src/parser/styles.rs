//! Number formats from xl/styles.xml.
//!
//! Only what the viewer needs: custom `<numFmt>` codes and the `numFmtId` of
//! every `<cellXfs>` entry, resolved into one compiled format per style index.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Seek};
use zip::ZipArchive;

use crate::error::Result;
use crate::numfmt::{compile_format_code, get_builtin_format, CompiledFormat};
use crate::xml_helpers::{attr_string, attr_u32};

/// Compiled number format for each cell style index (`s` attribute of `<c>`).
pub(super) fn parse_number_formats<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<Vec<CompiledFormat>> {
    let styles_path = path.unwrap_or("xl/styles.xml");
    let Ok(file) = archive.by_name(styles_path) else {
        return Ok(Vec::new()); // Styles are optional
    };
    read_number_formats(BufReader::new(file))
}

pub(super) fn read_number_formats<R: BufRead>(reader: R) -> Result<Vec<CompiledFormat>> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut custom: HashMap<u32, String> = HashMap::new();
    let mut xf_format_ids: Vec<u32> = Vec::new();
    let mut in_num_fmts = false;
    let mut in_cell_xfs = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = true,
                b"cellXfs" => in_cell_xfs = true,
                b"numFmt" if in_num_fmts => {
                    if let (Some(id), Some(code)) =
                        (attr_u32(e, b"numFmtId"), attr_string(e, b"formatCode"))
                    {
                        custom.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    xf_format_ids.push(attr_u32(e, b"numFmtId").unwrap_or(0));
                }
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = false,
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    // Custom codes may override built-in ids.
    Ok(xf_format_ids
        .into_iter()
        .map(|id| {
            custom
                .get(&id)
                .map(String::as_str)
                .or_else(|| get_builtin_format(id))
                .map_or_else(CompiledFormat::general, compile_format_code)
        })
        .collect())
}
