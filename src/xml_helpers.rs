//! Shared XML helpers for the SpreadsheetML readers.
//!
//! Attribute lookups compare local names so `r:id` and `id` style prefixes
//! don't matter; text readers unescape entities and keep CDATA verbatim.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use crate::error::Result;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Extract a string attribute by local name (ignoring namespace prefix).
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Extract a `u32` attribute value by key.
pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Read the text content of the element just opened, up to its end tag.
pub fn read_text<R: BufRead>(xml: &mut Reader<R>, end: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) if e.local_name().as_ref() == end => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

/// Read a string item (`<si>` or `<is>`) and concatenate its `<t>` runs.
///
/// Phonetic guide runs (`<rPh>`) are skipped: they are furigana, not content.
pub fn read_string_item<R: BufRead>(xml: &mut Reader<R>, end: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut phonetic_depth = 0usize;
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"rPh" => phonetic_depth += 1,
                b"t" if phonetic_depth == 0 => text.push_str(&read_text(xml, b"t")?),
                _ => {}
            },
            Event::End(e) => {
                let name = e.local_name();
                if name.as_ref() == end {
                    break;
                }
                if name.as_ref() == b"rPh" {
                    phonetic_depth = phonetic_depth.saturating_sub(1);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}
