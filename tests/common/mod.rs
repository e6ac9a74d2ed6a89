use std::collections::HashMap;
use std::path::PathBuf;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tempfile::TempDir;

/// Create a scratch directory holding `input` as `chutzpah.json`, returning
/// the dir handle plus input and output paths.
/// The caller must hold onto `TempDir` to keep the temp directory alive.
pub fn setup_input(input: &[u8]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("chutzpah.json");
    std::fs::write(&input_path, input).unwrap();
    let output_path = dir.path().join("cobertura.xml");
    (dir, input_path, output_path)
}

/// A start or empty element from an XML document.
#[derive(Debug)]
pub struct Element {
    pub name: String,
    pub attrs: HashMap<String, String>,
}

/// Parse an XML document into a flat, in-order list of its elements.
pub fn elements(xml: &[u8]) -> Vec<Element> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut out = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Eof => break,
            Event::Start(ref e) | Event::Empty(ref e) => out.push(Element {
                name: str::from_utf8(e.name().as_ref()).unwrap().to_string(),
                attrs: attr_map(e),
            }),
            _ => {}
        }
        buf.clear();
    }
    out
}

/// Elements named `name`, in document order.
pub fn named<'a>(elements: &'a [Element], name: &str) -> Vec<&'a Element> {
    elements.iter().filter(|e| e.name == name).collect()
}

fn attr_map(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .map(|a| {
            let attr = a.unwrap();
            let key = str::from_utf8(attr.key.as_ref()).unwrap().to_string();
            let value = attr.unescape_value().unwrap().to_string();
            (key, value)
        })
        .collect()
}
