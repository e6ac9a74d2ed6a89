/// Parser for Chutzpah JSON coverage reports.
///
/// The format is a JSON object keyed by file path. Each value contains:
///   - `FilePath`:            `"/home/user/project/src/app.js"`
///   - `CoveragePercentage`:  `0.75` — fraction of executable lines hit
///   - `LineExecutionCounts`: `[null, 3, null, 0, ...]` — one entry per
///     source line, `null` for lines that are not executable
///
/// Other members (e.g. `SourceLines`) are ignored.
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::Value;

use crate::error::{ConvertError, Result};
use crate::model::{CoverageRecord, CoverageReport};
use crate::parsers::Parser;

/// Placeholder member name for errors about the document as a whole.
const ROOT_MEMBER: &str = "(root)";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct ChutzpahParser;

impl Parser for ChutzpahParser {
    fn parse(&self, input: &[u8]) -> Result<CoverageReport> {
        parse(input)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEntry {
    file_path: String,
    coverage_percentage: f64,
    line_execution_counts: Vec<Option<u64>>,
}

/// Parse a Chutzpah report from raw bytes. Records keep document order.
pub fn parse(input: &[u8]) -> Result<CoverageReport> {
    // .NET tooling commonly writes a byte order mark.
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

    let mut report = CoverageReport::new();
    let mut schema_err: Option<ConvertError> = None;

    let mut deser = serde_json::Deserializer::from_slice(input);
    let visitor = ChutzpahVisitor {
        records: &mut report.records,
        schema_err: &mut schema_err,
    };
    let outcome =
        serde::Deserializer::deserialize_map(&mut deser, visitor).and_then(|()| deser.end());

    match outcome {
        Ok(()) => Ok(report),
        Err(e) => match schema_err {
            // The visitor already recorded the offending member.
            Some(err) => Err(err),
            None => Err(classify(e)),
        },
    }
}

/// Content-based check: a JSON object mentioning `LineExecutionCounts`.
pub fn looks_like_chutzpah(content: &[u8]) -> bool {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let head = super::sniff_head(content);
    let trimmed = head.trim_start();
    trimmed.starts_with('{') && trimmed.contains("\"LineExecutionCounts\"")
}

fn classify(err: serde_json::Error) -> ConvertError {
    match err.classify() {
        Category::Syntax | Category::Eof => ConvertError::Parse(err),
        Category::Data => ConvertError::schema(ROOT_MEMBER, err.to_string()),
        Category::Io => ConvertError::Io(err.into()),
    }
}

/// Serde visitor that walks the top-level `{ member: entry }` map in
/// document order, converting each entry into a `CoverageRecord`.
struct ChutzpahVisitor<'a> {
    records: &'a mut Vec<CoverageRecord>,
    schema_err: &'a mut Option<ConvertError>,
}

impl<'de, 'a> serde::de::Visitor<'de> for ChutzpahVisitor<'a> {
    type Value = ();

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a Chutzpah coverage object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        while let Some(member) = map.next_key::<String>()? {
            let entry: Value = map.next_value()?;
            match parse_entry(&member, entry) {
                Ok(record) => self.records.push(record),
                Err(e) => {
                    let msg = e.to_string();
                    *self.schema_err = Some(e);
                    return Err(serde::de::Error::custom(msg));
                }
            }
        }
        Ok(())
    }
}

fn parse_entry(member: &str, entry: Value) -> Result<CoverageRecord> {
    let raw: RawEntry =
        serde_json::from_value(entry).map_err(|e| ConvertError::schema(member, e.to_string()))?;
    Ok(CoverageRecord::new(
        raw.file_path,
        raw.coverage_percentage,
        raw.line_execution_counts,
    ))
}
