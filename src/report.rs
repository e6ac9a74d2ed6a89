//! Cobertura XML output.
//!
//! The document layout is fixed: one `<package>` spanning the whole report,
//! one `<class>` per source file in input order, and a `<line>` for every
//! executable line.

use std::fs::File;
use std::io::Write;
use std::path::{Path, MAIN_SEPARATOR};

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::model::CoverageRecord;

/// System identifier of the Cobertura coverage-03 DTD.
pub const COBERTURA_DTD: &str = "http://cobertura.sourceforge.net/xml/coverage-03.dtd";

const VERSION: &str = "3.0";
const BRANCH_RATE: &str = "1.0";
const COMPLEXITY: &str = "0.0";

/// Source of the `timestamp` attribute.
pub trait Clock {
    /// Current time as 100-nanosecond ticks since 0001-01-01T00:00:00.
    fn ticks(&self) -> i64;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn ticks(&self) -> i64 {
        ticks_at(Local::now().naive_local())
    }
}

/// Always reports the same tick count.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn ticks(&self) -> i64 {
        self.0
    }
}

/// Convert a wall-clock time into 100ns ticks since 0001-01-01T00:00:00.
#[must_use]
pub fn ticks_at(at: NaiveDateTime) -> i64 {
    const TICKS_PER_SECOND: i64 = 10_000_000;
    const TICKS_PER_DAY: i64 = 86_400 * TICKS_PER_SECOND;

    // num_days_from_ce() is 1 for 0001-01-01.
    let days = i64::from(at.date().num_days_from_ce()) - 1;
    let time = at.time();
    let time_of_day = i64::from(time.num_seconds_from_midnight()) * TICKS_PER_SECOND
        + i64::from(time.nanosecond() / 100);
    days.saturating_mul(TICKS_PER_DAY).saturating_add(time_of_day)
}

/// Render a rate using the shortest representation that round-trips.
fn format_rate(value: f64) -> String {
    value.to_string()
}

/// Writes coverage records as a Cobertura XML document.
pub struct CoberturaWriter<'a> {
    base_dir: &'a Path,
    clock: &'a dyn Clock,
}

impl<'a> CoberturaWriter<'a> {
    pub fn new(base_dir: &'a Path, clock: &'a dyn Clock) -> Self {
        Self { base_dir, clock }
    }

    /// Render the complete document into memory.
    pub fn render(&self, records: &[CoverageRecord], line_rate: f64) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_document(&mut writer, records, line_rate)?;
        let mut out = writer.into_inner();
        out.push(b'\n');
        Ok(out)
    }

    /// Render the document and write it to `dest`.
    ///
    /// Nothing is created until rendering has succeeded, and a file that
    /// fails mid-write is removed.
    pub fn write_to_path(
        &self,
        records: &[CoverageRecord],
        line_rate: f64,
        dest: &Path,
    ) -> Result<()> {
        let bytes = self.render(records, line_rate)?;
        let write_err = |source| ConvertError::Write {
            path: dest.to_path_buf(),
            source,
        };

        let mut file = File::create(dest).map_err(write_err)?;
        if let Err(source) = file.write_all(&bytes).and_then(|()| file.flush()) {
            drop(file);
            if let Err(e) = std::fs::remove_file(dest) {
                warn!(path = %dest.display(), "could not remove partial output: {e}");
            }
            return Err(write_err(source));
        }

        debug!(path = %dest.display(), bytes = bytes.len(), "wrote Cobertura report");
        Ok(())
    }

    fn write_document<W: Write>(
        &self,
        writer: &mut Writer<W>,
        records: &[CoverageRecord],
        line_rate: f64,
    ) -> Result<()> {
        let line_rate = format_rate(line_rate);
        let timestamp = self.clock.ticks().to_string();
        let doctype = format!("coverage SYSTEM \"{COBERTURA_DTD}\"");

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::DocType(BytesText::from_escaped(doctype)))?;

        writer.write_event(Event::Start(BytesStart::new("coverage").with_attributes([
            ("line-rate", line_rate.as_str()),
            ("branch-rate", BRANCH_RATE),
            ("version", VERSION),
            ("timestamp", timestamp.as_str()),
        ])))?;

        writer.write_event(Event::Start(BytesStart::new("sources")))?;
        writer
            .create_element("source")
            .write_text_content(BytesText::new(&self.base_dir.display().to_string()))?;
        writer.write_event(Event::End(BytesEnd::new("sources")))?;

        writer.write_event(Event::Start(BytesStart::new("packages")))?;
        writer.write_event(Event::Start(BytesStart::new("package").with_attributes([
            ("name", ""),
            ("line-rate", line_rate.as_str()),
            ("branch-rate", BRANCH_RATE),
            ("complexity", COMPLEXITY),
        ])))?;
        writer.write_event(Event::Start(BytesStart::new("classes")))?;

        for record in records {
            self.write_class(writer, record)?;
        }

        writer.write_event(Event::End(BytesEnd::new("classes")))?;
        writer.write_event(Event::End(BytesEnd::new("package")))?;
        writer.write_event(Event::End(BytesEnd::new("packages")))?;
        writer.write_event(Event::End(BytesEnd::new("coverage")))?;
        Ok(())
    }

    fn write_class<W: Write>(&self, writer: &mut Writer<W>, record: &CoverageRecord) -> Result<()> {
        let name = class_name(&record.path);
        let filename = self.relative_filename(&record.path);
        let line_rate = format_rate(record.coverage);

        writer.write_event(Event::Start(BytesStart::new("class").with_attributes([
            ("name", name.as_str()),
            ("filename", filename.as_str()),
            ("line-rate", line_rate.as_str()),
            ("branch-rate", BRANCH_RATE),
            ("complexity", COMPLEXITY),
        ])))?;

        writer.create_element("methods").write_empty()?;

        writer.write_event(Event::Start(BytesStart::new("lines")))?;
        for line in record.lines() {
            let number = line.line_number.to_string();
            let hits = line.hit_count.to_string();
            writer
                .create_element("line")
                .with_attributes([("number", number.as_str()), ("hits", hits.as_str())])
                .write_empty()?;
        }
        writer.write_event(Event::End(BytesEnd::new("lines")))?;

        writer.write_event(Event::End(BytesEnd::new("class")))?;
        Ok(())
    }

    /// Path of `path` below the base directory, rooted with the platform
    /// separator (`/proj` + `/proj/src/foo.js` → `/src/foo.js`,
    /// `C:\proj` + `C:\proj\src\foo.js` → `\src\foo.js`).
    ///
    /// Paths outside the base directory are returned unchanged.
    fn relative_filename(&self, path: &str) -> String {
        match Path::new(path).strip_prefix(self.base_dir) {
            Ok(rel) => format!("{MAIN_SEPARATOR}{}", rel.display()),
            Err(_) => {
                warn!(
                    path,
                    base_dir = %self.base_dir.display(),
                    "file is outside the base directory; keeping its full path"
                );
                path.to_string()
            }
        }
    }
}

/// Final path component, or the whole path if it has none.
fn class_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
