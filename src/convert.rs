use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aggregate::AggregateKind;
use crate::error::{ConvertError, Result};
use crate::parsers::chutzpah::{looks_like_chutzpah, ChutzpahParser};
use crate::parsers::Parser;
use crate::report::{Clock, CoberturaWriter};

/// Settings for a single conversion.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Directory that class filenames are made relative to. Also emitted as
    /// the report's `<source>`.
    pub base_dir: PathBuf,
    pub aggregate: AggregateKind,
}

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub files: usize,
    pub line_rate: f64,
}

/// Read a Chutzpah report from `input`, and write the Cobertura report to
/// `output`. The output file is only created once the input has been fully
/// parsed.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ReportOptions,
    clock: &dyn Clock,
) -> Result<ConversionSummary> {
    if !input.is_file() {
        return Err(ConvertError::InputNotFound(input.to_path_buf()));
    }

    let content = std::fs::read(input)?;
    debug!(path = %input.display(), bytes = content.len(), "read input");

    let report = ChutzpahParser.parse(&content).inspect_err(|_| {
        if !looks_like_chutzpah(&content) {
            warn!(path = %input.display(), "input does not look like a Chutzpah coverage report");
        }
    })?;

    let line_rate = options.aggregate.aggregator().aggregate(&report.records);
    info!(
        files = report.len(),
        line_rate,
        aggregate = %options.aggregate,
        "computed aggregate coverage"
    );

    CoberturaWriter::new(&options.base_dir, clock).write_to_path(
        &report.records,
        line_rate,
        output,
    )?;

    Ok(ConversionSummary {
        files: report.len(),
        line_rate,
    })
}
