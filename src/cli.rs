//! Command handler for the chutzpah-cobertura CLI.
//!
//! `cmd_convert` returns its output as a `String`, making it easy to test
//! without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregate::AggregateKind;
use crate::convert::{self, ReportOptions};
use crate::report::Clock;

pub fn cmd_convert(
    input: &Path,
    output: &Path,
    base_dir: &Path,
    aggregate: AggregateKind,
    clock: &dyn Clock,
) -> Result<String> {
    let options = ReportOptions {
        base_dir: base_dir.to_path_buf(),
        aggregate,
    };
    let summary = convert::convert_file(input, output, &options, clock)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    Ok(format!(
        "Converted {} files from {} → {} (line-rate: {})\n",
        summary.files,
        input.display(),
        output.display(),
        summary.line_rate,
    ))
}
