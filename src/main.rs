use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use chutzpah_cobertura::aggregate::AggregateKind;
use chutzpah_cobertura::cli;
use chutzpah_cobertura::report::SystemClock;

/// chutzpah-cobertura — Convert a Chutzpah JSON coverage report to Cobertura XML.
#[derive(Parser)]
#[command(name = "chutzpah-cobertura", version, about)]
struct Cli {
    /// Path to the Chutzpah JSON coverage report.
    input: PathBuf,

    /// Path of the Cobertura XML file to write. Its directory must exist.
    output: PathBuf,

    /// Directory that class filenames are relative to (default: current directory).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// How per-file coverage is combined into the overall line-rate.
    #[arg(long, value_enum, default_value_t = AggregateKind::Product)]
    aggregate: AggregateKind,

    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let out = cli::cmd_convert(
        &cli.input,
        &cli.output,
        &base_dir,
        cli.aggregate,
        &SystemClock,
    )?;
    print!("{out}");
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
