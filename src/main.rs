//! CLI entry point for centerline simplification.
//!
//! Parses arguments with clap, runs the simplification, prints the run summary
//! to stdout and maps failures to a non-zero exit code. Logging goes to stderr.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use clion::cli::{Cli, Command, render_summary, run_cli};
use clion::logging::{self, LoggingError};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let Command::Run(run) = &cli.command;
    let format = run.format;
    let summary = run_cli(cli).context("failed to simplify network")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, format, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        error!("command execution failed: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
