//! Command-line interface for centerline simplification.
//!
//! The `run` command loads a node table and a segment table, simplifies the
//! network and writes the result tables into an output directory.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, OutputFormat, RunCommand, load_config,
    render_summary, run_cli,
};

#[cfg(test)]
mod tests;
