use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clion_core::model::Diagnostic;
use clion_core::{
    NetworkSource, RunSummary, SimplifyConfig, export::write_outputs, load_street_network,
    simplify_network,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "clion",
    about = "Simplify a street centerline network into blocks and master intersections."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Simplify a network and write the result tables.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Node table (`node_id,x,y,jurisdiction[,levels]`).
    #[arg(long)]
    pub nodes: PathBuf,

    /// Segment table (`segment_id,street,from_node,to_node,excluded,ramp`).
    #[arg(long)]
    pub segments: PathBuf,

    /// Directory receiving the result tables.
    #[arg(long, short)]
    pub output: PathBuf,

    /// TOML file with simplification settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides `split_tolerance` from the configuration.
    #[arg(long)]
    pub split_tolerance: Option<f64>,

    /// Overrides `proximity_radius` from the configuration.
    #[arg(long)]
    pub proximity_radius: Option<f64>,

    /// Overrides `triangle_distance` from the configuration.
    #[arg(long)]
    pub triangle_distance: Option<f64>,

    /// How the run summary is printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read configuration `{path}`: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration `{path}`: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Core(#[from] clion_core::Error),
}

/// Outcome of a `run` command.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionSummary {
    pub output: PathBuf,
    pub summary: RunSummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Executes the command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the configuration, the input tables or the output
/// directory cannot be used.
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => run_command(run),
    }
}

fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(value) = command.split_tolerance {
        config.split_tolerance = value;
    }
    if let Some(value) = command.proximity_radius {
        config.proximity_radius = value;
    }
    if let Some(value) = command.triangle_distance {
        config.triangle_distance = value;
    }

    let source = NetworkSource {
        nodes_path: command.nodes,
        segments_path: command.segments,
    };
    let network = load_street_network(&source)?;
    let result = simplify_network(&network, &config)?;
    write_outputs(&result, &command.output)?;

    if !result.diagnostics.is_empty() {
        warn!(
            count = result.diagnostics.len(),
            "run finished with diagnostics"
        );
    }
    info!(output = %command.output.display(), "result tables written");

    Ok(ExecutionSummary {
        output: command.output,
        summary: result.summary,
        diagnostics: result.diagnostics,
    })
}

/// Reads simplification settings from `path`, or the defaults when no file is
/// given. Missing keys keep their default values.
///
/// # Errors
/// Returns [`CliError`] if the file cannot be read or is not valid TOML for
/// [`SimplifyConfig`].
pub fn load_config(path: Option<&std::path::Path>) -> Result<SimplifyConfig, CliError> {
    let Some(path) = path else {
        return Ok(SimplifyConfig::default());
    };
    let raw = fs::read_to_string(path).map_err(|source| CliError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `summary` to `writer` as text or JSON.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_summary(
    summary: &ExecutionSummary,
    format: OutputFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer)
        }
        OutputFormat::Text => {
            let counts = &summary.summary;
            writeln!(writer, "output: {}", summary.output.display())?;
            writeln!(
                writer,
                "nodes: {} ({} intersections, {} on double segments)",
                counts.nodes, counts.intersections, counts.double_segment_nodes
            )?;
            writeln!(
                writer,
                "segments: {} ({} usable)",
                counts.segments, counts.usable_segments
            )?;
            writeln!(
                writer,
                "blocks: {} ({} traced)",
                counts.blocks, counts.traced_blocks
            )?;
            writeln!(
                writer,
                "masters: {} ({} name clusters, {} refine rounds)",
                counts.masters, counts.clusters, counts.refine_rounds
            )?;
            writeln!(writer, "diagnostics: {}", counts.diagnostics)?;
            for diagnostic in &summary.diagnostics {
                writeln!(writer, "  {}: {diagnostic}", diagnostic.kind())?;
            }
            Ok(())
        }
    }
}
