use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use super::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const NODES: &str = "\
node_id,x,y,jurisdiction
1,0,0,MN
2,100,0,MN
3,200,0,MN
4,300,0,MN
5,0,300,MN
6,300,300,MN
";

const SEGMENTS: &str = "\
segment_id,street,from_node,to_node,excluded,ramp
10,MAIN STREET,1,2,false,false
11,MAIN STREET,2,3,false,false
12,MAIN STREET,3,4,false,false
13,1 AVENUE,1,5,false,false
14,2 AVENUE,4,6,false,false
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn run_args(dir: &TempDir, extra: &[&str]) -> Result<Cli, Box<dyn std::error::Error>> {
    let nodes = write_file(dir, "nodes.csv", NODES)?;
    let segments = write_file(dir, "segments.csv", SEGMENTS)?;
    let output = dir.path().join("out");
    let mut args: Vec<String> = vec![
        "clion".into(),
        "run".into(),
        "--nodes".into(),
        nodes.display().to_string(),
        "--segments".into(),
        segments.display().to_string(),
        "--output".into(),
        output.display().to_string(),
    ];
    args.extend(extra.iter().map(|arg| (*arg).to_string()));
    Ok(Cli::try_parse_from(args)?)
}

#[rstest]
fn run_writes_tables_and_reports_counts() -> TestResult {
    let dir = TempDir::new()?;
    let summary = run_cli(run_args(&dir, &[])?)?;

    assert_eq!(summary.summary.nodes, 6);
    assert_eq!(summary.summary.masters, 2);
    assert!(summary.diagnostics.is_empty());
    let node_master = fs::read_to_string(dir.path().join("out").join("node_master.csv"))?;
    assert_eq!(node_master, "node_id,master_id\n1,1\n4,4\n");
    Ok(())
}

#[rstest]
fn proximity_override_merges_distant_crossings() -> TestResult {
    let dir = TempDir::new()?;
    let summary = run_cli(run_args(&dir, &["--proximity-radius", "400"])?)?;
    assert_eq!(summary.summary.masters, 1);
    Ok(())
}

#[rstest]
fn config_file_is_applied_before_overrides() -> TestResult {
    let dir = TempDir::new()?;
    let config = write_file(&dir, "clion.toml", "proximity_radius = 400.0\n")?;
    let config = config.display().to_string();

    let merged = run_cli(run_args(&dir, &["--config", &config])?)?;
    assert_eq!(merged.summary.masters, 1);

    let overridden = run_cli(run_args(
        &dir,
        &["--config", &config, "--proximity-radius", "75"],
    )?)?;
    assert_eq!(overridden.summary.masters, 2);
    Ok(())
}

#[rstest]
#[case::unknown_key("proximity = 10.0\n")]
#[case::wrong_type("proximity_radius = \"far\"\n")]
fn invalid_config_file_is_rejected(#[case] contents: &str) -> TestResult {
    let dir = TempDir::new()?;
    let path = write_file(&dir, "clion.toml", contents)?;
    let err = match load_config(Some(&path)) {
        Ok(_) => panic!("configuration must be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, CliError::ConfigParse { .. }));
    Ok(())
}

#[rstest]
fn missing_config_file_is_an_io_error() {
    let err = match load_config(Some(Path::new("/nonexistent/clion.toml"))) {
        Ok(_) => panic!("missing file must fail"),
        Err(err) => err,
    };
    assert!(matches!(err, CliError::ConfigIo { .. }));
}

#[rstest]
fn negative_override_is_rejected_by_core() -> TestResult {
    let dir = TempDir::new()?;
    let err = match run_cli(run_args(&dir, &["--triangle-distance=-5"])?) {
        Ok(_) => panic!("negative distance must fail"),
        Err(err) => err,
    };
    assert!(matches!(
        err,
        CliError::Core(clion_core::Error::InvalidConfig(_))
    ));
    Ok(())
}

#[rstest]
#[case(OutputFormat::Text, "masters: 2")]
#[case(OutputFormat::Json, "\"masters\": 2")]
fn render_summary_supports_both_formats(
    #[case] format: OutputFormat,
    #[case] expected: &str,
) -> TestResult {
    let dir = TempDir::new()?;
    let summary = run_cli(run_args(&dir, &[])?)?;
    let mut buffer = Vec::new();
    render_summary(&summary, format, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.contains(expected), "{text}");
    Ok(())
}

#[rstest]
fn clap_requires_input_tables() {
    assert!(Cli::try_parse_from(["clion", "run", "--output", "out"]).is_err());
}
