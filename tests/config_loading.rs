mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use rewatch::cli::CliArgs;
use rewatch::config::{load_from_path, load_settings, OutputMode};
use rewatch::errors::RewatchError;

type TestResult = Result<(), Box<dyn Error>>;

fn config_file(contents: &str) -> Result<tempfile::NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn config_file_supplies_defaults_and_cli_flags_win() -> TestResult {
    init_tracing();
    let file = config_file(
        r#"
[compiler]
command = "mycc --stdin"
source_ext = "lang"
target_ext = "js"

[output]
target_dir = "build"
"#,
    )?;
    let config = file.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from(["rewatch", "--config", &config, "proj"])?;
    let settings = load_settings(&args)?;
    assert_eq!(settings.compiler_cmd.as_deref(), Some("mycc --stdin"));
    assert_eq!(settings.source_ext, "lang");
    assert_eq!(settings.target_ext, "js");
    assert_eq!(settings.target_dir, PathBuf::from("build"));
    assert_eq!(settings.output_mode, OutputMode::Files);

    let args = CliArgs::try_parse_from([
        "rewatch", "--config", &config, "-t", "dist", "-c", "other", "-p", "-w", "proj",
    ])?;
    let settings = load_settings(&args)?;
    assert_eq!(settings.compiler_cmd.as_deref(), Some("other"));
    assert_eq!(settings.target_dir, PathBuf::from("dist"));
    assert_eq!(settings.output_mode, OutputMode::Print);
    assert!(settings.watch);
    Ok(())
}

#[test]
fn unknown_config_keys_are_rejected() -> TestResult {
    init_tracing();
    let file = config_file("[compiler]\ncommnd = \"typo\"\n")?;

    let err = load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, RewatchError::TomlError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn explicit_config_path_must_exist() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.toml");
    let missing = missing.to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from(["rewatch", "--config", &missing, "-c", "cc", "proj"])?;
    assert!(matches!(load_settings(&args), Err(RewatchError::IoError(_))));
    Ok(())
}

#[test]
fn output_file_cannot_be_combined_with_watch() -> TestResult {
    init_tracing();
    let file = config_file("")?;
    let config = file.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from([
        "rewatch", "--config", &config, "-c", "cc", "-w", "-o", "a.out", "a.src",
    ])?;
    assert!(matches!(load_settings(&args), Err(RewatchError::ConfigError(_))));
    Ok(())
}
