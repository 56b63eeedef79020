// src/config/validate.rs

use crate::cli::CliArgs;
use crate::config::model::{OutputMode, RawConfigFile, Settings};
use crate::errors::{Result, RewatchError};

/// Merge CLI flags over the config file and validate the result.
///
/// CLI flags win over `[compiler]` / `[output]` values.
pub fn resolve_settings(args: &CliArgs, raw: RawConfigFile) -> Result<Settings> {
    let mut settings = Settings::new(args.inputs.clone());

    settings.source_ext = args
        .source_ext
        .clone()
        .unwrap_or(raw.compiler.source_ext);
    settings.target_ext = args
        .target_ext
        .clone()
        .unwrap_or(raw.compiler.target_ext);
    if let Some(target) = args.target.clone().or(raw.output.target_dir) {
        settings.target_dir = target;
    }
    settings.compiler_cmd = args
        .compiler
        .clone()
        .or(raw.compiler.command)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    settings.output_mode = if args.print {
        OutputMode::Print
    } else {
        OutputMode::Files
    };
    settings.output_file = args.output.clone();
    settings.watch = args.watch;
    settings.dry_run = args.dry_run;

    validate_settings(&settings)?;
    Ok(settings)
}

pub fn validate_settings(settings: &Settings) -> Result<()> {
    ensure_has_roots(settings)?;
    validate_extension("source", &settings.source_ext)?;
    validate_extension("target", &settings.target_ext)?;

    if settings.source_ext == settings.target_ext {
        return Err(RewatchError::ConfigError(format!(
            "source and target extension must differ (both are '{}')",
            settings.source_ext
        )));
    }

    if settings.compiler_cmd.is_none() && !settings.dry_run {
        return Err(RewatchError::ConfigError(
            "no compiler configured: pass --compiler or set [compiler].command".to_string(),
        ));
    }

    if settings.output_file.is_some() {
        if settings.watch {
            return Err(RewatchError::ConfigError(
                "--output cannot be combined with --watch".to_string(),
            ));
        }
        if settings.prints_to_stdout() {
            return Err(RewatchError::ConfigError(
                "--output cannot be combined with --print".to_string(),
            ));
        }
    }

    Ok(())
}

fn ensure_has_roots(settings: &Settings) -> Result<()> {
    if settings.roots.is_empty() {
        return Err(RewatchError::ConfigError(
            "at least one input file or directory is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_extension(which: &str, ext: &str) -> Result<()> {
    if ext.is_empty() {
        return Err(RewatchError::ConfigError(format!(
            "{which} extension must not be empty"
        )));
    }
    if ext.starts_with('.') || ext.contains(['/', '\\']) {
        return Err(RewatchError::ConfigError(format!(
            "{which} extension '{ext}' must be a bare suffix like \"src\""
        )));
    }
    Ok(())
}
