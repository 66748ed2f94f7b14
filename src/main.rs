//! AssetBundler - build Unity asset bundles from plain asset directories
//!
//! Main entry point for the command-line tool.
//!
//! # Execution Flow
//!
//! 1. Parse arguments; `CI` in the environment implies `--ci`
//! 2. Initialize logging (stderr, plus rotating files with `--log-dir`)
//! 3. Load the configuration file and its `extends` chain
//!    (`--config`, else `.assetbundler.toml` in the working directory)
//! 4. Resolve global ← bundle ← CLI; `--list-bundles` and `--dump-config` stop here
//! 5. Fill in the editor and Hub paths from standard install locations
//! 6. Validate, reporting every problem at once
//! 7. Run the build on a tokio runtime and exit 0 on success, 1 otherwise

use anyhow::{Context, Result, bail};
use assetbundler::cli::Cli;
use assetbundler::config::absolutize;
use assetbundler::services::detection::{detect_hub, detect_unity_editor, is_ci_environment};
use assetbundler::services::{RealFileSystem, SystemLauncher, TokioProcessRunner};
use assetbundler::{
    APP_NAME, BuildOrchestrator, BuildOutcome, CliOverrides, ConfigError, ConfigFile, ConfigLoader,
    ResolvedConfiguration, VERSION,
};
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            assetbundler::logging::report_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut overrides = CliOverrides::from(&cli);
    overrides.ci |= is_ci_environment();

    // Held until exit so buffered file logs are flushed
    let _guard = assetbundler::logging::setup_logging(overrides.verbosity, cli.log_dir.as_deref())?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    if overrides.ci {
        tracing::info!("CI mode enabled");
    }

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let cwd = Utf8PathBuf::try_from(cwd).context("Working directory is not valid UTF-8")?;

    let config_path = match &overrides.config_path {
        Some(path) => Some(absolutize(path, &cwd)),
        None => ConfigLoader::find_default(&cwd),
    };
    let file = match &config_path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            ConfigLoader::new()
                .load(path)
                .with_context(|| format!("Failed to load configuration {}", path))?
        }
        None => ConfigFile::default(),
    };

    let mut resolved = ResolvedConfiguration::resolve(config_path, file, overrides, &cwd)?;

    if resolved.cli().list_bundles {
        return list_bundles(&resolved);
    }
    if let Some(format) = resolved.cli().dump_config {
        println!("{}", resolved.dump(format)?);
        return Ok(ExitCode::SUCCESS);
    }

    fill_detected_paths(&mut resolved);

    let problems = resolved.validate();
    if !problems.is_empty() {
        return Err(ConfigError::Invalid(problems).into());
    }

    let temp_root = Utf8PathBuf::try_from(std::env::temp_dir())
        .context("System temp directory is not valid UTF-8")?;

    // Create tokio runtime for the editor subprocess and Hub control
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("assetbundler-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let mut orchestrator = BuildOrchestrator::new(
        Arc::new(RealFileSystem),
        Arc::new(TokioProcessRunner),
        Arc::new(SystemLauncher::for_hub(resolved.hub_path())),
        temp_root,
    );
    let report = runtime.block_on(orchestrator.run(&resolved))?;

    match report.outcome {
        BuildOutcome::Succeeded if report.missing_artifacts.is_empty() => {
            tracing::info!("Built {} job(s)", report.jobs.len());
        }
        BuildOutcome::Succeeded => tracing::warn!(
            "Build finished but {} expected artifact(s) are missing",
            report.missing_artifacts.len()
        ),
        BuildOutcome::Failed { exit_code } => {
            tracing::error!("Build failed (editor exit code {})", exit_code);
            if !report.output.stderr.trim().is_empty() {
                eprintln!("{}", report.output.stderr.trim_end());
            }
        }
    }

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    Ok(ExitCode::from(report.exit_code() as u8))
}

fn list_bundles(resolved: &ResolvedConfiguration) -> Result<ExitCode> {
    let Some(path) = resolved.config_path() else {
        bail!("No configuration file found; pass --config or create .assetbundler.toml");
    };

    let bundles = resolved.available_bundles();
    if bundles.is_empty() {
        println!("No bundles defined in {}", path);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Bundles in {}:", path);
    for (key, name) in bundles {
        if key.to_lowercase() == name {
            println!("  {}", key);
        } else {
            println!("  {} ({})", key, name);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn fill_detected_paths(resolved: &mut ResolvedConfiguration) {
    if resolved.unity_path().is_none() {
        if let Some(version) = resolved.global().unity_version.clone() {
            if let Some(editor) = detect_unity_editor(&version) {
                resolved.fill_unity_path(editor);
            }
        }
    }

    if !resolved.is_ci() && resolved.hub_path().is_none() {
        if let Some(hub) = detect_hub() {
            resolved.fill_hub_path(hub);
        }
    }
}
