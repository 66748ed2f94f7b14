use crate::models::Verbosity;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGING_READY: AtomicBool = AtomicBool::new(false);

/// Prefix of rolling log files written under `--log-dir`
pub const LOG_PREFIX: &str = "assetbundler";

/// Build the level filter for `verbosity`.
///
/// `RUST_LOG` wins when it is set and parses.
pub fn build_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()))
}

/// Setup console logging with an optional rotating file appender.
///
/// Console output goes to stderr so that `--list-bundles` and
/// `--dump-config` keep stdout clean. With `log_dir` set, logs are also
/// written there with daily rotation.
///
/// # Arguments
/// * `verbosity` - Console and file level (quiet → warn ... debug → trace)
/// * `log_dir` - Directory for log files, if file logging is wanted
///
/// # Returns
/// A guard that must be held for the duration of the program when file
/// logging is active
pub fn setup_logging(verbosity: Verbosity, log_dir: Option<&Utf8Path>) -> Result<Option<WorkerGuard>> {
    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(build_filter(verbosity))
            .with(console_layer(verbosity))
            .try_init()
            .context("Failed to initialize logging")?;
        LOGGING_READY.store(true, Ordering::Release);
        return Ok(None);
    };

    create_log_dir(log_dir)?;

    let file_appender = rolling::daily(log_dir, LOG_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(build_filter(verbosity))
        .with(file_layer(non_blocking))
        .with(console_layer(verbosity))
        .try_init()
        .context("Failed to initialize logging")?;
    LOGGING_READY.store(true, Ordering::Release);

    tracing::debug!(
        "Logging initialized: dir={}, prefix={}, verbosity={:?}",
        log_dir,
        LOG_PREFIX,
        verbosity
    );

    Ok(Some(guard))
}

/// Where [`report_fatal`] sent an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalSink {
    Log,
    Stderr,
}

/// Report an error that ends the program exactly once.
///
/// Goes through the installed subscriber, which already writes to stderr, or
/// straight to stderr when logging never came up.
pub fn report_fatal(error: &anyhow::Error) -> FatalSink {
    if LOGGING_READY.load(Ordering::Acquire) {
        tracing::error!("{:#}", error);
        FatalSink::Log
    } else {
        eprintln!("Error: {:#}", error);
        FatalSink::Stderr
    }
}

/// Stderr layer, built per subscriber stack it is added to
fn console_layer<S>(verbosity: Verbosity) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(verbosity == Verbosity::Debug)
}

fn file_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
}

fn create_log_dir(log_dir: &Utf8Path) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}
