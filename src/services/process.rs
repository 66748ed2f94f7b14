use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::fmt;
use std::time::Instant;
use tokio::process::Command;

#[cfg(test)]
use mockall::automock;

/// A command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: Utf8PathBuf,
    pub args: Vec<String>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Value following `flag` in the argument list
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status and captured streams of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external processes to completion
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command`, capturing stdout and stderr, and wait for it to exit.
    ///
    /// Fails only when the process cannot be started or awaited; a non-zero
    /// exit is reported through [`ProcessOutput::exit_code`].
    async fn run(&self, command: ProcessCommand) -> std::io::Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> std::io::Result<ProcessOutput> {
        tracing::info!("Executing: {}", command);
        let start = Instant::now();

        let child = Command::new(command.program.as_std_path())
            .args(&command.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Drains both pipes concurrently while waiting
        let output = child.wait_with_output().await?;
        let exit_code = output.status.code().unwrap_or(-1);

        tracing::info!(
            "Process completed in {:.2}s with exit code {}",
            start.elapsed().as_secs_f32(),
            exit_code
        );

        Ok(ProcessOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
