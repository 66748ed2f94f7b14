use crate::config::{ResolvedBundle, ResolvedConfiguration};
use crate::models::{JobDescriptor, JobFile};
use crate::services::fs::FileSystem;
use crate::services::launcher::LauncherControl;
use crate::services::linking::{LinkError, normalize_source};
use crate::services::outputs::{summarize_assets, verify_outputs};
use crate::services::process::{ProcessCommand, ProcessOutput, ProcessRunner};
use crate::services::workspace::{JOB_FILE_NAME, WorkspaceManager, staging_path};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Editor entry point that reads the job file and builds every bundle
pub const EXECUTE_METHOD: &str = "AssetBundler.Editor.BundleBuilder.BuildFromConfig";

/// Flags that keep the editor unattended and make it exit when done
pub const BATCH_FLAGS: [&str; 3] = ["-batchmode", "-nographics", "-quit"];

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    ResolvingBundles,
    StagingWorkspace,
    InvokingExternalTool,
    InterpretingResult,
    CleaningUp,
    Success,
    Failure,
}

/// Failures that abort a run before the editor result is known
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No bundles selected for building")]
    NoBundles,

    #[error("Bundle '{bundle}' has no {field}")]
    MissingField {
        bundle: String,
        field: &'static str,
    },

    #[error("Unity editor path is not configured and could not be detected")]
    EditorNotConfigured,

    #[error("Failed to stage workspace: {0}")]
    Staging(#[from] LinkError),

    #[error("Failed to serialize job file: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write job file {path}: {source}")]
    JobFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run editor {path}: {source}")]
    Spawn {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How the editor invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    /// The editor exited non-zero; every job of the run counts as failed
    Failed { exit_code: i32 },
}

/// Result of a run that reached the editor
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    pub jobs: Vec<JobDescriptor>,
    pub workspace: Utf8PathBuf,
    pub command: ProcessCommand,
    pub output: ProcessOutput,
    /// Expected artifacts not found after a successful run
    pub missing_artifacts: Vec<Utf8PathBuf>,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.outcome == BuildOutcome::Succeeded
    }

    /// Process exit code for this report: 0 on success, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }
}

/// Drives one build: jobs → workspace → Hub → editor → result → cleanup.
///
/// Every external effect goes through an injected collaborator
/// ([`FileSystem`], [`ProcessRunner`], [`LauncherControl`]) so tests can run a
/// whole build against fakes.
pub struct BuildOrchestrator {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn ProcessRunner>,
    launcher: Arc<dyn LauncherControl>,
    workspaces: WorkspaceManager,
    phase: BuildPhase,
}

impl BuildOrchestrator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn ProcessRunner>,
        launcher: Arc<dyn LauncherControl>,
        temp_root: Utf8PathBuf,
    ) -> Self {
        let workspaces = WorkspaceManager::new(fs.clone(), temp_root);
        Self {
            fs,
            runner,
            launcher,
            workspaces,
            phase: BuildPhase::Idle,
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Expand the resolved bundles into job descriptors.
    ///
    /// One job per bundle and target, or a single target-free job for a
    /// targetless bundle. Bundles sharing an asset directory share its staged
    /// location, named after the first of them.
    pub fn build_jobs(config: &ResolvedConfiguration) -> Result<Vec<JobDescriptor>, BuildError> {
        let mut staged: HashMap<Utf8PathBuf, String> = HashMap::new();
        let mut jobs = Vec::new();

        for bundle in config.bundles() {
            let assets = bundle
                .assets_directory
                .clone()
                .ok_or_else(|| missing_field(bundle, "assets_directory"))?;
            let output = bundle
                .effective_output_directory()
                .map(Utf8Path::to_path_buf)
                .ok_or_else(|| missing_field(bundle, "output_directory"))?;

            let identifier = staged
                .entry(normalize_source(&assets))
                .or_insert_with(|| bundle.name.clone())
                .clone();

            let describe = |targets: Option<Vec<String>>| JobDescriptor {
                bundle_name: bundle.name.clone(),
                bundle_path: staging_path(&identifier),
                asset_directory: assets.clone(),
                output_directory: output.clone(),
                build_targets: targets,
                no_platform_suffix: bundle.targetless,
                filename_format: bundle.filename_format.clone(),
                include_patterns: bundle.include_patterns.clone(),
                exclude_patterns: bundle.exclude_patterns.clone(),
                texture_types: bundle.texture_types.clone(),
            };

            if bundle.targetless {
                jobs.push(describe(None));
            } else {
                for target in &bundle.build_targets {
                    jobs.push(describe(Some(vec![target.clone()])));
                }
            }
        }

        if jobs.is_empty() {
            return Err(BuildError::NoBundles);
        }
        Ok(jobs)
    }

    /// The single editor command line covering every job of the run
    pub fn build_command(
        editor: &Utf8Path,
        workspace: &Utf8Path,
        job_file: &Utf8Path,
        log_file: Option<&Utf8Path>,
    ) -> ProcessCommand {
        let mut command = ProcessCommand::new(editor);
        for flag in BATCH_FLAGS {
            command = command.arg(flag);
        }
        if let Some(log_file) = log_file {
            command = command.arg("-logfile").arg(log_file.as_str());
        }
        command
            .arg("-projectPath")
            .arg(workspace.as_str())
            .arg("-executeMethod")
            .arg(EXECUTE_METHOD)
            .arg("-bundleConfigFile")
            .arg(job_file.as_str())
    }

    /// Workspace location for a run: the configured override, or the
    /// hash-derived path for its jobs
    pub fn workspace_path(&self, config: &ResolvedConfiguration, jobs: &[JobDescriptor]) -> Utf8PathBuf {
        config
            .global()
            .temp_project_path
            .clone()
            .unwrap_or_else(|| self.workspaces.derive_path_for_jobs(jobs))
    }

    /// Run a complete build.
    ///
    /// Errors are returned for anything that stops the run before the editor
    /// finishes. A non-zero editor exit is not an error: it comes back as a
    /// [`BuildReport`] with [`BuildOutcome::Failed`].
    pub async fn run(&mut self, config: &ResolvedConfiguration) -> Result<BuildReport, BuildError> {
        self.phase = BuildPhase::ResolvingBundles;
        let jobs = match Self::build_jobs(config) {
            Ok(jobs) => jobs,
            Err(e) => {
                self.phase = BuildPhase::Failure;
                return Err(e);
            }
        };
        let Some(editor) = config.unity_path().map(Utf8Path::to_path_buf) else {
            self.phase = BuildPhase::Failure;
            return Err(BuildError::EditorNotConfigured);
        };

        tracing::info!(
            "Building {} job(s) for {} bundle(s)",
            jobs.len(),
            config.bundles().len()
        );
        self.log_asset_selection(config.bundles());

        let workspace = self.workspace_path(config, &jobs);
        let clean = config.clean_temp_project();
        let mut started_launcher = false;

        let result = self
            .stage_and_invoke(config, jobs, &workspace, &editor, &mut started_launcher)
            .await;

        self.phase = BuildPhase::CleaningUp;
        if started_launcher {
            if let Err(e) = self.launcher.stop().await {
                tracing::warn!("Failed to stop Hub: {}", e);
            }
        }
        self.workspaces.cleanup(&workspace, clean);

        self.phase = match &result {
            Ok(report) if report.success() => BuildPhase::Success,
            _ => BuildPhase::Failure,
        };
        result
    }

    async fn stage_and_invoke(
        &mut self,
        config: &ResolvedConfiguration,
        jobs: Vec<JobDescriptor>,
        workspace: &Utf8Path,
        editor: &Utf8Path,
        started_launcher: &mut bool,
    ) -> Result<BuildReport, BuildError> {
        self.phase = BuildPhase::StagingWorkspace;
        self.workspaces.prepare(
            workspace,
            &jobs,
            config.link_method(),
            config.clean_temp_project(),
            config.global().editor_scripts_directory.as_deref(),
        )?;

        let job_file = workspace.join(JOB_FILE_NAME);
        let jobs_json = JobFile::new(jobs.clone()).to_json()?;
        self.fs
            .write(&job_file, jobs_json.as_bytes())
            .map_err(|source| BuildError::JobFile {
                path: job_file.clone(),
                source,
            })?;
        tracing::debug!("Wrote job file {}", job_file);

        if config.is_ci() {
            tracing::debug!("CI mode: leaving the Hub alone");
        } else {
            *started_launcher = self.ensure_launcher(config).await;
        }

        self.phase = BuildPhase::InvokingExternalTool;
        let command = Self::build_command(
            editor,
            workspace,
            &job_file,
            config.global().log_file.as_deref(),
        );
        let output = self
            .runner
            .run(command.clone())
            .await
            .map_err(|source| BuildError::Spawn {
                path: editor.to_path_buf(),
                source,
            })?;

        self.phase = BuildPhase::InterpretingResult;
        if !output.stdout.is_empty() {
            tracing::debug!("Editor stdout:\n{}", output.stdout);
        }
        if !output.stderr.is_empty() {
            tracing::debug!("Editor stderr:\n{}", output.stderr);
        }

        let (outcome, missing_artifacts) = if output.success() {
            tracing::info!("Editor finished successfully");
            let missing = verify_outputs(self.fs.as_ref(), &jobs);
            (BuildOutcome::Succeeded, missing)
        } else {
            // Per-bundle attribution is not possible from one process exit
            tracing::error!(
                "Editor exited with code {}; all {} job(s) failed",
                output.exit_code,
                jobs.len()
            );
            (
                BuildOutcome::Failed {
                    exit_code: output.exit_code,
                },
                Vec::new(),
            )
        };

        Ok(BuildReport {
            outcome,
            jobs,
            workspace: workspace.to_path_buf(),
            command,
            output,
            missing_artifacts,
        })
    }

    /// Start the Hub when it is not running; true when this run started it
    async fn ensure_launcher(&self, config: &ResolvedConfiguration) -> bool {
        if self.launcher.is_running().await {
            tracing::debug!("Hub already running");
            return false;
        }

        let Some(hub) = config.hub_path() else {
            tracing::warn!("Hub is not running and no hub_path is configured");
            return false;
        };

        match self.launcher.start(hub.to_path_buf()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to start Hub {}: {}", hub, e);
                false
            }
        }
    }

    fn log_asset_selection(&self, bundles: &[ResolvedBundle]) {
        for bundle in bundles {
            let Some(assets) = bundle.assets_directory.as_deref() else {
                continue;
            };
            if !self.fs.is_dir(assets) {
                continue;
            }

            match summarize_assets(
                self.fs.as_ref(),
                assets,
                &bundle.include_patterns,
                &bundle.exclude_patterns,
            ) {
                Ok(selection) if selection.selected == 0 => tracing::warn!(
                    "Bundle '{}': include/exclude patterns select none of {} files in {}",
                    bundle.name,
                    selection.total,
                    assets
                ),
                Ok(selection) => tracing::info!(
                    "Bundle '{}': {} of {} files selected",
                    bundle.name,
                    selection.selected,
                    selection.total
                ),
                Err(e) => tracing::warn!("Bundle '{}': {}", bundle.name, e),
            }
        }
    }
}

fn missing_field(bundle: &ResolvedBundle, field: &'static str) -> BuildError {
    BuildError::MissingField {
        bundle: bundle.name.clone(),
        field,
    }
}
