use crate::models::{JobDescriptor, LinkMethod};
use crate::services::fs::FileSystem;
use crate::services::hash::compute_hash;
use crate::services::linking::{AssetLinker, LinkError, LinkOutcome};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;

/// Prefix of derived workspace directory names
pub const WORKSPACE_PREFIX: &str = "AssetBundler";

/// Workspace-relative directory receiving bundle sources
pub const DATA_DIR: &str = "Assets/Data";

/// Workspace-relative directory receiving editor scripts
pub const EDITOR_DIR: &str = "Assets/Editor";

/// Name of the job file written into the workspace
pub const JOB_FILE_NAME: &str = "AssetBundlerJobs.json";

/// Workspace-relative staging location for a bundle identifier
pub fn staging_path(identifier: &str) -> String {
    format!("{}/{}", DATA_DIR, identifier)
}

/// Creates, reuses and removes the staging project handed to the editor.
///
/// Workspaces live under `<temp root>/AssetBundler_<hash>`, where the hash
/// covers everything that defines a build. Identical inputs land in the same
/// directory, which is what lets a second run skip re-copying large asset
/// trees.
pub struct WorkspaceManager {
    fs: Arc<dyn FileSystem>,
    temp_root: Utf8PathBuf,
}

impl WorkspaceManager {
    pub fn new(fs: Arc<dyn FileSystem>, temp_root: Utf8PathBuf) -> Self {
        Self { fs, temp_root }
    }

    pub fn temp_root(&self) -> &Utf8Path {
        &self.temp_root
    }

    /// Derive the workspace path for the given build-defining inputs
    pub fn derive_path<S: AsRef<str>>(&self, seeds: &[S]) -> Utf8PathBuf {
        let joined = seeds
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("|");
        let hash = compute_hash(&joined);
        self.temp_root.join(format!("{}_{}", WORKSPACE_PREFIX, hash))
    }

    /// Derive the workspace path for a set of jobs.
    ///
    /// A single job is keyed by `(assets directory, bundle name, target)`;
    /// several jobs are keyed by their serialized descriptors as a whole.
    pub fn derive_path_for_jobs(&self, jobs: &[JobDescriptor]) -> Utf8PathBuf {
        match jobs {
            [job] => self.derive_path(&[
                job.asset_directory.as_str(),
                job.bundle_name.as_str(),
                job.target().unwrap_or(crate::models::TARGETLESS_TARGET),
            ]),
            _ => {
                let serialized = serde_json::to_string(jobs).unwrap_or_else(|_| {
                    jobs.iter()
                        .map(|j| format!("{}:{}", j.asset_directory, j.bundle_name))
                        .collect::<Vec<_>>()
                        .join(";")
                });
                self.derive_path(&[serialized])
            }
        }
    }

    /// Lay out the workspace and stage every job's asset directory.
    ///
    /// With `clean` an existing workspace is deleted first. Otherwise an
    /// existing workspace is reused and bundle directories already staged in
    /// it are left alone.
    pub fn prepare(
        &self,
        path: &Utf8Path,
        jobs: &[JobDescriptor],
        method: LinkMethod,
        clean: bool,
        editor_scripts: Option<&Utf8Path>,
    ) -> Result<(), LinkError> {
        let existed = self.fs.exists(path);

        if existed && clean {
            tracing::info!("Cleaning workspace {}", path);
            self.remove(path)
                .map_err(|source| io_error("remove", path, source))?;
        } else if existed {
            tracing::info!("Reusing workspace {}", path);
        } else {
            tracing::info!("Creating workspace {}", path);
        }
        let reuse = existed && !clean;

        for dir in ["Assets", EDITOR_DIR, DATA_DIR] {
            let dir = path.join(dir);
            self.fs
                .create_dir_all(&dir)
                .map_err(|source| io_error("create directory", &dir, source))?;
        }

        if let Some(scripts) = editor_scripts {
            self.copy_editor_scripts(scripts, &path.join(EDITOR_DIR))?;
        }

        let mut linker = AssetLinker::new(self.fs.clone());
        for job in jobs {
            if linker.is_linked(&job.asset_directory) {
                tracing::debug!(
                    "Bundle '{}' shares an already staged source, skipping",
                    job.bundle_name
                );
                continue;
            }

            let target = path.join(&job.bundle_path);
            if reuse && self.fs.exists(&target) {
                if !self.fs.is_dir(&job.asset_directory) {
                    return Err(LinkError::SourceNotFound(job.asset_directory.clone()));
                }
                tracing::debug!("Keeping staged assets at {}", target);
                continue;
            }

            match linker.link(&job.asset_directory, &target, method)? {
                LinkOutcome::Linked(_) => {}
                LinkOutcome::AlreadyLinked => {
                    tracing::debug!("Source for '{}' already linked", job.bundle_name)
                }
            }
        }

        Ok(())
    }

    /// Remove the workspace when `should_clean` is set.
    ///
    /// Failures are logged and never escalate; the build result does not
    /// depend on cleanup.
    pub fn cleanup(&self, path: &Utf8Path, should_clean: bool) {
        if !should_clean {
            tracing::debug!("Keeping workspace {} for reuse", path);
            return;
        }
        if !self.fs.exists(path) {
            return;
        }

        match self.remove(path) {
            Ok(()) => tracing::info!("Removed workspace {}", path),
            Err(e) => tracing::warn!("Failed to remove workspace {}: {}", path, e),
        }
    }

    fn remove(&self, path: &Utf8Path) -> std::io::Result<()> {
        if let Err(e) = self.fs.clear_readonly(path) {
            tracing::warn!("Failed to clear read-only attributes in {}: {}", path, e);
        }
        self.fs.remove_dir_all(path)
    }

    fn copy_editor_scripts(&self, scripts: &Utf8Path, editor_dir: &Utf8Path) -> Result<(), LinkError> {
        if !self.fs.is_dir(scripts) {
            return Err(LinkError::SourceNotFound(scripts.to_path_buf()));
        }

        let entries = self
            .fs
            .walk(scripts)
            .map_err(|source| io_error("read", scripts, source))?;
        for entry in &entries {
            let destination = editor_dir.join(&entry.relative);
            let result = if entry.is_dir {
                self.fs.create_dir_all(&destination)
            } else {
                self.fs.copy_file(&scripts.join(&entry.relative), &destination)
            };
            result.map_err(|source| io_error("copy", &destination, source))?;
        }

        tracing::debug!("Copied {} editor script entries", entries.len());
        Ok(())
    }
}

fn io_error(action: &'static str, path: &Utf8Path, source: std::io::Error) -> LinkError {
    LinkError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
