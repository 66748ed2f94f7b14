use crate::models::LinkMethod;
use crate::services::fs::FileSystem;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Successful result of a link request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The source was materialized at the given target
    Linked(Utf8PathBuf),

    /// The source was already materialized earlier in this run
    AlreadyLinked,
}

/// Failures while materializing a source directory
///
/// Callers must handle each variant; none of them is downgraded to another
/// link method behind the caller's back.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Asset directory not found: {0}")]
    SourceNotFound(Utf8PathBuf),

    #[error("Link method '{method}' is not supported on {platform}")]
    UnsupportedOnPlatform {
        method: LinkMethod,
        platform: &'static str,
    },

    #[error("Permission denied while creating {method} at {path}: {source}")]
    PermissionDenied {
        method: LinkMethod,
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LinkError {
    fn io(action: &'static str, path: &Utf8Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Materializes asset directories into a workspace.
///
/// Keeps track of the sources linked during one run so that several bundles
/// sharing an asset directory only pay for it once.
pub struct AssetLinker {
    fs: Arc<dyn FileSystem>,
    linked_sources: HashSet<Utf8PathBuf>,
}

impl AssetLinker {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            linked_sources: HashSet::new(),
        }
    }

    /// Check whether `source` was already linked during this run
    pub fn is_linked(&self, source: &Utf8Path) -> bool {
        self.linked_sources.contains(&normalize_source(source))
    }

    /// Materialize `source` at `target` using `method`.
    ///
    /// An existing `target` is removed first and its parent is created when
    /// missing. Repeated requests for the same normalized source return
    /// [`LinkOutcome::AlreadyLinked`] without touching the filesystem.
    pub fn link(
        &mut self,
        source: &Utf8Path,
        target: &Utf8Path,
        method: LinkMethod,
    ) -> Result<LinkOutcome, LinkError> {
        let key = normalize_source(source);
        if self.linked_sources.contains(&key) {
            tracing::debug!("Skipping {} - already linked in this run", source);
            return Ok(LinkOutcome::AlreadyLinked);
        }

        if !self.fs.is_dir(source) {
            return Err(LinkError::SourceNotFound(source.to_path_buf()));
        }

        if method == LinkMethod::Junction && !cfg!(windows) {
            return Err(LinkError::UnsupportedOnPlatform {
                method,
                platform: std::env::consts::OS,
            });
        }

        if self.fs.exists(target) {
            tracing::debug!("Removing existing target {}", target);
            self.fs
                .remove_dir_all(target)
                .map_err(|e| LinkError::io("remove", target, e))?;
        }

        if let Some(parent) = target.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| LinkError::io("create directory", parent, e))?;
        }

        match method {
            LinkMethod::Copy => self.copy_tree(source, target)?,
            LinkMethod::Hardlink => self.hardlink_tree(source, target)?,
            LinkMethod::Symlink => self
                .fs
                .symlink_dir(source, target)
                .map_err(|e| classify_link_error(method, target, e))?,
            LinkMethod::Junction => self
                .fs
                .junction(source, target)
                .map_err(|e| classify_link_error(method, target, e))?,
        }

        tracing::info!("Linked {} -> {} ({})", source, target, method);
        self.linked_sources.insert(key);
        Ok(LinkOutcome::Linked(target.to_path_buf()))
    }

    fn copy_tree(&self, source: &Utf8Path, target: &Utf8Path) -> Result<(), LinkError> {
        self.mirror_tree(source, target, |from, to| {
            self.fs
                .copy_file(from, to)
                .map_err(|e| file_error(LinkMethod::Copy, "copy", from, e))
        })
    }

    fn hardlink_tree(&self, source: &Utf8Path, target: &Utf8Path) -> Result<(), LinkError> {
        self.mirror_tree(source, target, |from, to| {
            self.fs
                .hard_link(from, to)
                .map_err(|e| file_error(LinkMethod::Hardlink, "hard link", from, e))
        })
    }

    /// Recreate the directory structure of `source` under `target` and apply
    /// `place_file` to every file.
    fn mirror_tree<F>(
        &self,
        source: &Utf8Path,
        target: &Utf8Path,
        place_file: F,
    ) -> Result<(), LinkError>
    where
        F: Fn(&Utf8Path, &Utf8Path) -> Result<(), LinkError>,
    {
        self.fs
            .create_dir_all(target)
            .map_err(|e| LinkError::io("create directory", target, e))?;

        let entries = self
            .fs
            .walk(source)
            .map_err(|e| LinkError::io("read", source, e))?;

        // Directories first so every file has a parent to land in
        for entry in entries.iter().filter(|e| e.is_dir) {
            let dir = target.join(&entry.relative);
            self.fs
                .create_dir_all(&dir)
                .map_err(|e| LinkError::io("create directory", &dir, e))?;
        }

        for entry in entries.iter().filter(|e| !e.is_dir) {
            place_file(&source.join(&entry.relative), &target.join(&entry.relative))?;
        }

        tracing::debug!("Mirrored {} entries from {}", entries.len(), source);
        Ok(())
    }
}

fn classify_link_error(method: LinkMethod, target: &Utf8Path, error: io::Error) -> LinkError {
    match error.kind() {
        io::ErrorKind::PermissionDenied => LinkError::PermissionDenied {
            method,
            path: target.to_path_buf(),
            source: error,
        },
        io::ErrorKind::Unsupported => LinkError::UnsupportedOnPlatform {
            method,
            platform: std::env::consts::OS,
        },
        _ => LinkError::io("link", target, error),
    }
}

/// Error for one file of a copied or hard-linked tree, naming that file
fn file_error(method: LinkMethod, action: &'static str, file: &Utf8Path, error: io::Error) -> LinkError {
    if error.kind() == io::ErrorKind::PermissionDenied {
        LinkError::PermissionDenied {
            method,
            path: file.to_path_buf(),
            source: error,
        }
    } else {
        LinkError::io(action, file, error)
    }
}

/// Normalize a source directory so equivalent spellings dedupe to one key
pub fn normalize_source(path: &Utf8Path) -> Utf8PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| Utf8PathBuf::try_from(cwd).ok())
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|| path.to_path_buf())
    };
    let normalized = crate::config::normalize_lexically(&absolute);

    if cfg!(windows) {
        Utf8PathBuf::from(normalized.as_str().replace('\\', "/").to_lowercase())
    } else {
        normalized
    }
}
