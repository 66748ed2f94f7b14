//! Artifact naming and verification.
//!
//! The editor names artifacts from the job's `filenameFormat`. The same rules
//! are applied here to know which files a successful run should have left in
//! each output directory.

use crate::models::JobDescriptor;
use crate::services::fs::FileSystem;
use crate::services::patterns::{PatternError, PatternSet};
use camino::{Utf8Path, Utf8PathBuf};

/// Filename format used when no layer sets one
pub const DEFAULT_FILENAME_FORMAT: &str = "{name}_{target}";

const NAME_TOKEN: &str = "{name}";
const TARGET_TOKEN: &str = "{target}";

/// Expand a filename format for one bundle and target.
///
/// Without a target the `{target}` token is dropped together with one
/// separator (`_`, `-` or `.`) directly in front of it.
pub fn format_filename(format: &str, bundle_name: &str, target: Option<&str>) -> String {
    let expanded = match target {
        Some(target) => format.replace(TARGET_TOKEN, target),
        None => {
            let mut stripped = format.to_string();
            for separator in ['_', '-', '.'] {
                stripped = stripped.replace(&format!("{}{}", separator, TARGET_TOKEN), "");
            }
            stripped.replace(TARGET_TOKEN, "")
        }
    };

    expanded.replace(NAME_TOKEN, bundle_name)
}

/// Path of the artifact a job is expected to produce
pub fn expected_artifact(job: &JobDescriptor) -> Utf8PathBuf {
    let target = if job.no_platform_suffix {
        None
    } else {
        job.target()
    };
    job.output_directory
        .join(format_filename(&job.filename_format, &job.bundle_name, target))
}

/// Return the expected artifacts that are missing after a build
pub fn verify_outputs(fs: &dyn FileSystem, jobs: &[JobDescriptor]) -> Vec<Utf8PathBuf> {
    let mut missing = Vec::new();

    for job in jobs {
        let artifact = expected_artifact(job);
        if fs.exists(&artifact) {
            tracing::info!("Built {}", artifact);
        } else {
            tracing::warn!(
                "Expected artifact for bundle '{}' not found: {}",
                job.bundle_name,
                artifact
            );
            missing.push(artifact);
        }
    }

    missing
}

/// How many files of an asset directory pass the include/exclude filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetSelection {
    pub total: usize,
    pub selected: usize,
}

/// Count the files under `assets_dir` selected by the bundle's patterns
pub fn summarize_assets(
    fs: &dyn FileSystem,
    assets_dir: &Utf8Path,
    include: &[String],
    exclude: &[String],
) -> Result<AssetSelection, SelectionError> {
    let include = PatternSet::new(include)?;
    let exclude = PatternSet::new(exclude)?;

    let mut selection = AssetSelection::default();
    for entry in fs.walk(assets_dir)?.iter().filter(|e| !e.is_dir) {
        selection.total += 1;
        let relative = entry.relative.as_str();
        if include.includes(relative) && !exclude.excludes(relative) {
            selection.selected += 1;
        }
    }

    Ok(selection)
}

#[derive(thiserror::Error, Debug)]
pub enum SelectionError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Failed to scan assets: {0}")]
    Io(#[from] std::io::Error),
}
