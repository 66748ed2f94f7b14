//! Configuration loading and resolution.
//!
//! - [`ConfigLoader`] reads a TOML file and follows its `extends` chain
//! - [`merge`] holds the per-field merge policy used by every layer
//! - [`ResolvedConfiguration`] is the final view: file global ← bundle ← CLI

pub mod loader;
pub mod merge;
pub mod resolve;

pub use loader::ConfigLoader;
pub use resolve::{ResolvedBundle, ResolvedConfiguration};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors raised while loading or resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(Utf8PathBuf),

    #[error("Circular reference in extends chain: {0}")]
    CircularReference(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "Bundle name '{0}' is not allowed: names ending in .bundle or .framework are reserved by the editor"
    )]
    ForbiddenBundleName(String),

    #[error("Invalid configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize_lexically(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Utf8Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_str()),
        }
    }

    normalized
}

/// Make `path` absolute against `base` and normalize it lexically
pub fn absolutize(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}
