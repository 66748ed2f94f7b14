//! Environment auto-detection.
//!
//! Fills in what the configuration leaves out:
//! - the editor executable for a configured version, from standard Hub install locations
//! - the Hub executable itself
//! - whether the process runs under CI
//!
//! # Examples
//!
//! ```ignore
//! use assetbundler::services::detection::detect_unity_editor;
//!
//! let editor = detect_unity_editor("2022.3.10f1");
//! ```

use camino::{Utf8Path, Utf8PathBuf};

/// Environment variable that marks a CI run
pub const CI_ENV_VAR: &str = "CI";

/// Check whether the environment marks this run as CI.
///
/// `lookup` resolves environment variables; any non-empty value other than
/// `false` or `0` counts.
pub fn detect_ci<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(CI_ENV_VAR)
        .map(|value| {
            let value = value.trim().to_ascii_lowercase();
            !value.is_empty() && value != "false" && value != "0"
        })
        .unwrap_or(false)
}

/// [`detect_ci`] against the process environment
pub fn is_ci_environment() -> bool {
    detect_ci(|name| std::env::var(name).ok())
}

/// Standard editor locations for `version`, most likely first
pub fn unity_editor_candidates(version: &str, home: Option<&Utf8Path>) -> Vec<Utf8PathBuf> {
    let mut candidates = Vec::new();

    if cfg!(target_os = "windows") {
        for root in ["C:/Program Files/Unity/Hub/Editor", "C:/Program Files/Unity"] {
            candidates.push(
                Utf8PathBuf::from(root)
                    .join(version)
                    .join("Editor/Unity.exe"),
            );
        }
    } else if cfg!(target_os = "macos") {
        candidates.push(
            Utf8PathBuf::from("/Applications/Unity/Hub/Editor")
                .join(version)
                .join("Unity.app/Contents/MacOS/Unity"),
        );
    } else {
        if let Some(home) = home {
            candidates.push(home.join("Unity/Hub/Editor").join(version).join("Editor/Unity"));
        }
        candidates.push(
            Utf8PathBuf::from("/opt/unity/editors")
                .join(version)
                .join("Editor/Unity"),
        );
    }

    candidates
}

/// Standard Hub locations, most likely first
pub fn hub_candidates(home: Option<&Utf8Path>) -> Vec<Utf8PathBuf> {
    let mut candidates = Vec::new();

    if cfg!(target_os = "windows") {
        candidates.push(Utf8PathBuf::from("C:/Program Files/Unity Hub/Unity Hub.exe"));
    } else if cfg!(target_os = "macos") {
        candidates.push(Utf8PathBuf::from(
            "/Applications/Unity Hub.app/Contents/MacOS/Unity Hub",
        ));
    } else {
        candidates.push(Utf8PathBuf::from("/opt/unityhub/unityhub"));
        if let Some(home) = home {
            candidates.push(home.join("Applications/Unity Hub.AppImage"));
        }
    }

    candidates
}

/// Find the installed editor for `version`
pub fn detect_unity_editor(version: &str) -> Option<Utf8PathBuf> {
    let found = first_existing(unity_editor_candidates(version, home_dir().as_deref()));
    match &found {
        Some(path) => tracing::info!("Detected editor {} at {}", version, path),
        None => tracing::debug!("No editor {} found in standard locations", version),
    }
    found
}

/// Find the installed Hub
pub fn detect_hub() -> Option<Utf8PathBuf> {
    let found = first_existing(hub_candidates(home_dir().as_deref()));
    match &found {
        Some(path) => tracing::info!("Detected Hub at {}", path),
        None => tracing::debug!("No Hub found in standard locations"),
    }
    found
}

fn first_existing(candidates: Vec<Utf8PathBuf>) -> Option<Utf8PathBuf> {
    candidates.into_iter().find(|c| c.is_file())
}

fn home_dir() -> Option<Utf8PathBuf> {
    dirs::home_dir().and_then(|home| Utf8PathBuf::try_from(home).ok())
}
