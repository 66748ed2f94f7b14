use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default configuration filename, looked up in the working directory and
/// inside directories referenced by `extends`.
pub const DEFAULT_CONFIG_FILENAME: &str = ".assetbundler.toml";

/// Build targets the external tool knows how to produce
pub const KNOWN_BUILD_TARGETS: [&str; 3] = ["windows", "mac", "linux"];

/// CLI target value that requests a single targetless artifact
pub const TARGETLESS_TARGET: &str = "none";

/// Bundle-name suffixes the editor reserves for native plugin folders
pub const FORBIDDEN_BUNDLE_SUFFIXES: [&str; 2] = [".bundle", ".framework"];

/// A parsed configuration file: `[global]` plus `[bundles.<key>]` tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub global: GlobalConfig,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bundles: IndexMap<String, BundleConfig>,
}

/// Settings shared by every bundle in a configuration file
///
/// Every field is optional so that "not specified" can be told apart from an
/// explicit value when layering files and CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Parent configuration file, or a directory holding one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unity_version: Option<String>,

    /// Path to the editor executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unity_path: Option<Utf8PathBuf>,

    /// Path to the Hub launcher executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_path: Option<Utf8PathBuf>,

    /// Default (and allowed) build targets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_targets: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_method: Option<LinkMethod>,

    /// Fixed workspace location, bypassing hash-based derivation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_project_path: Option<Utf8PathBuf>,

    /// Wipe the workspace before staging and remove it after the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_temp_project: Option<bool>,

    /// Editor log file (`-logfile`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_format: Option<String>,

    /// Produce one artifact per bundle without a platform suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targetless: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_directory: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<Utf8PathBuf>,

    /// Directory of editor scripts copied into `Assets/Editor/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_scripts_directory: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub texture_types: IndexMap<String, TextureTypeRule>,
}

/// One named bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Bundle name; the table key is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_directory: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<Utf8PathBuf>,

    /// Exact output location, overriding `output_directory`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_output_path: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_format: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targetless: Option<bool>,

    /// Targets this bundle is restricted to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_targets: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub texture_types: IndexMap<String, TextureTypeRule>,
}

/// Patterns that classify textures into one category for the editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureTypeRule {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// How asset directories are materialized in the workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMethod {
    #[default]
    Copy,
    Symlink,
    Hardlink,
    Junction,
}

impl LinkMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkMethod::Copy => "copy",
            LinkMethod::Symlink => "symlink",
            LinkMethod::Hardlink => "hardlink",
            LinkMethod::Junction => "junction",
        }
    }
}

impl fmt::Display for LinkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "copy" => Ok(LinkMethod::Copy),
            "symlink" => Ok(LinkMethod::Symlink),
            "hardlink" => Ok(LinkMethod::Hardlink),
            "junction" => Ok(LinkMethod::Junction),
            other => Err(format!(
                "unknown link method '{}' (expected copy, symlink, hardlink or junction)",
                other
            )),
        }
    }
}

/// Console verbosity requested on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// `tracing` filter directive for this verbosity
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::Debug => "trace",
        }
    }
}

/// Output format for `--dump-config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Json,
    Toml,
}

impl FromStr for DumpFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DumpFormat::Json),
            "toml" => Ok(DumpFormat::Toml),
            other => Err(format!("unknown dump format '{}' (expected json or toml)", other)),
        }
    }
}

/// Values supplied on the command line.
///
/// These are applied after every file-derived layer, so any value set here
/// wins. List values are appended to the file-derived lists instead of
/// replacing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub bundles: Vec<String>,
    pub config_path: Option<Utf8PathBuf>,
    pub targets: Vec<String>,
    pub link_method: Option<LinkMethod>,
    pub unity_version: Option<String>,
    pub unity_path: Option<Utf8PathBuf>,
    pub hub_path: Option<Utf8PathBuf>,
    pub temp_project_path: Option<Utf8PathBuf>,
    pub clean_temp_project: bool,
    pub log_file: Option<Utf8PathBuf>,
    pub filename_format: Option<String>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub assets_directory: Option<Utf8PathBuf>,
    pub output_directory: Option<Utf8PathBuf>,
    pub ci: bool,
    pub non_interactive: bool,
    pub list_bundles: bool,
    pub dump_config: Option<DumpFormat>,
    pub verbosity: Verbosity,
}

impl CliOverrides {
    /// True when `--target none` was requested
    pub fn wants_targetless(&self) -> bool {
        self.targets.iter().any(|t| t == TARGETLESS_TARGET)
    }

    /// Explicit targets other than `none`
    pub fn explicit_targets(&self) -> Vec<String> {
        self.targets
            .iter()
            .filter(|t| t.as_str() != TARGETLESS_TARGET)
            .cloned()
            .collect()
    }

    /// True when the run only inspects configuration and builds nothing
    pub fn is_inspection_only(&self) -> bool {
        self.list_bundles || self.dump_config.is_some()
    }
}

/// Build target matching the host operating system
pub fn host_build_target() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "mac"
    } else {
        "linux"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file() {
        let content = r#"
[global]
unity_version = "2022.3.10f1"
build_targets = ["windows", "linux"]
link_method = "hardlink"
clean_temp_project = true

[global.texture_types.normal]
patterns = ["*_n.png", "*_normal.*"]

[bundles.mymod]
name = "author.mymod"
assets_directory = "Assets"
targetless = true
"#;
        let config: ConfigFile = toml::from_str(content).unwrap();

        assert_eq!(config.global.unity_version.as_deref(), Some("2022.3.10f1"));
        assert_eq!(config.global.build_targets, vec!["windows", "linux"]);
        assert_eq!(config.global.link_method, Some(LinkMethod::Hardlink));
        assert_eq!(config.global.clean_temp_project, Some(true));
        assert_eq!(config.global.texture_types["normal"].patterns.len(), 2);

        let bundle = &config.bundles["mymod"];
        assert_eq!(bundle.name.as_deref(), Some("author.mymod"));
        assert_eq!(bundle.targetless, Some(true));
        assert!(bundle.output_directory.is_none());
    }

    #[test]
    fn test_link_method_from_str() {
        assert_eq!("Copy".parse::<LinkMethod>().unwrap(), LinkMethod::Copy);
        assert_eq!("junction".parse::<LinkMethod>().unwrap(), LinkMethod::Junction);
        assert!("teleport".parse::<LinkMethod>().is_err());
        assert_eq!(LinkMethod::Hardlink.to_string(), "hardlink");
    }

    #[test]
    fn test_cli_target_helpers() {
        let overrides = CliOverrides {
            targets: vec!["windows".to_string(), "none".to_string()],
            ..Default::default()
        };
        assert!(overrides.wants_targetless());
        assert_eq!(overrides.explicit_targets(), vec!["windows"]);
    }

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(Verbosity::Quiet.filter_directive(), "warn");
        assert_eq!(Verbosity::default().filter_directive(), "info");
        assert_eq!(Verbosity::Debug.filter_directive(), "trace");
    }
}
