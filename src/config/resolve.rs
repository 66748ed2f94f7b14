use crate::config::{ConfigError, absolutize, merge};
use crate::models::{
    BundleConfig, CliOverrides, ConfigFile, DumpFormat, FORBIDDEN_BUNDLE_SUFFIXES, GlobalConfig,
    KNOWN_BUILD_TARGETS, LinkMethod, TextureTypeRule, host_build_target,
};
use crate::services::outputs::DEFAULT_FILENAME_FORMAT;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

/// One bundle with every layer applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBundle {
    /// Key of the `[bundles.<key>]` table
    pub key: String,
    /// Lowercased bundle name
    pub name: String,
    pub assets_directory: Option<Utf8PathBuf>,
    pub output_directory: Option<Utf8PathBuf>,
    pub custom_output_path: Option<Utf8PathBuf>,
    pub filename_format: String,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub targetless: bool,
    /// Effective targets; empty when targetless
    pub build_targets: Vec<String>,
    pub texture_types: IndexMap<String, TextureTypeRule>,
}

impl ResolvedBundle {
    /// Where artifacts land: the custom output path when set
    pub fn effective_output_directory(&self) -> Option<&Utf8Path> {
        self.custom_output_path
            .as_deref()
            .or(self.output_directory.as_deref())
    }
}

/// The merged configuration for one invocation.
///
/// Built once by [`ResolvedConfiguration::resolve`]. Afterwards only the
/// auto-detected editor and Hub paths may be filled in, and only when no
/// layer provided them.
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    config_path: Option<Utf8PathBuf>,
    file: ConfigFile,
    global: GlobalConfig,
    bundles: Vec<ResolvedBundle>,
    missing_bundles: Vec<String>,
    cli: CliOverrides,
}

impl ResolvedConfiguration {
    /// Layer `cli` over `file` and select the bundles to build.
    ///
    /// Relative CLI paths are resolved against `cwd`. Unknown bundle names are
    /// recorded and reported by [`validate`](Self::validate); a reserved name
    /// on any declared bundle fails immediately.
    pub fn resolve(
        config_path: Option<Utf8PathBuf>,
        file: ConfigFile,
        cli: CliOverrides,
        cwd: &Utf8Path,
    ) -> Result<Self, ConfigError> {
        let cli = absolutize_cli_paths(cli, cwd);
        let global = apply_cli_to_global(file.global.clone(), &cli);

        // Every declared bundle is checked, selected or not
        for (key, bundle) in &file.bundles {
            check_bundle_name(&bundle_name(key, bundle))?;
        }

        let (selected, missing_bundles) = select_bundles(&file, &cli.bundles);

        let bundles = selected
            .into_iter()
            .map(|key| resolve_bundle(&key, &file.bundles[&key], &file.global, &cli))
            .collect::<Vec<_>>();

        tracing::debug!(
            "Resolved {} bundle(s): {}",
            bundles.len(),
            bundles
                .iter()
                .map(|b| b.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            config_path,
            file,
            global,
            bundles,
            missing_bundles,
            cli,
        })
    }

    /// Resolve and fail with every validation problem at once
    pub fn resolve_and_validate(
        config_path: Option<Utf8PathBuf>,
        file: ConfigFile,
        cli: CliOverrides,
        cwd: &Utf8Path,
    ) -> Result<Self, ConfigError> {
        let resolved = Self::resolve(config_path, file, cli, cwd)?;
        let problems = resolved.validate();
        if problems.is_empty() {
            Ok(resolved)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    pub fn config_path(&self) -> Option<&Utf8Path> {
        self.config_path.as_deref()
    }

    /// Global settings with CLI overrides applied
    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    pub fn bundles(&self) -> &[ResolvedBundle] {
        &self.bundles
    }

    pub fn cli(&self) -> &CliOverrides {
        &self.cli
    }

    pub fn link_method(&self) -> LinkMethod {
        self.global.link_method.unwrap_or_default()
    }

    pub fn clean_temp_project(&self) -> bool {
        self.global.clean_temp_project.unwrap_or(false)
    }

    pub fn is_ci(&self) -> bool {
        self.cli.ci
    }

    pub fn unity_path(&self) -> Option<&Utf8Path> {
        self.global.unity_path.as_deref()
    }

    pub fn hub_path(&self) -> Option<&Utf8Path> {
        self.global.hub_path.as_deref()
    }

    /// Fill in a detected editor path when no layer configured one
    pub fn fill_unity_path(&mut self, detected: Utf8PathBuf) {
        if self.global.unity_path.is_none() {
            tracing::info!("Using detected editor: {}", detected);
            self.global.unity_path = Some(detected);
        }
    }

    /// Fill in a detected Hub path when no layer configured one
    pub fn fill_hub_path(&mut self, detected: Utf8PathBuf) {
        if self.global.hub_path.is_none() {
            tracing::info!("Using detected Hub: {}", detected);
            self.global.hub_path = Some(detected);
        }
    }

    /// Keys and names of every bundle in the file, in declaration order
    pub fn available_bundles(&self) -> Vec<(String, String)> {
        self.file
            .bundles
            .iter()
            .map(|(key, bundle)| (key.clone(), bundle_name(key, bundle)))
            .collect()
    }

    /// Check the configuration, collecting every problem instead of stopping
    /// at the first one.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.config_path.is_none() {
            problems.push(format!(
                "No configuration file found: pass --config or create {} in the working directory",
                crate::models::DEFAULT_CONFIG_FILENAME
            ));
        }

        for name in &self.missing_bundles {
            let available = self
                .file
                .bundles
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>();
            let available = if available.is_empty() {
                "(none defined)".to_string()
            } else {
                available.join(", ")
            };
            problems.push(format!(
                "Bundle '{}' not found. Available bundles: {}",
                name, available
            ));
        }

        if self.config_path.is_some()
            && self.file.bundles.is_empty()
            && !self.cli.is_inspection_only()
        {
            problems.push("No bundles defined in configuration".to_string());
        }

        if is_blank_path(self.global.unity_path.as_deref())
            && is_blank(self.global.unity_version.as_deref())
        {
            problems.push("Unity editor not configured: set unity_version or unity_path".to_string());
        }

        if !self.cli.ci && is_blank_path(self.global.hub_path.as_deref()) {
            problems.push("Unity Hub path not configured: set hub_path or run with --ci".to_string());
        }

        let mut invalid_targets = Vec::new();
        let requested = self
            .cli
            .explicit_targets()
            .into_iter()
            .chain(self.global.build_targets.iter().cloned())
            .chain(self.bundles.iter().flat_map(|b| b.build_targets.iter().cloned()));
        for target in requested {
            if !KNOWN_BUILD_TARGETS.contains(&target.as_str()) && !invalid_targets.contains(&target)
            {
                invalid_targets.push(target);
            }
        }
        for target in invalid_targets {
            problems.push(format!(
                "Invalid build target '{}'. Valid targets: {}",
                target,
                KNOWN_BUILD_TARGETS.join(", ")
            ));
        }

        for bundle in &self.bundles {
            if bundle.assets_directory.is_none() {
                problems.push(format!(
                    "Bundle '{}' has no assets_directory",
                    bundle.name
                ));
            }
            if bundle.effective_output_directory().is_none() {
                problems.push(format!(
                    "Bundle '{}' has no output_directory",
                    bundle.name
                ));
            }
        }

        problems
    }

    /// Render the merged configuration, CLI overrides included.
    ///
    /// CLI values are applied to each bundle table as well, so a bundle-level
    /// setting never shows a value the build would not use.
    pub fn dump(&self, format: DumpFormat) -> Result<String, ConfigError> {
        let merged = ConfigFile {
            global: self.global.clone(),
            bundles: self
                .file
                .bundles
                .iter()
                .map(|(key, bundle)| (key.clone(), apply_cli_to_bundle(bundle.clone(), &self.cli)))
                .collect(),
        };

        match format {
            DumpFormat::Json => serde_json::to_string_pretty(&merged)
                .map_err(|e| ConfigError::Serialize(e.to_string())),
            DumpFormat::Toml => {
                toml::to_string_pretty(&merged).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
        }
    }
}

/// Pick the bundle keys to build; returns `(selected, unknown names)`
fn select_bundles(file: &ConfigFile, requested: &[String]) -> (Vec<String>, Vec<String>) {
    if requested.is_empty() {
        if file.bundles.len() == 1 {
            tracing::debug!("Auto-selecting the only bundle in the configuration");
        }
        return (file.bundles.keys().cloned().collect(), Vec::new());
    }

    let mut selected = Vec::new();
    let mut missing = Vec::new();

    for name in requested {
        let wanted = name.trim().to_lowercase();
        let found = file.bundles.iter().find(|(key, bundle)| {
            key.to_lowercase() == wanted || bundle_name(key, bundle) == wanted
        });

        match found {
            Some((key, _)) if !selected.contains(key) => selected.push(key.clone()),
            Some(_) => {}
            None => missing.push(name.clone()),
        }
    }

    (selected, missing)
}

fn bundle_name(key: &str, bundle: &BundleConfig) -> String {
    bundle
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(key)
        .trim()
        .to_lowercase()
}

/// Reject names the editor reserves for native plugin folders
pub fn check_bundle_name(name: &str) -> Result<(), ConfigError> {
    let lowered = name.to_lowercase();
    if FORBIDDEN_BUNDLE_SUFFIXES
        .iter()
        .any(|suffix| lowered.ends_with(suffix))
    {
        return Err(ConfigError::ForbiddenBundleName(lowered));
    }
    Ok(())
}

fn resolve_bundle(
    key: &str,
    bundle: &BundleConfig,
    global: &GlobalConfig,
    cli: &CliOverrides,
) -> ResolvedBundle {
    let name = bundle_name(key, bundle);

    let targetless =
        cli.wants_targetless() || merge::scalar(global.targetless, bundle.targetless).unwrap_or(false);

    let build_targets = if targetless {
        Vec::new()
    } else {
        let explicit = cli.explicit_targets();
        if !explicit.is_empty() {
            explicit
        } else if !bundle.build_targets.is_empty() {
            bundle.build_targets.clone()
        } else if !global.build_targets.is_empty() {
            global.build_targets.clone()
        } else {
            vec![host_build_target().to_string()]
        }
    };

    let include_patterns = merge::union_list(
        merge::replace_list(global.include_patterns.clone(), bundle.include_patterns.clone()),
        &cli.include_patterns,
    );
    let exclude_patterns = merge::union_list(
        merge::replace_list(global.exclude_patterns.clone(), bundle.exclude_patterns.clone()),
        &cli.exclude_patterns,
    );

    let filename_format = merge::text(
        merge::text(global.filename_format.clone(), bundle.filename_format.clone()),
        cli.filename_format.clone(),
    )
    .unwrap_or_else(|| DEFAULT_FILENAME_FORMAT.to_string());

    ResolvedBundle {
        key: key.to_string(),
        name,
        assets_directory: merge::path(
            merge::path(global.assets_directory.clone(), bundle.assets_directory.clone()),
            cli.assets_directory.clone(),
        ),
        output_directory: merge::path(
            merge::path(global.output_directory.clone(), bundle.output_directory.clone()),
            cli.output_directory.clone(),
        ),
        custom_output_path: bundle.custom_output_path.clone(),
        filename_format,
        include_patterns,
        exclude_patterns,
        targetless,
        build_targets,
        texture_types: merge::map(global.texture_types.clone(), bundle.texture_types.clone()),
    }
}

/// Final merge pass: every CLI value wins over the file-derived global
fn apply_cli_to_global(global: GlobalConfig, cli: &CliOverrides) -> GlobalConfig {
    let explicit_targets = cli.explicit_targets();

    GlobalConfig {
        extends: None,
        unity_version: merge::text(global.unity_version, cli.unity_version.clone()),
        unity_path: merge::path(global.unity_path, cli.unity_path.clone()),
        hub_path: merge::path(global.hub_path, cli.hub_path.clone()),
        build_targets: merge::replace_list(global.build_targets, explicit_targets),
        link_method: merge::scalar(global.link_method, cli.link_method),
        temp_project_path: merge::path(global.temp_project_path, cli.temp_project_path.clone()),
        clean_temp_project: merge::strict_flag(
            global.clean_temp_project,
            cli.clean_temp_project.then_some(true),
        ),
        log_file: merge::path(global.log_file, cli.log_file.clone()),
        include_patterns: merge::union_list(global.include_patterns, &cli.include_patterns),
        exclude_patterns: merge::union_list(global.exclude_patterns, &cli.exclude_patterns),
        filename_format: merge::text(global.filename_format, cli.filename_format.clone()),
        targetless: if cli.wants_targetless() {
            Some(true)
        } else {
            global.targetless
        },
        assets_directory: merge::path(global.assets_directory, cli.assets_directory.clone()),
        output_directory: merge::path(global.output_directory, cli.output_directory.clone()),
        editor_scripts_directory: global.editor_scripts_directory,
        texture_types: global.texture_types,
    }
}

/// CLI pass over one bundle table, for output that shows bundles unresolved.
///
/// Empty bundle lists stay empty: they inherit the global list, which
/// already carries the CLI values.
fn apply_cli_to_bundle(bundle: BundleConfig, cli: &CliOverrides) -> BundleConfig {
    let extend = |list: Vec<String>, extra: &[String]| {
        if list.is_empty() {
            list
        } else {
            merge::union_list(list, extra)
        }
    };
    let explicit_targets = cli.explicit_targets();

    BundleConfig {
        assets_directory: merge::path(bundle.assets_directory, cli.assets_directory.clone()),
        output_directory: merge::path(bundle.output_directory, cli.output_directory.clone()),
        filename_format: merge::text(bundle.filename_format, cli.filename_format.clone()),
        include_patterns: extend(bundle.include_patterns, &cli.include_patterns),
        exclude_patterns: extend(bundle.exclude_patterns, &cli.exclude_patterns),
        targetless: if cli.wants_targetless() {
            Some(true)
        } else {
            bundle.targetless
        },
        build_targets: if bundle.build_targets.is_empty() {
            bundle.build_targets
        } else {
            merge::replace_list(bundle.build_targets, explicit_targets)
        },
        ..bundle
    }
}

fn absolutize_cli_paths(mut cli: CliOverrides, cwd: &Utf8Path) -> CliOverrides {
    for field in [
        &mut cli.unity_path,
        &mut cli.hub_path,
        &mut cli.temp_project_path,
        &mut cli.log_file,
        &mut cli.assets_directory,
        &mut cli.output_directory,
    ] {
        if let Some(path) = field.as_mut() {
            *path = absolutize(path, cwd);
        }
    }
    cli
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn is_blank_path(value: Option<&Utf8Path>) -> bool {
    value.is_none_or(|v| v.as_str().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd() -> Utf8PathBuf {
        Utf8PathBuf::from("/work")
    }

    fn sample_file() -> ConfigFile {
        let content = r#"
[global]
unity_version = "2022.3.10f1"
hub_path = "/opt/hub"
build_targets = ["windows", "mac"]
include_patterns = ["*.prefab"]
assets_directory = "/mods/shared"
output_directory = "/mods/out"

[bundles.alpha]
name = "Author.Alpha"

[bundles.beta]
assets_directory = "/mods/beta"
build_targets = ["linux"]
include_patterns = ["*.mat"]
targetless = false
"#;
        toml::from_str(content).unwrap()
    }

    fn resolve(file: ConfigFile, cli: CliOverrides) -> ResolvedConfiguration {
        ResolvedConfiguration::resolve(Some("/work/.assetbundler.toml".into()), file, cli, &cwd())
            .unwrap()
    }

    #[test]
    fn test_all_bundles_when_none_named() {
        let resolved = resolve(sample_file(), CliOverrides::default());
        let names: Vec<_> = resolved.bundles().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["author.alpha", "beta"]);
        assert!(resolved.validate().is_empty(), "{:?}", resolved.validate());
    }

    #[test]
    fn test_single_bundle_auto_selected() {
        let mut file = sample_file();
        file.bundles.shift_remove("beta");
        let resolved = resolve(file, CliOverrides::default());
        assert_eq!(resolved.bundles().len(), 1);
        assert_eq!(resolved.bundles()[0].key, "alpha");
    }

    #[test]
    fn test_named_bundle_by_key_or_name() {
        let cli = CliOverrides {
            bundles: vec!["author.alpha".into(), "BETA".into()],
            ..Default::default()
        };
        let resolved = resolve(sample_file(), cli);
        assert_eq!(resolved.bundles().len(), 2);
    }

    #[test]
    fn test_missing_bundle_lists_available() {
        let cli = CliOverrides {
            bundles: vec!["gamma".into()],
            ..Default::default()
        };
        let problems = resolve(sample_file(), cli).validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("'gamma'"));
        assert!(problems[0].contains("alpha, beta"));
    }

    #[test]
    fn test_bundle_overrides_global() {
        let resolved = resolve(sample_file(), CliOverrides::default());
        let alpha = &resolved.bundles()[0];
        let beta = &resolved.bundles()[1];

        assert_eq!(alpha.assets_directory.as_deref(), Some(Utf8Path::new("/mods/shared")));
        assert_eq!(alpha.build_targets, vec!["windows", "mac"]);
        assert_eq!(alpha.include_patterns, vec!["*.prefab"]);

        assert_eq!(beta.assets_directory.as_deref(), Some(Utf8Path::new("/mods/beta")));
        assert_eq!(beta.build_targets, vec!["linux"]);
        assert_eq!(beta.include_patterns, vec!["*.mat"]);
    }

    #[test]
    fn test_cli_wins_and_lists_append() {
        let cli = CliOverrides {
            targets: vec!["linux".into()],
            include_patterns: vec!["*.anim".into()],
            unity_version: Some("6000.0.1f1".into()),
            output_directory: Some("build".into()),
            link_method: Some(LinkMethod::Hardlink),
            ..Default::default()
        };
        let resolved = resolve(sample_file(), cli);

        assert_eq!(resolved.global().unity_version.as_deref(), Some("6000.0.1f1"));
        assert_eq!(resolved.link_method(), LinkMethod::Hardlink);
        for bundle in resolved.bundles() {
            assert_eq!(bundle.build_targets, vec!["linux"]);
            assert!(bundle.include_patterns.contains(&"*.anim".to_string()));
            assert_eq!(
                bundle.output_directory.as_deref(),
                Some(Utf8Path::new("/work/build"))
            );
        }
    }

    #[test]
    fn test_targetless_bypasses_target_gating() {
        let mut file = sample_file();
        file.bundles["alpha"].targetless = Some(true);
        let resolved = resolve(file, CliOverrides::default());

        let alpha = &resolved.bundles()[0];
        assert!(alpha.targetless);
        assert!(alpha.build_targets.is_empty());
    }

    #[test]
    fn test_cli_none_target_makes_everything_targetless() {
        let cli = CliOverrides {
            targets: vec!["none".into()],
            ..Default::default()
        };
        let resolved = resolve(sample_file(), cli);
        assert!(resolved.bundles().iter().all(|b| b.targetless));
        assert!(resolved.validate().is_empty());
    }

    #[test]
    fn test_forbidden_suffixes() {
        for name in ["test.framework", "My.Bundle", "x.BUNDLE"] {
            let mut file = ConfigFile::default();
            file.bundles.insert(name.to_string(), BundleConfig::default());

            let err = ResolvedConfiguration::resolve(None, file, CliOverrides::default(), &cwd())
                .unwrap_err();
            assert!(err.to_string().contains(&name.to_lowercase()), "{err}");
        }
        assert!(check_bundle_name("author.bundler").is_ok());
    }

    #[test]
    fn test_validation_accumulates() {
        let mut file = ConfigFile::default();
        file.global.build_targets = vec!["Windows".into(), "ps5".into()];
        file.bundles.insert("lonely".into(), BundleConfig::default());

        let resolved =
            ResolvedConfiguration::resolve(None, file, CliOverrides::default(), &cwd()).unwrap();
        let problems = resolved.validate();

        assert!(problems.iter().any(|p| p.contains("No configuration file")));
        assert!(problems.iter().any(|p| p.contains("Unity editor not configured")));
        assert!(problems.iter().any(|p| p.contains("Hub path")));
        assert!(problems.iter().any(|p| p.contains("'Windows'")));
        assert!(problems.iter().any(|p| p.contains("'ps5'")));
        assert!(problems.iter().any(|p| p.contains("no assets_directory")));
        assert!(problems.iter().any(|p| p.contains("no output_directory")));
    }

    #[test]
    fn test_ci_does_not_need_hub() {
        let mut file = sample_file();
        file.global.hub_path = None;
        let cli = CliOverrides {
            ci: true,
            ..Default::default()
        };
        assert!(resolve(file, cli).validate().is_empty());
    }

    #[test]
    fn test_clean_flag_is_or_merged_with_cli() {
        let mut file = sample_file();
        file.global.clean_temp_project = Some(true);
        let resolved = resolve(file, CliOverrides::default());
        assert!(resolved.clean_temp_project());

        let cli = CliOverrides {
            clean_temp_project: true,
            ..Default::default()
        };
        assert!(resolve(sample_file(), cli).clean_temp_project());
    }

    #[test]
    fn test_fill_detected_paths_only_when_unset() {
        let mut resolved = resolve(sample_file(), CliOverrides::default());
        resolved.fill_hub_path("/detected/hub".into());
        resolved.fill_unity_path("/detected/unity".into());

        assert_eq!(resolved.hub_path(), Some(Utf8Path::new("/opt/hub")));
        assert_eq!(resolved.unity_path(), Some(Utf8Path::new("/detected/unity")));
    }

    #[test]
    fn test_dump_formats() {
        let resolved = resolve(sample_file(), CliOverrides::default());

        let json = resolved.dump(DumpFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["global"]["unity_version"], "2022.3.10f1");

        let toml_text = resolved.dump(DumpFormat::Toml).unwrap();
        let reparsed: ConfigFile = toml::from_str(&toml_text).unwrap();
        assert_eq!(reparsed.bundles.len(), 2);
    }

    #[test]
    fn test_unselected_reserved_bundle_is_rejected() {
        let mut file = sample_file();
        file.bundles.insert(
            "bad".into(),
            BundleConfig {
                name: Some("Native.Framework".into()),
                ..Default::default()
            },
        );
        let cli = CliOverrides {
            bundles: vec!["beta".into()],
            ..Default::default()
        };

        let err = ResolvedConfiguration::resolve(None, file, cli, &cwd()).unwrap_err();
        assert!(matches!(err, ConfigError::ForbiddenBundleName(ref name) if name == "native.framework"));
    }

    #[test]
    fn test_dump_shows_cli_values_over_bundle_settings() {
        let cli = CliOverrides {
            assets_directory: Some("override/assets".into()),
            output_directory: Some("/cli/out".into()),
            filename_format: Some("{name}".into()),
            targets: vec!["mac".into()],
            include_patterns: vec!["*.anim".into()],
            ..Default::default()
        };
        let resolved = resolve(sample_file(), cli);

        let value: serde_json::Value =
            serde_json::from_str(&resolved.dump(DumpFormat::Json).unwrap()).unwrap();
        let beta = &value["bundles"]["beta"];
        assert_eq!(beta["assets_directory"], "/work/override/assets");
        assert_eq!(beta["output_directory"], "/cli/out");
        assert_eq!(beta["filename_format"], "{name}");
        assert_eq!(beta["build_targets"], serde_json::json!(["mac"]));
        assert_eq!(beta["include_patterns"], serde_json::json!(["*.mat", "*.anim"]));

        // The dump agrees with what the build uses
        let built = &resolved.bundles()[1];
        assert_eq!(built.key, "beta");
        assert_eq!(
            built.assets_directory.as_deref(),
            Some(Utf8Path::new("/work/override/assets"))
        );
        assert_eq!(built.build_targets, vec!["mac"]);

        // Alpha inherits its paths, so only the global table carries them
        assert!(value["bundles"]["alpha"].get("assets_directory").is_none());
        assert_eq!(value["global"]["assets_directory"], "/work/override/assets");
    }
}
