//! Integration tests for ConfigLoader and ResolvedConfiguration
//!
//! These tests verify:
//! - `extends` chains across several files and directories
//! - Cycle detection
//! - Error reporting for missing and reserved names
//! - Resolution of a loaded file against CLI overrides

use assetbundler::config::ConfigError;
use assetbundler::models::DEFAULT_CONFIG_FILENAME;
use assetbundler::{CliOverrides, ConfigLoader, LinkMethod, ResolvedConfiguration};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, root)
}

fn write(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_mutual_extends_is_circular() {
    let (_temp_dir, root) = create_test_config_dir();
    write(&root.join("a.toml"), "[global]\nextends = \"b.toml\"\n");
    write(&root.join("b.toml"), "[global]\nextends = \"a.toml\"\n");

    let err = ConfigLoader::new().load(&root.join("a.toml")).unwrap_err();
    match err {
        ConfigError::CircularReference(chain) => {
            assert!(chain.contains("a.toml"));
            assert!(chain.contains("b.toml"));
        }
        other => panic!("expected a circular reference, got: {other}"),
    }
}

#[test]
fn test_three_level_inheritance() {
    let (_temp_dir, root) = create_test_config_dir();
    write(
        &root.join("studio.toml"),
        r#"
[global]
unity_version = "2021.3.5f1"
hub_path = "/opt/hub/unityhub"
build_targets = ["windows", "mac", "linux"]
include_patterns = ["*.prefab", "*.mat"]
clean_temp_project = true

[bundles.shared]
name = "studio.shared"
assets_directory = "/studio/shared"
"#,
    );
    write(
        &root.join("team.toml"),
        r#"
[global]
extends = "studio.toml"
build_targets = ["windows"]
link_method = "hardlink"

[bundles.shared]
output_directory = "/team/out"

[bundles.tools]
assets_directory = "/team/tools"
"#,
    );
    write(
        &root.join("mine.toml"),
        r#"
[global]
extends = "team.toml"
unity_version = "2022.3.10f1"
clean_temp_project = false

[bundles.mine]
name = "Me.Mine"
assets_directory = "/me/mine"
"#,
    );

    let file = ConfigLoader::new().load(&root.join("mine.toml")).unwrap();

    assert!(file.global.extends.is_none());
    assert_eq!(file.global.unity_version.as_deref(), Some("2022.3.10f1"));
    assert_eq!(file.global.hub_path.as_deref(), Some(Utf8Path::new("/opt/hub/unityhub")));
    assert_eq!(file.global.build_targets, vec!["windows"]);
    assert_eq!(file.global.include_patterns, vec!["*.prefab", "*.mat"]);
    assert_eq!(file.global.link_method, Some(LinkMethod::Hardlink));
    // A child cannot switch cleaning back off
    assert_eq!(file.global.clean_temp_project, Some(true));

    let keys: Vec<_> = file.bundles.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["shared", "tools", "mine"]);

    let shared = &file.bundles["shared"];
    assert_eq!(shared.name.as_deref(), Some("studio.shared"));
    assert_eq!(shared.assets_directory.as_deref(), Some(Utf8Path::new("/studio/shared")));
    assert_eq!(shared.output_directory.as_deref(), Some(Utf8Path::new("/team/out")));
}

#[test]
fn test_extends_directory_prefers_same_file_name() {
    let (_temp_dir, root) = create_test_config_dir();
    write(
        &root.join("parent/bundles.toml"),
        "[global]\nunity_version = \"from-same-name\"\n",
    );
    write(
        &root.join("parent").join(DEFAULT_CONFIG_FILENAME),
        "[global]\nunity_version = \"from-default\"\n",
    );
    write(&root.join("child/bundles.toml"), "[global]\nextends = \"../parent\"\n");

    let file = ConfigLoader::new()
        .load(&root.join("child/bundles.toml"))
        .unwrap();
    assert_eq!(file.global.unity_version.as_deref(), Some("from-same-name"));
}

#[test]
fn test_extends_directory_falls_back_to_default_file() {
    let (_temp_dir, root) = create_test_config_dir();
    write(
        &root.join("parent").join(DEFAULT_CONFIG_FILENAME),
        "[global]\nunity_version = \"from-default\"\n",
    );
    write(&root.join("child/custom.toml"), "[global]\nextends = \"../parent\"\n");

    let file = ConfigLoader::new()
        .load(&root.join("child/custom.toml"))
        .unwrap();
    assert_eq!(file.global.unity_version.as_deref(), Some("from-default"));
}

#[test]
fn test_missing_parent_names_resolved_path() {
    let (_temp_dir, root) = create_test_config_dir();
    write(&root.join("child.toml"), "[global]\nextends = \"gone/base.toml\"\n");

    let err = ConfigLoader::new().load(&root.join("child.toml")).unwrap_err();
    match &err {
        ConfigError::FileNotFound(path) => {
            assert_eq!(path, &root.join("gone/base.toml"));
        }
        other => panic!("expected file not found, got: {other}"),
    }
    assert!(err.to_string().contains("gone/base.toml"));
}

#[test]
fn test_missing_root_file() {
    let (_temp_dir, root) = create_test_config_dir();
    let err = ConfigLoader::new().load(&root.join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn test_reserved_bundle_names_rejected() {
    let (_temp_dir, root) = create_test_config_dir();
    let path = root.join(DEFAULT_CONFIG_FILENAME);
    write(
        &path,
        "[bundles.plugin]\nname = \"Native.Framework\"\nassets_directory = \"src\"\n",
    );

    let file = ConfigLoader::new().load(&path).unwrap();
    let err =
        ResolvedConfiguration::resolve(Some(path), file, CliOverrides::default(), &root).unwrap_err();

    assert!(matches!(err, ConfigError::ForbiddenBundleName(ref name) if name == "native.framework"));
    assert!(err.to_string().contains("native.framework"));
}

#[test]
fn test_loaded_file_resolves_with_cli_overrides() {
    let (_temp_dir, root) = create_test_config_dir();
    let path = root.join(DEFAULT_CONFIG_FILENAME);
    write(
        &path,
        r#"
[global]
unity_path = "/opt/unity/Editor/Unity"
build_targets = ["windows", "mac"]
output_directory = "dist"

[bundles.alpha]
name = "author.alpha"
assets_directory = "alpha"

[bundles.beta]
assets_directory = "beta"
"#,
    );

    let file = ConfigLoader::new().load(&path).unwrap();
    let cli = CliOverrides {
        bundles: vec!["AUTHOR.ALPHA".into()],
        targets: vec!["linux".into()],
        exclude_patterns: vec!["*.psd".into()],
        ci: true,
        ..Default::default()
    };
    let resolved = ResolvedConfiguration::resolve_and_validate(Some(path), file, cli, &root).unwrap();

    assert_eq!(resolved.bundles().len(), 1);
    let alpha = &resolved.bundles()[0];
    assert_eq!(alpha.name, "author.alpha");
    assert_eq!(alpha.build_targets, vec!["linux"]);
    assert_eq!(alpha.exclude_patterns, vec!["*.psd"]);
    assert_eq!(alpha.assets_directory.as_deref(), Some(root.join("alpha").as_path()));
    assert_eq!(alpha.output_directory.as_deref(), Some(root.join("dist").as_path()));
}

#[test]
fn test_validation_reports_every_problem() {
    let (_temp_dir, root) = create_test_config_dir();
    let path = root.join(DEFAULT_CONFIG_FILENAME);
    write(&path, "[global]\nbuild_targets = [\"xbox\"]\n\n[bundles.empty]\n");

    let file = ConfigLoader::new().load(&path).unwrap();
    let cli = CliOverrides {
        bundles: vec!["empty".into(), "ghost".into()],
        ..Default::default()
    };
    let err = ResolvedConfiguration::resolve_and_validate(Some(path), file, cli, &root).unwrap_err();

    let ConfigError::Invalid(problems) = err else {
        panic!("expected validation problems");
    };
    assert!(problems.iter().any(|p| p.contains("'ghost'") && p.contains("empty")));
    assert!(problems.iter().any(|p| p.contains("'xbox'")));
    assert!(problems.iter().any(|p| p.contains("Unity editor")));
    assert!(problems.iter().any(|p| p.contains("Hub")));
    assert!(problems.iter().any(|p| p.contains("no assets_directory")));
}
