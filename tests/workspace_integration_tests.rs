//! Integration tests for workspace staging
//!
//! These tests verify:
//! - Deterministic workspace path derivation
//! - Copy-staged assets are independent of their source
//! - Path normalization does not change pattern results

use assetbundler::models::{JobDescriptor, LinkMethod};
use assetbundler::services::patterns::{is_excluded, is_included};
use assetbundler::services::workspace::staging_path;
use assetbundler::services::{AssetLinker, LinkOutcome, RealFileSystem, WorkspaceManager};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_temp_root() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, root)
}

fn job(assets: &Utf8Path, name: &str, target: Option<&str>) -> JobDescriptor {
    JobDescriptor {
        bundle_name: name.to_string(),
        bundle_path: staging_path(name),
        asset_directory: assets.to_path_buf(),
        output_directory: "/out".into(),
        build_targets: target.map(|t| vec![t.to_string()]),
        no_platform_suffix: target.is_none(),
        filename_format: "{name}_{target}".into(),
        include_patterns: Vec::new(),
        exclude_patterns: Vec::new(),
        texture_types: IndexMap::new(),
    }
}

#[test]
fn test_workspace_path_is_deterministic() {
    let (_temp_dir, root) = create_temp_root();
    let manager = WorkspaceManager::new(Arc::new(RealFileSystem), root.clone());
    let other = WorkspaceManager::new(Arc::new(RealFileSystem), root);

    let variations = [
        job(Utf8Path::new("/mods/a"), "author.a", Some("windows")),
        job(Utf8Path::new("/mods/a"), "author.a", Some("linux")),
        job(Utf8Path::new("/mods/a"), "author.b", Some("windows")),
        job(Utf8Path::new("/mods/b"), "author.a", Some("windows")),
        job(Utf8Path::new("/mods/a"), "author.a", None),
    ];

    let paths: Vec<_> = variations
        .iter()
        .map(|j| manager.derive_path_for_jobs(std::slice::from_ref(j)))
        .collect();

    for (job, path) in variations.iter().zip(&paths) {
        assert_eq!(&other.derive_path_for_jobs(std::slice::from_ref(job)), path);
    }
    for (i, a) in paths.iter().enumerate() {
        for b in &paths[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_copied_assets_survive_source_deletion() {
    let (_temp_dir, root) = create_temp_root();
    let source = root.join("src");
    fs::create_dir_all(source.join("Materials")).unwrap();
    fs::write(source.join("Materials/wood.mat"), "material").unwrap();

    let mut linker = AssetLinker::new(Arc::new(RealFileSystem));
    let target = root.join("ws/Assets/Data/author.mod");
    let outcome = linker.link(&source, &target, LinkMethod::Copy).unwrap();
    assert_eq!(outcome, LinkOutcome::Linked(target.clone()));

    fs::remove_dir_all(&source).unwrap();

    assert_eq!(
        fs::read_to_string(target.join("Materials/wood.mat")).unwrap(),
        "material"
    );
}

#[test]
fn test_prepare_stages_shared_source_once() {
    let (_temp_dir, root) = create_temp_root();
    let source = root.join("shared");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.prefab"), "a").unwrap();

    let manager = WorkspaceManager::new(Arc::new(RealFileSystem), root.join("tmp"));
    let mut second = job(&source, "second", None);
    second.bundle_path = staging_path("first");
    let jobs = vec![job(&source, "first", None), second];

    let ws = manager.derive_path_for_jobs(&jobs);
    manager
        .prepare(&ws, &jobs, LinkMethod::Copy, true, None)
        .unwrap();

    assert!(ws.join("Assets/Data/first/a.prefab").is_file());
    assert!(!ws.join("Assets/Data/second").exists());

    manager.cleanup(&ws, true);
    assert!(!ws.exists());
}

#[test]
fn test_pattern_results_ignore_path_spelling() {
    let patterns = ["Textures/*.png".to_string(), "**/*.fbx".to_string()];
    let spellings = [
        ("Textures/wood.png", "./Textures/wood.png", "Textures\\wood.png"),
        ("models/deep/tree.fbx", "/models/deep/tree.fbx", "models\\deep\\tree.fbx"),
        ("Textures/sub/wood.png", "./Textures/sub/wood.png", "Textures\\sub\\wood.png"),
    ];

    for (plain, dotted, windows) in spellings {
        let expected = is_included(plain, &patterns);
        assert_eq!(is_included(dotted, &patterns), expected, "{dotted}");
        assert_eq!(is_included(windows, &patterns), expected, "{windows}");
        assert_eq!(
            is_excluded(windows, &patterns),
            is_excluded(plain, &patterns),
            "{windows}"
        );
    }

    assert!(is_included("Textures/wood.png", &patterns));
    assert!(!is_included("Textures/sub/wood.png", &patterns));
    assert!(is_included("tree.FBX", &patterns));
}
