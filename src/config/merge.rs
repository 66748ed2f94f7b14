//! Field merge policy shared by every configuration layer.
//!
//! Each config field falls into one of a few categories, and every merge in
//! the crate goes through the helpers here:
//!
//! | Kind          | Rule                                               |
//! |---------------|----------------------------------------------------|
//! | scalar        | child wins when present (and non-empty for text)    |
//! | list          | a non-empty child list replaces the parent list    |
//! | safety flag   | logical OR; a descendant cannot relax an ancestor  |
//! | map           | merged key by key, child entries win               |
//! | CLI list      | appended to the file-derived list, deduplicated    |

use crate::models::{BundleConfig, ConfigFile, GlobalConfig};
use camino::Utf8PathBuf;
use indexmap::IndexMap;

/// Scalar override: the child value wins whenever it is present
pub fn scalar<T>(parent: Option<T>, child: Option<T>) -> Option<T> {
    child.or(parent)
}

/// Text override: the child wins when present and not blank
pub fn text(parent: Option<String>, child: Option<String>) -> Option<String> {
    match child {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => parent,
    }
}

/// Path override: the child wins when present and not empty
pub fn path(parent: Option<Utf8PathBuf>, child: Option<Utf8PathBuf>) -> Option<Utf8PathBuf> {
    match child {
        Some(value) if !value.as_str().is_empty() => Some(value),
        _ => parent,
    }
}

/// List replacement: a non-empty child list replaces the parent wholesale
pub fn replace_list(parent: Vec<String>, child: Vec<String>) -> Vec<String> {
    if child.is_empty() { parent } else { child }
}

/// List union used for CLI values: `extra` is appended, skipping duplicates
pub fn union_list(mut base: Vec<String>, extra: &[String]) -> Vec<String> {
    for value in extra {
        if !base.contains(value) {
            base.push(value.clone());
        }
    }
    base
}

/// Safety flag: once any layer enables it, it stays enabled
pub fn strict_flag(parent: Option<bool>, child: Option<bool>) -> Option<bool> {
    match (parent, child) {
        (None, None) => None,
        (parent, child) => Some(parent.unwrap_or(false) || child.unwrap_or(false)),
    }
}

/// Key-wise map merge, child entries replace parent entries with the same key
pub fn map<V>(parent: IndexMap<String, V>, child: IndexMap<String, V>) -> IndexMap<String, V> {
    let mut merged = parent;
    for (key, value) in child {
        merged.insert(key, value);
    }
    merged
}

/// Merge two global tables, `child` layered over `parent`.
///
/// `extends` is dropped: it has been consumed by the loader by the time two
/// tables are merged.
pub fn merge_global(parent: GlobalConfig, child: GlobalConfig) -> GlobalConfig {
    GlobalConfig {
        extends: None,
        unity_version: text(parent.unity_version, child.unity_version),
        unity_path: path(parent.unity_path, child.unity_path),
        hub_path: path(parent.hub_path, child.hub_path),
        build_targets: replace_list(parent.build_targets, child.build_targets),
        link_method: scalar(parent.link_method, child.link_method),
        temp_project_path: path(parent.temp_project_path, child.temp_project_path),
        clean_temp_project: strict_flag(parent.clean_temp_project, child.clean_temp_project),
        log_file: path(parent.log_file, child.log_file),
        include_patterns: replace_list(parent.include_patterns, child.include_patterns),
        exclude_patterns: replace_list(parent.exclude_patterns, child.exclude_patterns),
        filename_format: text(parent.filename_format, child.filename_format),
        targetless: scalar(parent.targetless, child.targetless),
        assets_directory: path(parent.assets_directory, child.assets_directory),
        output_directory: path(parent.output_directory, child.output_directory),
        editor_scripts_directory: path(
            parent.editor_scripts_directory,
            child.editor_scripts_directory,
        ),
        texture_types: map(parent.texture_types, child.texture_types),
    }
}

/// Merge two definitions of the same bundle, `child` layered over `parent`
pub fn merge_bundle(parent: BundleConfig, child: BundleConfig) -> BundleConfig {
    BundleConfig {
        name: text(parent.name, child.name),
        assets_directory: path(parent.assets_directory, child.assets_directory),
        output_directory: path(parent.output_directory, child.output_directory),
        custom_output_path: path(parent.custom_output_path, child.custom_output_path),
        filename_format: text(parent.filename_format, child.filename_format),
        include_patterns: replace_list(parent.include_patterns, child.include_patterns),
        exclude_patterns: replace_list(parent.exclude_patterns, child.exclude_patterns),
        targetless: scalar(parent.targetless, child.targetless),
        build_targets: replace_list(parent.build_targets, child.build_targets),
        texture_types: map(parent.texture_types, child.texture_types),
    }
}

/// Merge two whole files: globals layered, bundles merged key by key
pub fn merge_file(parent: ConfigFile, child: ConfigFile) -> ConfigFile {
    let global = merge_global(parent.global, child.global);

    let mut bundles = parent.bundles;
    for (key, bundle) in child.bundles {
        match bundles.get_mut(&key) {
            // Keeps the parent's position in declaration order
            Some(existing) => *existing = merge_bundle(std::mem::take(existing), bundle),
            None => {
                bundles.insert(key, bundle);
            }
        }
    }

    ConfigFile { global, bundles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkMethod;

    #[test]
    fn test_text_ignores_blank_child() {
        assert_eq!(
            text(Some("parent".into()), Some("  ".into())),
            Some("parent".to_string())
        );
        assert_eq!(
            text(Some("parent".into()), Some("child".into())),
            Some("child".to_string())
        );
        assert_eq!(text(None, None), None);
    }

    #[test]
    fn test_strict_flag_cannot_be_relaxed() {
        assert_eq!(strict_flag(Some(true), Some(false)), Some(true));
        assert_eq!(strict_flag(Some(false), Some(true)), Some(true));
        assert_eq!(strict_flag(None, Some(false)), Some(false));
        assert_eq!(strict_flag(None, None), None);
    }

    #[test]
    fn test_list_replace_and_union() {
        let parent = vec!["*.png".to_string()];
        assert_eq!(replace_list(parent.clone(), Vec::new()), parent);
        assert_eq!(
            replace_list(parent.clone(), vec!["*.fbx".to_string()]),
            vec!["*.fbx"]
        );
        assert_eq!(
            union_list(parent, &["*.fbx".to_string(), "*.png".to_string()]),
            vec!["*.png", "*.fbx"]
        );
    }

    #[test]
    fn test_merge_global_child_wins() {
        let parent = GlobalConfig {
            unity_version: Some("2021.3.1f1".into()),
            hub_path: Some("/opt/hub".into()),
            link_method: Some(LinkMethod::Copy),
            clean_temp_project: Some(true),
            ..Default::default()
        };
        let child = GlobalConfig {
            extends: Some("../base".into()),
            unity_version: Some("2022.3.10f1".into()),
            link_method: Some(LinkMethod::Symlink),
            clean_temp_project: Some(false),
            ..Default::default()
        };

        let merged = merge_global(parent, child);
        assert_eq!(merged.extends, None);
        assert_eq!(merged.unity_version.as_deref(), Some("2022.3.10f1"));
        assert_eq!(merged.hub_path.as_deref().map(|p| p.as_str()), Some("/opt/hub"));
        assert_eq!(merged.link_method, Some(LinkMethod::Symlink));
        assert_eq!(merged.clean_temp_project, Some(true));
    }

    #[test]
    fn test_merge_file_bundles_keywise() {
        let mut parent = ConfigFile::default();
        parent.bundles.insert(
            "shared".into(),
            BundleConfig {
                assets_directory: Some("/base/assets".into()),
                targetless: Some(true),
                ..Default::default()
            },
        );
        parent.bundles.insert("parent_only".into(), BundleConfig::default());

        let mut child = ConfigFile::default();
        child.bundles.insert(
            "shared".into(),
            BundleConfig {
                assets_directory: Some("/child/assets".into()),
                ..Default::default()
            },
        );

        let merged = merge_file(parent, child);
        assert_eq!(merged.bundles.len(), 2);
        let shared = &merged.bundles["shared"];
        assert_eq!(shared.assets_directory.as_deref().map(|p| p.as_str()), Some("/child/assets"));
        assert_eq!(shared.targetless, Some(true));
        assert_eq!(merged.bundles.keys().collect::<Vec<_>>(), ["shared", "parent_only"]);
    }
}
