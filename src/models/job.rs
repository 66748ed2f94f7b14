use crate::models::TextureTypeRule;
use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything the editor needs to build one bundle for one target.
///
/// Serialized with camelCase keys; `build_targets` is `null` for a targetless
/// build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub bundle_name: String,
    /// Staged location relative to the workspace (`Assets/Data/<id>`)
    pub bundle_path: String,
    pub asset_directory: Utf8PathBuf,
    pub output_directory: Utf8PathBuf,
    pub build_targets: Option<Vec<String>>,
    pub no_platform_suffix: bool,
    pub filename_format: String,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub texture_types: IndexMap<String, TextureTypeRule>,
}

impl JobDescriptor {
    /// The single target of this job, or `None` for a targetless job
    pub fn target(&self) -> Option<&str> {
        self.build_targets
            .as_ref()
            .and_then(|targets| targets.first())
            .map(String::as_str)
    }
}

/// The aggregated job file handed to the editor once per run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    pub bundles: Vec<JobDescriptor>,
}

impl JobFile {
    pub fn new(bundles: Vec<JobDescriptor>) -> Self {
        Self { bundles }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(targets: Option<Vec<String>>) -> JobDescriptor {
        JobDescriptor {
            bundle_name: "author.modname".to_string(),
            bundle_path: "Assets/Data/author.modname".to_string(),
            asset_directory: Utf8PathBuf::from("/mods/src"),
            output_directory: Utf8PathBuf::from("/mods/out"),
            no_platform_suffix: targets.is_none(),
            build_targets: targets,
            filename_format: "{name}".to_string(),
            include_patterns: vec!["*.prefab".to_string()],
            exclude_patterns: Vec::new(),
            texture_types: IndexMap::from([(
                "normal".to_string(),
                TextureTypeRule {
                    patterns: vec!["*_n.png".to_string()],
                },
            )]),
        }
    }

    #[test]
    fn test_job_file_wire_format() {
        let file = JobFile::new(vec![descriptor(None)]);
        let value: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();

        let bundle = &value["bundles"][0];
        assert_eq!(bundle["bundleName"], "author.modname");
        assert_eq!(bundle["bundlePath"], "Assets/Data/author.modname");
        assert_eq!(bundle["assetDirectory"], "/mods/src");
        assert_eq!(bundle["outputDirectory"], "/mods/out");
        assert!(bundle["buildTargets"].is_null());
        assert_eq!(bundle["noPlatformSuffix"], true);
        assert_eq!(bundle["filenameFormat"], "{name}");
        assert_eq!(bundle["includePatterns"][0], "*.prefab");
        assert!(bundle["excludePatterns"].as_array().unwrap().is_empty());
        assert_eq!(bundle["textureTypes"]["normal"]["patterns"][0], "*_n.png");
    }

    #[test]
    fn test_target_accessor() {
        assert_eq!(descriptor(None).target(), None);
        assert_eq!(
            descriptor(Some(vec!["mac".to_string()])).target(),
            Some("mac")
        );
    }
}
