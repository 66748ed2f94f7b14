use crate::config::{ConfigError, absolutize, merge, normalize_lexically};
use crate::models::{ConfigFile, DEFAULT_CONFIG_FILENAME};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Loads TOML configuration files and follows their `extends` chains.
///
/// `extends` may name:
/// - a directory: the file with the same name inside it is preferred, then
///   `.assetbundler.toml`
/// - a file, relative to the directory of the file that references it
///
/// Relative paths inside each file are resolved against that file's own
/// directory before merging, so inherited paths keep pointing where their
/// author intended.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load `path` and every ancestor it extends, merged child-over-parent
    pub fn load(&self, path: &Utf8Path) -> Result<ConfigFile, ConfigError> {
        let cwd = current_dir();
        let mut chain = Vec::new();
        self.load_with_extends(&absolutize(path, &cwd), &mut chain)
    }

    /// Look for the default configuration file in `dir`
    pub fn find_default(dir: &Utf8Path) -> Option<Utf8PathBuf> {
        let candidate = dir.join(DEFAULT_CONFIG_FILENAME);
        candidate.is_file().then_some(candidate)
    }

    fn load_with_extends(
        &self,
        path: &Utf8Path,
        chain: &mut Vec<Utf8PathBuf>,
    ) -> Result<ConfigFile, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let identity = canonical_identity(path);
        if chain.contains(&identity) {
            let cycle = chain
                .iter()
                .chain(std::iter::once(&identity))
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ConfigError::CircularReference(cycle));
        }
        chain.push(identity);

        let mut file = self.parse_file(path)?;
        let config_dir = path.parent().map(Utf8Path::to_path_buf).unwrap_or_default();
        resolve_relative_paths(&mut file, &config_dir);

        let extends = file.global.extends.take().filter(|e| !e.trim().is_empty());
        let resolved = match extends {
            Some(extends) => {
                let file_name = path.file_name().unwrap_or(DEFAULT_CONFIG_FILENAME);
                let parent_path = resolve_extends(&config_dir, file_name, &extends)?;
                tracing::debug!("{} extends {}", path, parent_path);

                let parent = self.load_with_extends(&parent_path, chain)?;
                merge::merge_file(parent, file)
            }
            None => file,
        };

        chain.pop();
        Ok(resolved)
    }

    fn parse_file(&self, path: &Utf8Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            "Parsed config {} ({} bundles)",
            path,
            file.bundles.len()
        );
        Ok(file)
    }
}

/// Turn an `extends` value into the path of the parent configuration file
fn resolve_extends(
    config_dir: &Utf8Path,
    file_name: &str,
    extends: &str,
) -> Result<Utf8PathBuf, ConfigError> {
    let target = absolutize(Utf8Path::new(extends.trim()), config_dir);

    if target.is_dir() {
        let same_name = target.join(file_name);
        if same_name.is_file() {
            return Ok(same_name);
        }

        let default = target.join(DEFAULT_CONFIG_FILENAME);
        if default.is_file() {
            return Ok(default);
        }

        return Err(ConfigError::FileNotFound(default));
    }

    Ok(target)
}

fn resolve_relative_paths(file: &mut ConfigFile, config_dir: &Utf8Path) {
    let global = &mut file.global;
    for field in [
        &mut global.unity_path,
        &mut global.hub_path,
        &mut global.temp_project_path,
        &mut global.log_file,
        &mut global.assets_directory,
        &mut global.output_directory,
        &mut global.editor_scripts_directory,
    ] {
        resolve_field(field, config_dir);
    }

    for bundle in file.bundles.values_mut() {
        for field in [
            &mut bundle.assets_directory,
            &mut bundle.output_directory,
            &mut bundle.custom_output_path,
        ] {
            resolve_field(field, config_dir);
        }
    }
}

fn resolve_field(field: &mut Option<Utf8PathBuf>, base: &Utf8Path) {
    if let Some(path) = field.as_mut() {
        if !path.as_str().is_empty() && path.is_relative() {
            *path = absolutize(path, base);
        }
    }
}

fn canonical_identity(path: &Utf8Path) -> Utf8PathBuf {
    path.canonicalize_utf8()
        .unwrap_or_else(|_| normalize_lexically(path))
}

pub(crate) fn current_dir() -> Utf8PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::try_from(dir).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}
