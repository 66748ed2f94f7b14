//! Data models for the AssetBundler application.
//!
//! - [`ConfigFile`], [`GlobalConfig`], [`BundleConfig`]: the TOML configuration format
//! - [`CliOverrides`]: values supplied on the command line, applied last
//! - [`JobDescriptor`], [`JobFile`]: the per-bundle build instructions handed to the editor
//!
//! Config structs keep every field optional so that layering can tell "not
//! specified" apart from an explicit value. Merging lives in [`crate::config`].

pub mod config;
pub mod job;

pub use config::{
    BundleConfig, CliOverrides, ConfigFile, DEFAULT_CONFIG_FILENAME, DumpFormat,
    FORBIDDEN_BUNDLE_SUFFIXES, GlobalConfig, KNOWN_BUILD_TARGETS, LinkMethod, TARGETLESS_TARGET,
    TextureTypeRule, Verbosity, host_build_target,
};
pub use job::{JobDescriptor, JobFile};
