// AssetBundler - build Unity asset bundles from plain asset directories
//
// This is the library crate containing configuration handling and the build
// pipeline. The binary crate (main.rs) provides the command-line entry point.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigLoader, ResolvedBundle, ResolvedConfiguration};
pub use models::{BundleConfig, CliOverrides, ConfigFile, GlobalConfig, JobDescriptor, LinkMethod};
pub use services::{BuildError, BuildOrchestrator, BuildOutcome, BuildReport};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
