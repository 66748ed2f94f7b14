//! Command-line surface.
//!
//! [`Cli`] is what clap parses; [`CliOverrides`] is what the rest of the
//! crate consumes. The conversion between them is written out by hand in
//! `From<&Cli>`.

use crate::models::{CliOverrides, DumpFormat, LinkMethod, Verbosity};
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "assetbundler")]
#[command(author, version, about = "Build Unity asset bundles from plain asset directories", long_about = None)]
pub struct Cli {
    /// Bundles to build, by key or name (default: all bundles in the config)
    pub bundles: Vec<String>,

    /// Configuration file (default: .assetbundler.toml in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Build target; repeatable. `none` builds a single platform-independent bundle
    #[arg(short = 't', long = "target", value_name = "TARGET", action = ArgAction::Append)]
    pub targets: Vec<String>,

    /// How asset directories are placed in the workspace
    #[arg(long, value_name = "METHOD", conflicts_with_all = ["copy", "symlink", "hardlink", "junction"])]
    pub link_method: Option<LinkMethod>,

    /// Shorthand for --link-method copy
    #[arg(long, group = "link_shorthand")]
    pub copy: bool,

    /// Shorthand for --link-method symlink
    #[arg(long, group = "link_shorthand")]
    pub symlink: bool,

    /// Shorthand for --link-method hardlink
    #[arg(long, group = "link_shorthand")]
    pub hardlink: bool,

    /// Shorthand for --link-method junction (Windows only)
    #[arg(long, group = "link_shorthand")]
    pub junction: bool,

    /// Editor version to locate in the standard install locations
    #[arg(long, value_name = "VERSION")]
    pub unity_version: Option<String>,

    /// Editor executable
    #[arg(long, value_name = "PATH")]
    pub unity_path: Option<Utf8PathBuf>,

    /// Unity Hub executable
    #[arg(long, value_name = "PATH")]
    pub hub_path: Option<Utf8PathBuf>,

    /// Use this workspace instead of the derived one
    #[arg(long, value_name = "DIR")]
    pub temp_project_path: Option<Utf8PathBuf>,

    /// Delete the workspace before and after the build
    #[arg(long)]
    pub clean_temp: bool,

    /// Editor log file passed through as -logfile
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<Utf8PathBuf>,

    /// Artifact file name template, e.g. "{name}_{target}"
    #[arg(long, value_name = "FORMAT")]
    pub filename_format: Option<String>,

    /// Include pattern; repeatable, appended to the configured ones
    #[arg(long = "include", value_name = "GLOB", action = ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude pattern; repeatable, appended to the configured ones
    #[arg(long = "exclude", value_name = "GLOB", action = ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Asset directory for every selected bundle
    #[arg(long = "assets-dir", value_name = "DIR")]
    pub assets_directory: Option<Utf8PathBuf>,

    /// Output directory for every selected bundle
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_directory: Option<Utf8PathBuf>,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<Utf8PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Print debug output, including the editor's output streams
    #[arg(short, long)]
    pub verbose: bool,

    /// Print everything
    #[arg(long)]
    pub debug: bool,

    /// Run in CI mode: the Hub is neither required nor touched (implied by CI=true)
    #[arg(long)]
    pub ci: bool,

    /// Never prompt
    #[arg(long)]
    pub non_interactive: bool,

    /// List the bundles in the configuration and exit
    #[arg(long)]
    pub list_bundles: bool,

    /// Print the merged configuration and exit
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "toml")]
    pub dump_config: Option<DumpFormat>,
}

impl Cli {
    /// Link method from `--link-method` or one of its shorthands
    pub fn link_method(&self) -> Option<LinkMethod> {
        if self.link_method.is_some() {
            return self.link_method;
        }
        [
            (self.copy, LinkMethod::Copy),
            (self.symlink, LinkMethod::Symlink),
            (self.hardlink, LinkMethod::Hardlink),
            (self.junction, LinkMethod::Junction),
        ]
        .into_iter()
        .find_map(|(set, method)| set.then_some(method))
    }

    pub fn verbosity(&self) -> Verbosity {
        if self.debug {
            Verbosity::Debug
        } else if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            bundles: cli.bundles.clone(),
            config_path: cli.config.clone(),
            targets: cli.targets.clone(),
            link_method: cli.link_method(),
            unity_version: cli.unity_version.clone(),
            unity_path: cli.unity_path.clone(),
            hub_path: cli.hub_path.clone(),
            temp_project_path: cli.temp_project_path.clone(),
            clean_temp_project: cli.clean_temp,
            log_file: cli.log_file.clone(),
            filename_format: cli.filename_format.clone(),
            include_patterns: cli.include_patterns.clone(),
            exclude_patterns: cli.exclude_patterns.clone(),
            assets_directory: cli.assets_directory.clone(),
            output_directory: cli.output_directory.clone(),
            ci: cli.ci,
            non_interactive: cli.non_interactive,
            list_bundles: cli.list_bundles,
            dump_config: cli.dump_config,
            verbosity: cli.verbosity(),
        }
    }
}
