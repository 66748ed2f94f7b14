//! Services module - the build pipeline behind the CLI.
//!
//! Nothing in here parses arguments or prints to the terminal. Every service
//! takes its collaborators explicitly, which keeps each one testable on its
//! own.
//!
//! # Components
//!
//! - [`hash`]: short deterministic hashes used to name workspaces
//! - [`patterns`]: glob-style include/exclude matching on asset paths
//! - [`fs`]: the [`FileSystem`] abstraction and its `std::fs` implementation
//! - [`linking`]: [`AssetLinker`], materializing asset directories by copy or link
//! - [`workspace`]: [`WorkspaceManager`], the staging project's lifecycle
//! - [`process`]: [`ProcessRunner`], running the editor and capturing its output
//! - [`launcher`]: [`LauncherControl`], starting and stopping the Hub
//! - [`detection`]: editor, Hub and CI auto-detection
//! - [`outputs`]: artifact naming and post-build verification
//! - [`orchestrator`]: [`BuildOrchestrator`], tying the above into one run
//!
//! # Usage Example
//!
//! ```ignore
//! use assetbundler::services::{BuildOrchestrator, RealFileSystem, SystemLauncher, TokioProcessRunner};
//! use std::sync::Arc;
//!
//! let mut orchestrator = BuildOrchestrator::new(
//!     Arc::new(RealFileSystem),
//!     Arc::new(TokioProcessRunner),
//!     Arc::new(SystemLauncher::for_hub(resolved.hub_path())),
//!     std::env::temp_dir().try_into()?,
//! );
//! let report = orchestrator.run(&resolved).await?;
//! std::process::exit(report.exit_code());
//! ```

pub mod detection;
pub mod fs;
pub mod hash;
pub mod launcher;
pub mod linking;
pub mod orchestrator;
pub mod outputs;
pub mod patterns;
pub mod process;
pub mod workspace;

pub use fs::{FileSystem, RealFileSystem, WalkEntry};
pub use hash::compute_hash;
pub use launcher::{LauncherControl, SystemLauncher};
pub use linking::{AssetLinker, LinkError, LinkOutcome};
pub use orchestrator::{BuildError, BuildOrchestrator, BuildOutcome, BuildPhase, BuildReport};
pub use patterns::{GlobPattern, PatternError, PatternSet, is_excluded, is_included};
pub use process::{ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use workspace::WorkspaceManager;
