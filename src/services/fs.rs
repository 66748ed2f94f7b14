//! Filesystem operations used for workspace staging.
//!
//! Everything that touches the disk while staging a workspace goes through the
//! [`FileSystem`] trait, so the orchestrator can be driven against a fake in
//! tests. [`RealFileSystem`] is the production implementation.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use walkdir::WalkDir;

/// A single entry produced by [`FileSystem::walk`], relative to the walk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub relative: Utf8PathBuf,
    pub is_dir: bool,
}

/// Filesystem primitives needed to stage a workspace
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Utf8Path) -> bool;

    fn is_dir(&self, path: &Utf8Path) -> bool;

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()>;

    /// Remove a directory tree, or a directory link without following it
    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()>;

    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()>;

    fn hard_link(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()>;

    fn symlink_dir(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()>;

    fn junction(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()>;

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()>;

    /// List every file and directory below `root` (not including `root` itself)
    fn walk(&self, root: &Utf8Path) -> io::Result<Vec<WalkEntry>>;

    /// Clear the read-only attribute on every entry below `root`
    fn clear_readonly(&self, root: &Utf8Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        let metadata = fs::symlink_metadata(path)?;
        if metadata.file_type().is_symlink() || is_reparse_point(&metadata) {
            // Links are removed without touching their target
            return remove_link(path);
        }
        fs::remove_dir_all(path)
    }

    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    fn hard_link(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
        fs::hard_link(original, link)
    }

    #[cfg(unix)]
    fn symlink_dir(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
        std::os::unix::fs::symlink(original, link)
    }

    #[cfg(windows)]
    fn symlink_dir(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
        std::os::windows::fs::symlink_dir(original, link)
    }

    #[cfg(not(any(unix, windows)))]
    fn symlink_dir(&self, _original: &Utf8Path, _link: &Utf8Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symbolic links are not supported on this platform",
        ))
    }

    #[cfg(windows)]
    fn junction(&self, original: &Utf8Path, link: &Utf8Path) -> io::Result<()> {
        junction::create(original, link)
    }

    #[cfg(not(windows))]
    fn junction(&self, _original: &Utf8Path, _link: &Utf8Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "junctions are only supported on Windows",
        ))
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn walk(&self, root: &Utf8Path) -> io::Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(root.as_std_path())
                .map_err(io::Error::other)?;
            let relative = Utf8PathBuf::try_from(relative.to_path_buf())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            entries.push(WalkEntry {
                relative,
                is_dir: entry.file_type().is_dir(),
            });
        }

        Ok(entries)
    }

    fn clear_readonly(&self, root: &Utf8Path) -> io::Result<()> {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.path_is_symlink() {
                continue;
            }
            let metadata = entry.metadata().map_err(io::Error::from)?;
            let mut permissions = metadata.permissions();
            if permissions.readonly() {
                #[allow(clippy::permissions_set_readonly_false)]
                permissions.set_readonly(false);
                fs::set_permissions(entry.path(), permissions)?;
            }
        }
        Ok(())
    }
}

#[cfg(windows)]
fn is_reparse_point(metadata: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;
    metadata.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
}

#[cfg(not(windows))]
fn is_reparse_point(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(windows)]
fn remove_link(path: &Utf8Path) -> io::Result<()> {
    // Directory symlinks and junctions are directories on Windows
    fs::remove_dir(path)
}

#[cfg(not(windows))]
fn remove_link(path: &Utf8Path) -> io::Result<()> {
    fs::remove_file(path)
}
