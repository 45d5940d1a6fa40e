//! Depth-first, single-filesystem directory walk.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use staledu_core::{EntryKind, ScanError};
use walkdir::WalkDir;

/// One entry produced by the walk.
#[derive(Debug, Clone)]
pub struct VisitedEntry {
    /// Full path of the entry.
    pub path: String,
    /// Entry kind, without following symlinks.
    pub kind: EntryKind,
    /// Size of the entry itself in bytes.
    pub size: u64,
    /// Last access time.
    pub accessed: SystemTime,
}

/// Physical traversal of one directory tree.
///
/// Symlinks are reported as leaves and never followed, mount points below
/// the root are not entered, and no more than `fd_budget` directories are
/// held open at once.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    fd_budget: usize,
}

impl TreeWalker {
    /// Create a walker for `root`.
    pub fn new(root: impl Into<PathBuf>, fd_budget: u64) -> Self {
        Self {
            root: root.into(),
            fd_budget: usize::try_from(fd_budget).unwrap_or(usize::MAX).max(1),
        }
    }

    /// Root of the walk.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily iterate over every entry, the root included.
    ///
    /// The sequence ends after the first error.
    pub fn entries(&self) -> Entries {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .same_file_system(true)
            .max_open(self.fd_budget)
            .into_iter();
        Entries {
            inner,
            failed: false,
        }
    }

    /// Call `visit` for every entry. Stops at, and returns, the first error
    /// from either the walk or `visit`.
    pub fn walk<F>(&self, mut visit: F) -> Result<u64, ScanError>
    where
        F: FnMut(VisitedEntry) -> Result<(), ScanError>,
    {
        let mut visited = 0u64;
        for entry in self.entries() {
            visit(entry?)?;
            visited += 1;
        }
        Ok(visited)
    }
}

/// Iterator over the entries of a [`TreeWalker`].
pub struct Entries {
    inner: walkdir::IntoIter,
    failed: bool,
}

impl Iterator for Entries {
    type Item = Result<VisitedEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self
            .inner
            .next()?
            .map_err(traversal_error)
            .and_then(visited_entry);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Entries {}

fn visited_entry(entry: walkdir::DirEntry) -> Result<VisitedEntry, ScanError> {
    let metadata = entry.metadata().map_err(traversal_error)?;
    let accessed = metadata
        .accessed()
        .map_err(|e| ScanError::traversal(entry.path(), e))?;

    let file_type = entry.file_type();
    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    Ok(VisitedEntry {
        path: entry.path().to_string_lossy().into_owned(),
        kind,
        size: metadata.len(),
        accessed,
    })
}

fn traversal_error(err: walkdir::Error) -> ScanError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    ScanError::traversal(path, source)
}
