//! Grouping key resolution.
//!
//! A grouping key is a prefix truncation of an entry's directory: everything
//! up to `max_depth` components below the root. Subtrees that only differ
//! below that depth collapse into the same group, which bounds the number of
//! report rows regardless of how deep or wide the tree is.

use crate::config::ScanContext;

const SEPARATOR: u8 = b'/';

/// Kind of a visited filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory.
    Directory,
    /// Regular file.
    File,
    /// Symbolic link (never followed).
    Symlink,
    /// Sockets, fifos, devices.
    Other,
}

impl EntryKind {
    /// Whether the entry is accounted to its parent directory rather than
    /// to itself.
    pub fn groups_under_parent(self) -> bool {
        !matches!(self, Self::Directory)
    }
}

/// A resolved grouping key and its display depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    /// Truncated path.
    pub path: String,
    /// Components between the root and the truncation point.
    pub level: u32,
}

/// Maps entry paths to grouping keys for one scan root.
#[derive(Debug, Clone, Copy)]
pub struct GroupKeyResolver<'a> {
    root: &'a str,
    max_depth: u32,
}

impl<'a> GroupKeyResolver<'a> {
    /// Create a resolver for the root and depth of `context`.
    pub fn new(context: &'a ScanContext) -> Self {
        Self::with_root(&context.root, context.max_depth)
    }

    /// Create a resolver for an explicit root and depth.
    pub fn with_root(root: &'a str, max_depth: u32) -> Self {
        Self { root, max_depth }
    }

    /// Resolve the grouping key of an entry.
    pub fn resolve(&self, entry_path: &str, kind: EntryKind) -> GroupKey {
        let candidate = if kind.groups_under_parent() {
            parent_of(entry_path)
        } else {
            entry_path
        };
        let candidate = strip_trailing_separator(candidate);

        // At or above the root.
        if candidate.len() <= self.root.len() {
            return GroupKey {
                path: self.root.to_string(),
                level: 0,
            };
        }

        let bytes = candidate.as_bytes();
        let mut separators = 0u32;
        let mut end = bytes.len();
        for (i, &byte) in bytes.iter().enumerate().skip(self.scan_start()) {
            if byte == SEPARATOR {
                separators += 1;
                if separators > self.max_depth {
                    end = i;
                    break;
                }
            }
        }

        GroupKey {
            path: candidate[..end].to_string(),
            level: separators.min(self.max_depth),
        }
    }

    /// Offset of the separator that opens the first component below the root.
    fn scan_start(&self) -> usize {
        if self.root.as_bytes() == [SEPARATOR] {
            0
        } else {
            self.root.len()
        }
    }
}

fn parent_of(path: &str) -> &str {
    match path.as_bytes().iter().rposition(|&b| b == SEPARATOR) {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "",
    }
}

fn strip_trailing_separator(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}
