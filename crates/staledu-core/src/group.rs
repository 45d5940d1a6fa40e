//! Per-directory accumulator.

/// Byte totals for every filesystem entry that maps to one grouping key.
///
/// `stale_bytes` never exceeds `total_bytes`, and `level` is fixed by the
/// first entry that created the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    key: String,
    total_bytes: u64,
    stale_bytes: u64,
    level: u32,
}

impl DirectoryGroup {
    pub(crate) fn new(key: String, level: u32) -> Self {
        Self {
            key,
            total_bytes: 0,
            stale_bytes: 0,
            level,
        }
    }

    pub(crate) fn add(&mut self, size: u64, is_stale: bool) {
        self.total_bytes = self.total_bytes.saturating_add(size);
        if is_stale {
            self.stale_bytes = self.stale_bytes.saturating_add(size);
        }
    }

    /// The truncated path this group collects.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sum of sizes of every entry in the group.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Sum of sizes of the entries accessed before the cutoff.
    pub fn stale_bytes(&self) -> u64 {
        self.stale_bytes
    }

    /// Depth below the root at which the group was first seen.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Stale share of the group in percent, `0.0` for an empty group.
    pub fn stale_percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.stale_bytes as f64 / self.total_bytes as f64 * 100.0
        }
    }

    /// Final path component of the key.
    pub fn basename(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}
