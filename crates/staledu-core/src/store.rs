//! Ordered store of directory groups.

use std::collections::BTreeMap;
use std::collections::btree_map;

use tracing::trace;

use crate::group::DirectoryGroup;

/// Groups in ascending key order.
pub type SortedGroups<'a> = btree_map::Values<'a, String, DirectoryGroup>;

/// One [`DirectoryGroup`] per distinct grouping key, ordered byte-wise by key.
///
/// Owned by a single scan; nothing is removed while the walk is running.
#[derive(Debug, Clone, Default)]
pub struct AggregationStore {
    groups: BTreeMap<String, DirectoryGroup>,
}

impl AggregationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry's size to the group for `key`, creating the group at
    /// `level` if it does not exist yet. An existing group keeps its level.
    pub fn accumulate(
        &mut self,
        key: impl Into<String>,
        level: u32,
        size: u64,
        is_stale: bool,
    ) -> &DirectoryGroup {
        let group = self.groups.entry(key.into()).or_insert_with_key(|key| {
            trace!(key, level, "new group");
            DirectoryGroup::new(key.clone(), level)
        });
        group.add(size, is_stale);
        group
    }

    /// Look up the group for `key`.
    pub fn find(&self, key: &str) -> Option<&DirectoryGroup> {
        self.groups.get(key)
    }

    /// Remove and return the group for `key`.
    pub fn remove(&mut self, key: &str) -> Option<DirectoryGroup> {
        self.groups.remove(key)
    }

    /// Iterate over the groups in ascending key order.
    pub fn iter_sorted(&self) -> SortedGroups<'_> {
        self.groups.values()
    }

    /// Visit every group in ascending key order.
    pub fn for_each_sorted(&self, visit: impl FnMut(&DirectoryGroup)) {
        self.iter_sorted().for_each(visit);
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no entry has been accumulated yet.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total bytes over every group.
    pub fn total_bytes(&self) -> u64 {
        self.groups.values().map(DirectoryGroup::total_bytes).sum()
    }

    /// Stale bytes over every group.
    pub fn stale_bytes(&self) -> u64 {
        self.groups.values().map(DirectoryGroup::stale_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_creates_then_adds() {
        let mut store = AggregationStore::new();
        store.accumulate("/a/b", 1, 10, false);
        let group = store.accumulate("/a/b", 1, 5, true);

        assert_eq!(group.total_bytes(), 15);
        assert_eq!(group.stale_bytes(), 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_level_first_write_wins() {
        let mut store = AggregationStore::new();
        store.accumulate("/a/b", 1, 10, false);
        store.accumulate("/a/b", 2, 10, false);

        assert_eq!(store.find("/a/b").unwrap().level(), 1);
    }

    #[test]
    fn test_sorted_iteration_is_bytewise() {
        let mut store = AggregationStore::new();
        for key in ["/r/b", "/r/a/x", "/r/a", "/r/a-z", "/r"] {
            store.accumulate(key, 0, 1, false);
        }

        let keys: Vec<&str> = store.iter_sorted().map(DirectoryGroup::key).collect();
        assert_eq!(keys, vec!["/r", "/r/a", "/r/a-z", "/r/a/x", "/r/b"]);
    }

    #[test]
    fn test_remove() {
        let mut store = AggregationStore::new();
        store.accumulate("/r", 0, 1, false);
        store.accumulate("/r/a", 1, 1, false);

        let removed = store.remove("/r").unwrap();
        assert_eq!(removed.key(), "/r");
        assert!(store.find("/r").is_none());
        assert!(store.remove("/r").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_for_each_sorted() {
        let mut store = AggregationStore::new();
        store.accumulate("/r/b", 1, 2, true);
        store.accumulate("/r/a", 1, 3, false);

        let mut seen = Vec::new();
        store.for_each_sorted(|group| seen.push(group.key().to_string()));
        assert_eq!(seen, vec!["/r/a", "/r/b"]);
        assert_eq!(store.total_bytes(), 5);
        assert_eq!(store.stale_bytes(), 2);
    }
}
