//! Scan pipeline: descriptor probe, walk, aggregation.

use std::path::Path;
use std::time::{Duration, Instant};

use staledu_core::{AggregationStore, GroupKeyResolver, ScanContext, ScanError};
use tracing::{debug, info};

use crate::probe::{DescriptorProbe, ResourceBudgetProbe};
use crate::walker::TreeWalker;

/// Counters collected while walking.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Entries visited, the root included.
    pub entries: u64,
    /// Bytes over every entry.
    pub total_bytes: u64,
    /// Bytes over the stale entries.
    pub stale_bytes: u64,
    /// Distinct grouping keys.
    pub groups: usize,
    /// Descriptor budget the walk ran with.
    pub fd_budget: u64,
    /// Wall-clock duration of the scan.
    pub elapsed: Duration,
}

impl ScanSummary {
    fn record(&mut self, size: u64, is_stale: bool) {
        self.entries += 1;
        self.total_bytes = self.total_bytes.saturating_add(size);
        if is_stale {
            self.stale_bytes = self.stale_bytes.saturating_add(size);
        }
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Populated groups, ready for rendering.
    pub store: AggregationStore,
    /// Scan counters.
    pub summary: ScanSummary,
}

/// Runs a complete scan of one root.
#[derive(Debug, Clone, Default)]
pub struct Scanner<P = DescriptorProbe> {
    probe: P,
}

impl Scanner {
    /// Create a scanner that probes the process descriptor budget.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ResourceBudgetProbe> Scanner<P> {
    /// Create a scanner with a custom budget probe.
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Probe the descriptor budget, walk `context.root` and aggregate every
    /// entry. Any failure aborts the whole scan.
    pub fn scan(&self, context: &ScanContext) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();
        let fd_budget = self.probe.probe()?;

        let root = Path::new(&context.root);
        let metadata = std::fs::metadata(root).map_err(|e| ScanError::traversal(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        debug!(
            root = %context.root,
            max_depth = context.max_depth,
            atime_days = context.atime_days,
            fd_budget,
            "starting scan"
        );

        let resolver = GroupKeyResolver::new(context);
        let cutoff = context.atime_cutoff();
        let mut store = AggregationStore::new();
        let mut summary = ScanSummary {
            fd_budget,
            ..ScanSummary::default()
        };

        TreeWalker::new(root, fd_budget).walk(|entry| {
            let key = resolver.resolve(&entry.path, entry.kind);
            let is_stale = entry.accessed < cutoff;
            store.accumulate(key.path, key.level, entry.size, is_stale);
            summary.record(entry.size, is_stale);
            Ok(())
        })?;

        summary.groups = store.len();
        summary.elapsed = start.elapsed();

        info!(
            entries = summary.entries,
            groups = summary.groups,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "scan complete"
        );

        Ok(ScanOutcome { store, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FixedBudget;
    use staledu_core::ErrorClass;
    use std::fs;
    use tempfile::TempDir;

    struct FailingProbe;

    impl ResourceBudgetProbe for FailingProbe {
        fn probe(&self) -> Result<u64, ScanError> {
            Err(ScanError::ProbeAllocation { ceiling: u64::MAX })
        }
    }

    #[test]
    fn test_probe_failure_aborts_before_walk() {
        let context = ScanContext::new("/definitely/not/here");
        let err = Scanner::with_probe(FailingProbe).scan(&context).unwrap_err();
        assert_eq!(err.class(), ErrorClass::ResourceLimit);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let context = ScanContext::new(temp.path().join("missing"));
        let err = Scanner::with_probe(FixedBudget(16)).scan(&context).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Traversal);
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = Scanner::with_probe(FixedBudget(16))
            .scan(&ScanContext::new(&file))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_summary_matches_store() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/a.txt"), "aaaa").unwrap();

        let outcome = Scanner::with_probe(FixedBudget(16))
            .scan(&ScanContext::new(temp.path()))
            .unwrap();

        assert_eq!(outcome.summary.entries, 3);
        assert_eq!(outcome.summary.groups, outcome.store.len());
        assert_eq!(outcome.summary.total_bytes, outcome.store.total_bytes());
        assert_eq!(outcome.summary.stale_bytes, outcome.store.stale_bytes());
        assert_eq!(outcome.summary.fd_budget, 16);
    }
}
