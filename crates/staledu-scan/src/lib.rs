//! Filesystem side of staledu.
//!
//! This crate walks a directory tree and feeds every entry into an
//! [`AggregationStore`]:
//!
//! - **Descriptor budget** probed from `RLIMIT_NOFILE` before the walk
//! - **Physical walk** via walkdir: depth-first, symlinks not followed,
//!   confined to the root's filesystem
//! - **Fatal errors**: the first traversal failure aborts the scan
//!
//! # Example
//!
//! ```rust,no_run
//! use staledu_scan::{ScanContext, Scanner};
//!
//! let context = ScanContext::new("/path/to/scan");
//! let outcome = Scanner::new().scan(&context).unwrap();
//!
//! for group in outcome.store.iter_sorted() {
//!     println!("{} {} {}", group.key(), group.total_bytes(), group.stale_bytes());
//! }
//! ```

mod probe;
mod scanner;
mod walker;

pub use probe::{DescriptorProbe, FixedBudget, ResourceBudgetProbe, probe_fd_budget};
pub use scanner::{ScanOutcome, ScanSummary, Scanner};
pub use walker::{Entries, TreeWalker, VisitedEntry};

// Re-export core types for convenience
pub use staledu_core::{
    AggregationStore, DirectoryGroup, EntryKind, ErrorClass, GroupKeyResolver, ScanContext,
    ScanError,
};
