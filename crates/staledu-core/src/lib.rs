//! Core types for staledu.
//!
//! This crate holds the pieces of the aggregation engine that do not touch
//! the filesystem: the scan context, grouping-key resolution and the ordered
//! store of per-directory accumulators.
//!
//! # Example
//!
//! ```rust
//! use staledu_core::{AggregationStore, EntryKind, GroupKeyResolver, ScanContext};
//!
//! let context = ScanContext::builder()
//!     .root("/a/b")
//!     .max_depth(1u32)
//!     .build()
//!     .unwrap();
//!
//! let resolver = GroupKeyResolver::new(&context);
//! let key = resolver.resolve("/a/b/c/d/file.txt", EntryKind::File);
//! assert_eq!(key.path, "/a/b/c");
//! assert_eq!(key.level, 1);
//!
//! let mut store = AggregationStore::new();
//! store.accumulate(&key.path, key.level, 512, true);
//! assert_eq!(store.find("/a/b/c").unwrap().stale_bytes(), 512);
//! ```

mod config;
mod error;
mod group;
mod key;
mod store;

pub use config::{
    DEFAULT_ATIME_DAYS, DEFAULT_MAX_DEPTH, SECONDS_PER_DAY, ScanContext, ScanContextBuilder,
    ScanContextBuilderError, Units,
};
pub use error::{ErrorClass, ScanError};
pub use group::DirectoryGroup;
pub use key::{EntryKind, GroupKey, GroupKeyResolver};
pub use store::{AggregationStore, SortedGroups};
