//! Report rendering for staledu.
//!
//! Turns a populated [`AggregationStore`] into a plain-text table:
//!
//! ```text
//! Size [GB]  >45 days [%]   Directory
//!      1.25            40   /data
//!      0.75            85   ├──archive
//!      0.50            12   │  ├──2019
//! ```
//!
//! The root group always comes first; the remaining groups follow in
//! byte-wise key order, indented by the depth at which they were first seen.
//! With a cost rate set, the first column shows the estimated retention cost
//! of the stale bytes instead of their size.

mod renderer;

pub use renderer::{BRANCH, CONTINUATION, Header, ReportRenderer, Row, Rows};

// Re-export core types
pub use staledu_core::{AggregationStore, DirectoryGroup, ScanContext, Units};
