//! Depth-indented report rendering.

use std::io::{self, Write};

use staledu_core::{AggregationStore, DirectoryGroup, ScanContext, SortedGroups};
use tracing::debug;

/// Indent drawn once per level between the root and a row's parent.
pub const CONTINUATION: &str = "│  ";

/// Connector drawn in front of a row's basename.
pub const BRANCH: &str = "├──";

const DIRECTORY_HEADER: &str = "Directory";

/// Column titles of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Title of the value column (`Size [GB]` or `Cost [$]`).
    pub value: String,
    /// Title of the percentage column (`>45 days [%]`).
    pub stale: String,
}

/// One formatted report line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Scaled stale size, or estimated retention cost.
    pub value: f64,
    /// Stale share of the group, `0..=100`.
    pub percentage: f64,
    /// Indented path.
    pub path: String,
}

/// Renders an [`AggregationStore`] for one [`ScanContext`].
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer<'a> {
    context: &'a ScanContext,
}

impl<'a> ReportRenderer<'a> {
    /// Create a renderer for `context`.
    pub fn new(context: &'a ScanContext) -> Self {
        Self { context }
    }

    /// Column titles for the current mode.
    pub fn header(&self) -> Header {
        let value = match self.context.active_cost_rate() {
            Some(_) => "Cost [$]".to_string(),
            None => format!("Size [{}]", self.context.units),
        };
        let days = self.context.atime_days;
        let stale = format!(">{days} {} [%]", if days == 1 { "day" } else { "days" });
        Header { value, stale }
    }

    /// Format one group at the given indentation level.
    pub fn row(&self, group: &DirectoryGroup, level: u32) -> Row {
        let mut value = group.stale_bytes() as f64 / self.context.unit_scale();
        if let Some(rate) = self.context.active_cost_rate() {
            value *= rate * f64::from(self.context.atime_days);
        }

        let path = if level == 0 {
            group.key().to_string()
        } else {
            let indent = CONTINUATION.repeat(level as usize - 1);
            format!("{indent}{BRANCH}{}", group.basename())
        };

        Row {
            value,
            percentage: group.stale_percentage(),
            path,
        }
    }

    /// Rows in report order: the root group first, then every other group
    /// in ascending key order.
    pub fn rows<'s>(&'s self, store: &'s AggregationStore) -> Rows<'s> {
        Rows {
            renderer: self,
            store,
            stage: Stage::RootPending,
        }
    }

    /// Write the header and every row to `out`.
    pub fn render<W: Write>(&self, store: &AggregationStore, out: &mut W) -> io::Result<()> {
        debug!(groups = store.len(), "rendering report");

        let header = self.header();
        let value_width = header.value.chars().count();
        let stale_width = header.stale.chars().count();

        writeln!(
            out,
            "{:>value_width$}  {:>stale_width$}   {DIRECTORY_HEADER}",
            header.value, header.stale
        )?;
        for row in self.rows(store) {
            writeln!(
                out,
                "{:>value_width$.2}  {:>stale_width$.0}   {}",
                row.value, row.percentage, row.path
            )?;
        }
        out.flush()
    }

    /// Render into a string.
    pub fn render_to_string(&self, store: &AggregationStore) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.render(store, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

enum Stage<'s> {
    RootPending,
    SortedBody(SortedGroups<'s>),
    Done,
}

/// Report rows of one store; see [`ReportRenderer::rows`].
///
/// The root group is emitted once, ahead of the sorted body, and skipped
/// when the body reaches its key.
pub struct Rows<'s> {
    renderer: &'s ReportRenderer<'s>,
    store: &'s AggregationStore,
    stage: Stage<'s>,
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let root = self.renderer.context.root.as_str();
        loop {
            match &mut self.stage {
                Stage::RootPending => {
                    self.stage = Stage::SortedBody(self.store.iter_sorted());
                    if let Some(group) = self.store.find(root) {
                        return Some(self.renderer.row(group, 0));
                    }
                }
                Stage::SortedBody(groups) => match groups.find(|g| g.key() != root) {
                    Some(group) => return Some(self.renderer.row(group, group.level())),
                    None => self.stage = Stage::Done,
                },
                Stage::Done => return None,
            }
        }
    }
}

impl std::iter::FusedIterator for Rows<'_> {}
