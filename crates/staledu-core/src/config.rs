//! Scan context and display units.

use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::ScanError;

/// Number of seconds in a day.
pub const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

/// Default access-time threshold in days.
pub const DEFAULT_ATIME_DAYS: u32 = 45;

/// Default grouping depth below the root.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Display unit for byte totals (binary powers of 1024).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Units {
    #[strum(to_string = "B")]
    Bytes,
    #[strum(to_string = "kB")]
    Kilobytes,
    #[strum(to_string = "MB")]
    Megabytes,
    #[default]
    #[strum(to_string = "GB")]
    Gigabytes,
    #[strum(to_string = "TB")]
    Terabytes,
    #[strum(to_string = "PB")]
    Petabytes,
    #[strum(to_string = "EB")]
    Exabytes,
}

impl Units {
    /// Power of 1024 this unit represents.
    pub fn exponent(self) -> u32 {
        match self {
            Self::Bytes => 0,
            Self::Kilobytes => 1,
            Self::Megabytes => 2,
            Self::Gigabytes => 3,
            Self::Terabytes => 4,
            Self::Petabytes => 5,
            Self::Exabytes => 6,
        }
    }

    /// Number of bytes in one unit.
    pub fn divisor(self) -> u64 {
        1u64 << (10 * self.exponent())
    }
}

/// Only the first letter is significant, case-insensitively, so `g`, `G`,
/// `GB` and `gib` all select gigabytes.
impl FromStr for Units {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('b') => Ok(Self::Bytes),
            Some('k') => Ok(Self::Kilobytes),
            Some('m') => Ok(Self::Megabytes),
            Some('g') => Ok(Self::Gigabytes),
            Some('t') => Ok(Self::Terabytes),
            Some('p') => Ok(Self::Petabytes),
            Some('e') => Ok(Self::Exabytes),
            _ => Err(ScanError::invalid_config(format!("unknown units: {s}"))),
        }
    }
}

impl TryFrom<String> for Units {
    type Error = ScanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Units> for String {
    fn from(units: Units) -> Self {
        units.to_string()
    }
}

/// Parameters of a single scan. Read-only once the walk starts.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanContext {
    /// Absolute root path, without a trailing separator (except for `/`).
    #[builder(setter(custom))]
    pub root: String,

    /// Number of path components below the root that form a grouping key.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    pub max_depth: u32,

    /// Entries last accessed more than this many days before
    /// `reference_time` count as stale.
    #[builder(default = "DEFAULT_ATIME_DAYS")]
    pub atime_days: u32,

    /// Point in time the access-time threshold is measured from.
    #[builder(default = "SystemTime::now()")]
    pub reference_time: SystemTime,

    /// Display unit for sizes.
    #[builder(default)]
    pub units: Units,

    /// Currency per unit per day; switches the report to cost mode.
    #[builder(default)]
    pub cost_rate: Option<f64>,
}

impl ScanContextBuilder {
    /// Set the root path. One trailing separator is stripped.
    pub fn root(&mut self, root: impl AsRef<Path>) -> &mut Self {
        self.root = Some(normalize_root(&root.as_ref().to_string_lossy()));
        self
    }

    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        if self.max_depth == Some(0) {
            return Err("Max depth must be at least 1".to_string());
        }
        if let Some(Some(rate)) = self.cost_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!("Cost rate must be a non-negative number, got {rate}"));
            }
        }
        Ok(())
    }
}

impl ScanContext {
    /// Create a new scan context builder.
    pub fn builder() -> ScanContextBuilder {
        ScanContextBuilder::default()
    }

    /// Create a context for `root` with every other parameter at its default.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize_root(&root.as_ref().to_string_lossy()),
            max_depth: DEFAULT_MAX_DEPTH,
            atime_days: DEFAULT_ATIME_DAYS,
            reference_time: SystemTime::now(),
            units: Units::default(),
            cost_rate: None,
        }
    }

    /// Absolute access-time cutoff; anything accessed before it is stale.
    pub fn atime_cutoff(&self) -> SystemTime {
        let window = Duration::from_secs(u64::from(self.atime_days) * SECONDS_PER_DAY);
        self.reference_time
            .checked_sub(window)
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    /// Check whether an access time falls before the cutoff.
    pub fn is_stale(&self, accessed: SystemTime) -> bool {
        accessed < self.atime_cutoff()
    }

    /// Byte divisor for displayed sizes.
    pub fn unit_scale(&self) -> f64 {
        self.units.divisor() as f64
    }

    /// The cost rate, if the report should be rendered in cost mode.
    pub fn active_cost_rate(&self) -> Option<f64> {
        self.cost_rate.filter(|rate| *rate > 0.0)
    }
}

fn normalize_root(root: &str) -> String {
    match root.strip_suffix('/') {
        Some("") | None => root.to_string(),
        Some(stripped) => stripped.to_string(),
    }
}
