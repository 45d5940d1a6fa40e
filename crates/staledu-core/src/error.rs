//! Error types for scanning operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ScanContextBuilderError;

/// Errors that can occur while preparing or running a scan.
///
/// Every variant is fatal: a scan either completes or produces no report.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The per-process open file limit could not be queried.
    #[error("Unable to obtain the limit for open files: {source}")]
    DescriptorLimit {
        #[source]
        source: std::io::Error,
    },

    /// The descriptor readiness probe could not be allocated.
    #[error("Unable to allocate {ceiling} polling file descriptors")]
    ProbeAllocation { ceiling: u64 },

    /// The descriptor readiness probe itself failed.
    #[error("Polling open file descriptors failed: {source}")]
    Probe {
        #[source]
        source: std::io::Error,
    },

    /// Every descriptor up to the limit is already in use.
    #[error("No free file descriptors (limit {ceiling})")]
    NoFreeDescriptors { ceiling: u64 },

    /// The walk could not start or continue.
    #[error("Walking {path} failed: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Broad category of a [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Descriptor ceiling or probe failure, raised before any traversal.
    ResourceLimit,
    /// Root unreadable or the walk reported a failure.
    Traversal,
    /// Rejected scan parameters.
    Config,
}

impl ScanError {
    /// Create a traversal error with path context.
    pub fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Traversal {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Category of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::DescriptorLimit { .. }
            | Self::ProbeAllocation { .. }
            | Self::Probe { .. }
            | Self::NoFreeDescriptors { .. } => ErrorClass::ResourceLimit,
            Self::Traversal { .. } | Self::NotADirectory { .. } => ErrorClass::Traversal,
            Self::InvalidConfig { .. } => ErrorClass::Config,
        }
    }
}

impl From<ScanContextBuilderError> for ScanError {
    fn from(err: ScanContextBuilderError) -> Self {
        Self::invalid_config(err.to_string())
    }
}
