//! Defines the custom error types for the `core` module.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::deleter::DeletionReport;

/// The primary error type for the `core` module.
///
/// This enum encapsulates the errors that can occur while inspecting
/// the file system for the panes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),
}

/// The step of the traversal during which a node failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The directory's children could not be read.
    Listing,
    /// The entry itself could not be removed.
    Removal,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Listing => f.write_str("listing"),
            FailureStage::Removal => f.write_str("removal"),
        }
    }
}

/// A single entry the deleter could not handle.
#[derive(Debug, Error)]
#[error("{stage} failed for {}: {source}", .path.display())]
pub struct NodeFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    #[source]
    pub source: std::io::Error,
}

/// Returned by a strict deletion once the whole tree has been attempted.
#[derive(Debug, Error)]
#[error("deletion finished with {} failure(s) after {} removal attempts", .failures.len(), .report.attempted)]
pub struct DeletionError {
    pub failures: Vec<NodeFailure>,
    pub report: DeletionReport,
}
