//! Transfer task classification
//!
//! Decides once, up front, which operation a source/destination pair denotes.
//! Downstream code matches exhaustively on the mode instead of re-inspecting
//! the paths.

use crate::error::{Error, Result};
use crate::locator::Location;

/// The operation a single invocation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Emit matched identifiers, no mutation
    List,
    /// Local files to an S3 destination
    Upload,
    /// S3 objects to a local destination
    Download,
    /// S3 objects from one store to another
    Copy,
    /// Delete S3 objects matching the source prefix
    Delete,
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransferMode::List => "list",
            TransferMode::Upload => "upload",
            TransferMode::Download => "download",
            TransferMode::Copy => "copy",
            TransferMode::Delete => "delete",
        };
        write!(f, "{name}")
    }
}

/// A classified invocation
#[derive(Debug, Clone)]
pub struct TransferTask {
    pub mode: TransferMode,
    pub source: Location,
    pub destination: Location,
}

impl TransferTask {
    /// Classify a source/destination pair and the list/delete flags into a
    /// transfer task, rejecting combinations the tool does not support.
    pub fn classify(
        source: Location,
        destination: Location,
        list: bool,
        delete: bool,
    ) -> Result<Self> {
        if list {
            return Ok(Self {
                mode: TransferMode::List,
                source,
                destination,
            });
        }

        if delete {
            if !source.is_remote() {
                return Err(Error::Format(
                    "Delete requires an S3 locator as source path".into(),
                ));
            }
            if destination.is_remote() {
                return Err(Error::Format(
                    "Delete takes no destination path".into(),
                ));
            }
            return Ok(Self {
                mode: TransferMode::Delete,
                source,
                destination,
            });
        }

        let mode = match (source.is_remote(), destination.is_remote()) {
            (false, true) => TransferMode::Upload,
            (true, false) => TransferMode::Download,
            (true, true) => TransferMode::Copy,
            (false, false) => {
                return Err(Error::Format(
                    "Either source or destination must be an S3 locator".into(),
                ))
            }
        };

        Ok(Self {
            mode,
            source,
            destination,
        })
    }
}
