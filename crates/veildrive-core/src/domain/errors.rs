//! Domain error types
//!
//! This module defines error types specific to domain operations.
//! [`DomainError`] covers construction-time validation of paths and names;
//! [`ActionError`] covers user-initiated operations and carries the message
//! that is surfaced at the point of the action.

use thiserror::Error;

/// Errors that can occur when constructing or deriving domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote path format or content
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid entry name (empty, or containing a path separator)
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// Errors raised by the operation orchestrator
///
/// Validation and precondition variants are raised *before* any remote call
/// is issued; `Remote` wraps a rejected port call. A declined prompt or
/// confirmation is not an error (see `Outcome::Aborted` in the use cases).
#[derive(Debug, Error)]
pub enum ActionError {
    /// A create-folder name collides with the current listing
    #[error("There already exists a file or folder named {name}.")]
    DuplicateName {
        /// The colliding name
        name: String,
    },

    /// A dropped batch contains a name collision; nothing was imported
    #[error("There already exists a file named {name}. No files copied.")]
    ImportCollision {
        /// The first colliding name found in the batch
        name: String,
    },

    /// Files cannot be dropped into this location
    #[error("Files cannot be imported into {path}")]
    ImportNotPermitted {
        /// The restricted destination path
        path: String,
    },

    /// The operation needs a selected entry and none is selected
    #[error("No file is selected")]
    NoSelection,

    /// The operation applies to files only
    #[error("{name} is a folder")]
    SelectionIsFolder {
        /// Name of the selected folder
        name: String,
    },

    /// The operation addresses content by hash, which the entry does not have yet
    #[error("{name} has not finished storing yet")]
    NotStored {
        /// Name of the still-pending entry
        name: String,
    },

    /// Delete-local requires a cached local copy
    #[error("{name} has no local copy")]
    NoLocalCopy {
        /// Name of the entry without a cached copy
        name: String,
    },

    /// A domain value could not be derived (e.g. an invalid child path)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A remote store call was rejected
    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

impl ActionError {
    /// Returns true if this error was raised before any remote call
    ///
    /// Validation and precondition failures leave both local and remote
    /// state untouched.
    pub fn is_local(&self) -> bool {
        !matches!(self, ActionError::Remote(_))
    }
}
