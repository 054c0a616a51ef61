//! Use cases (interactors) for Veildrive
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`FileOperations`] - validates and dispatches every user-initiated
//!   file action against the remote store

pub mod operations;

pub use operations::{DragAction, DroppedFile, FileOperations, Outcome, Refresh};
