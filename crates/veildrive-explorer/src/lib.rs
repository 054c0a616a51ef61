//! Veildrive Explorer - File tree view-model and polling data layer
//!
//! This crate turns the request/response remote store API into the
//! continuously-refreshed state the file explorer renders, and wires user
//! actions back into the core use cases:
//! - **History** - bounded undo/redo over visited paths
//! - **Poller** - conditional, dependency-gated polling around an async producer
//! - **View-model** - connectivity, current listing and favorites composed per location
//! - **Controller** - user actions bound to view snapshots, with post-write refetches
//!
//! # Concurrency
//!
//! Everything runs on a single logical thread of control with cooperative
//! suspension: pollers are independent tokio tasks, each with its own
//! at-most-one-in-flight discipline, and no poller coordinates with
//! another. Listing snapshots are replaced wholesale per resolution,
//! never mutated in place.

pub mod controller;
pub mod history;
pub mod poller;
pub mod view_model;

pub use controller::ExplorerController;
pub use history::HistoryStack;
pub use poller::{PollSnapshot, Poller, PollerBuilder};
pub use view_model::{FileTreeViewModel, ListingView};
